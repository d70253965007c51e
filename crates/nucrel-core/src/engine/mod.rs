//! # Engine Module
//!
//! Relation records and the analyses that fill them.
//!
//! ## Overview
//!
//! A [`relation::Relation`] names two residues by identity and accumulates
//! labels as each requested analysis runs. Residues are resolved through a
//! [`crate::core::models::structure::ResidueLookup`] at annotation time, so
//! relations stay valid as long as the caller keeps the residues around.
//!
//! ## Architecture
//!
//! - **Relations** ([`relation`]) - Adjacency, stacking, pairing and base-backbone analyses
//! - **Labels** ([`labels`]) - Qualitative tags and the analysis category mask
//! - **Hydrogen Bond Networks** ([`network`]) - Candidate collection and the flow solve between two residues
//! - **Configuration** ([`config`]) - Cutoffs, the analysis mask and TOML loading
//! - **Encoding** ([`codec`]) - JSON records of relations
//! - **Progress Monitoring** ([`progress`]) - Callbacks for batch annotation
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod codec;
pub mod config;
pub mod error;
pub mod labels;
pub mod network;
pub mod progress;
pub mod relation;
