//! # nucrel
//!
//! Pairwise relation annotation for nucleic acid and protein residues.
//!
//! Given two residues, the library decides whether they are covalently
//! adjacent, stacked, base paired or joined by base-backbone hydrogen bonds,
//! and records the relative transform, contact faces and hydrogen bonds
//! behind each verdict.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Stateless residue models, idealized base
//!   templates, ring geometry, hydrogen-bond scoring, the max-flow solver,
//!   pairing faces and the canonical pairing rules.
//!
//! - **[`engine`]: The Logic Core.** The [`engine::relation::Relation`] record and
//!   its analyses, the hydrogen-bond network solver, configuration, errors and
//!   the JSON codec.
//!
//! - **[`workflows`]: The Public API.** Batch annotation of a whole structure,
//!   with neighbor prefiltering and progress reporting.

pub mod core;
pub mod engine;
pub mod workflows;
