//! # Workflows Module
//!
//! Top-level entry points that annotate whole structures.
//!
//! ## Overview
//!
//! A workflow validates its configuration, enumerates residue pairs in the
//! structure's insertion order, drops pairs beyond the neighbor cutoff and
//! annotates the rest, in parallel when the `parallel` feature is enabled.
//!
//! - **Annotation Workflow** ([`annotate`]) - Every requested analysis over every neighboring pair

pub mod annotate;
