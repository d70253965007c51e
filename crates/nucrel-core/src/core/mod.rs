//! # Core Module
//!
//! Stateless models and algorithms that the relation engine is built on.
//!
//! ## Overview
//!
//! Everything in this layer is a pure function of its inputs or an immutable,
//! process-wide table. Residues are plain atom maps with a reference frame;
//! the algorithms work on borrowed residues and never keep them.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atom types, residues, residue arenas and idealized bases
//! - **Utilities** ([`utils`]) - Vector geometry and the static atom and residue catalogs
//! - **Ring Geometry** ([`rings`]) - Base ring centers and normals, and stacking classification
//! - **Hydrogen Bonds** ([`hbond`]) - Candidate bonds with binary and statistical scoring
//! - **Flow Networks** ([`flow`]) - Push-relabel maximum flow over real capacities
//! - **Pairing Faces** ([`faces`]) - Nearest-reference classification of contact points
//! - **Pairing Patterns** ([`pattern`]) - The canonical base-pair rule table

pub mod faces;
pub mod flow;
pub mod hbond;
pub mod models;
pub mod pattern;
pub mod rings;
pub mod utils;
