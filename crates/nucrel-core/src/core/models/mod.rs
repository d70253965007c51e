//! # Core Models Module
//!
//! Data structures for residues positioned in 3-D space.
//!
//! ## Key Components
//!
//! - [`atom`] - The closed, interned set of atom types and their classification predicates
//! - [`residue`] - Residue identities, residue types and the residue container itself
//! - [`structure`] - A caller-owned residue arena and the [`structure::ResidueLookup`] trait
//! - [`template`] - Idealized standard bases with hydrogens and lone pairs placed
//! - [`ids`] - Arena keys
//!
//! ## Usage
//!
//! ```ignore
//! use nucrel::core::models::{residue::{ResidueId, ResidueType}, template::ideal_base};
//!
//! let guanine = ideal_base(ResidueType::G, ResidueId::new('A', 1)).unwrap();
//! let frame = guanine.reference_frame()?;
//! ```

pub mod atom;
pub mod ids;
pub mod residue;
pub mod structure;
pub mod template;
