//! Geometry helpers and compile-time name catalogs shared by the models and
//! the analysis modules.

pub mod geometry;
pub mod identifiers;
