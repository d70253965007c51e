//! Hydrogen-bond candidates and their scoring.
//!
//! A candidate pairs a donor heavy atom and one of its hydrogens with an
//! acceptor heavy atom and one of its lone pairs. Two scorers are provided:
//! a binary hydrogen/lone-pair overlap test and the statistical scorer, which
//! evaluates a Gaussian mixture over a three-dimensional geometric descriptor
//! and returns the posterior probability of a genuine hydrogen bond.

pub mod bond;
pub mod params;
pub mod scorer;
