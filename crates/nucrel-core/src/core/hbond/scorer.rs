use super::params::*;
use crate::core::models::atom::AtomType;
use crate::core::models::residue::{Residue, ResidueError};
use crate::core::utils::geometry::{cos_angle, distance};
use nalgebra::{Matrix3, Point3, Vector3};
use std::f64::consts::PI;

/// 1.0 when the hydrogen and lone pair overlap within the binary window,
/// 0.0 otherwise.
#[inline]
pub fn binary_score(hydrogen: &Point3<f64>, lone_pair: &Point3<f64>) -> f64 {
    let d = distance(hydrogen, lone_pair);
    if (BINARY_MIN_DISTANCE..BINARY_MAX_DISTANCE).contains(&d) {
        1.0
    } else {
        0.0
    }
}

#[inline]
fn bounded_atanh(cosine: f64) -> f64 {
    cosine.clamp(-COSINE_LIMIT, COSINE_LIMIT).atanh()
}

/// Geometric descriptor of a donor-hydrogen / acceptor-lone pair arrangement.
pub fn descriptor(
    donor: &Point3<f64>,
    hydrogen: &Point3<f64>,
    acceptor: &Point3<f64>,
    lone_pair: &Point3<f64>,
) -> Vector3<f64> {
    Vector3::new(
        3.0 * distance(hydrogen, lone_pair).ln(),
        bounded_atanh(cos_angle(donor, hydrogen, acceptor)),
        bounded_atanh(cos_angle(acceptor, donor, lone_pair)),
    )
}

/// Posterior probability that a descriptor belongs to the hydrogen-bond
/// components of the mixture. Always in `[0, 1]`; degenerate input yields 0.
pub fn mixture_probability(x: &Vector3<f64>) -> f64 {
    let normalization = (2.0 * PI).powi(3);
    let mut p_hbond = 0.0;
    let mut p_total = 0.0;

    for k in 0..COMPONENTS {
        let determinant = DETERMINANTS[k];
        if determinant.is_nan() || determinant < MIN_DETERMINANT {
            continue;
        }
        let diff = x - Vector3::from(MEANS[k]);
        // Inverse covariances are symmetric, so row/column order is immaterial.
        let inverse = Matrix3::from(INVERSE_COVARIANCES[k]);
        let quadratic = diff.dot(&(inverse * diff));
        let density = (-0.5 * quadratic).exp() / (normalization * determinant).sqrt();
        if !density.is_finite() {
            continue;
        }
        let weighted = WEIGHTS[k] * density;
        p_total += weighted;
        p_hbond += HBOND_PRIORS[k] * weighted;
    }

    let probability = p_hbond / p_total;
    if probability.is_finite() {
        probability.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Ring carbon carrying a base methyl group and that carbon's two ring neighbours.
fn methyl_anchor(methyl: AtomType) -> Option<[AtomType; 3]> {
    match methyl {
        AtomType::C5M | AtomType::C7 => Some([AtomType::C5, AtomType::C4, AtomType::C6]),
        _ => None,
    }
}

/// Places the methyl hydrogen that best faces `acceptor`.
///
/// The hydrogen sits `METHYL_CH_LENGTH` from the methyl carbon, on the cone of
/// half-angle `METHYL_CONE_DEGREES` around the ring-carbon → methyl-carbon
/// axis, rotated toward the acceptor.
pub fn synthesize_methyl_hydrogen(
    residue: &Residue,
    methyl: AtomType,
    acceptor: &Point3<f64>,
) -> Result<Point3<f64>, ResidueError> {
    let degenerate = |reason| ResidueError::DegenerateGeometry {
        residue: residue.id(),
        reason,
    };

    let [anchor, ring_a, ring_b] =
        methyl_anchor(methyl).ok_or_else(|| degenerate("atom is not a base methyl carbon"))?;
    let carbon = residue.safe_find_atom(methyl)?;
    let anchor = residue.safe_find_atom(anchor)?;
    let ring_a = residue.safe_find_atom(ring_a)?;
    let ring_b = residue.safe_find_atom(ring_b)?;

    let axis = (carbon - anchor)
        .try_normalize(1e-9)
        .ok_or_else(|| degenerate("methyl bond has zero length"))?;
    let plane_normal = (ring_a - anchor)
        .cross(&(ring_b - anchor))
        .try_normalize(1e-9)
        .ok_or_else(|| degenerate("methyl ring anchors are collinear"))?;
    let in_plane = plane_normal
        .cross(&axis)
        .try_normalize(1e-9)
        .ok_or_else(|| degenerate("methyl bond is perpendicular to the ring"))?;
    let out_of_plane = axis.cross(&in_plane);

    let toward = acceptor - carbon;
    let lateral = (in_plane * toward.dot(&in_plane) + out_of_plane * toward.dot(&out_of_plane))
        .try_normalize(1e-9)
        .unwrap_or(in_plane);

    let direction = (axis + lateral * METHYL_CONE_DEGREES.to_radians().tan()).normalize();
    Ok(carbon + direction * METHYL_CH_LENGTH)
}

/// Atom names of one donor-hydrogen / acceptor-lone pair candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondAtoms {
    pub donor: AtomType,
    pub hydrogen: AtomType,
    pub acceptor: AtomType,
    pub lone_pair: AtomType,
}

/// Hydrogen position for a candidate: the stored hydrogen, or a synthesised
/// one when the donor is a methyl carbon.
pub fn hydrogen_position(
    donor_residue: &Residue,
    atoms: &BondAtoms,
    acceptor: &Point3<f64>,
) -> Result<Point3<f64>, ResidueError> {
    if atoms.donor.is_methyl() {
        synthesize_methyl_hydrogen(donor_residue, atoms.donor, acceptor)
    } else {
        donor_residue.safe_find_atom(atoms.hydrogen).copied()
    }
}

pub fn statistical_score(
    donor_residue: &Residue,
    acceptor_residue: &Residue,
    atoms: &BondAtoms,
) -> Result<f64, ResidueError> {
    let donor = donor_residue.safe_find_atom(atoms.donor)?;
    let acceptor = acceptor_residue.safe_find_atom(atoms.acceptor)?;
    if distance(donor, acceptor) > MAX_DONOR_ACCEPTOR_DISTANCE {
        return Ok(0.0);
    }
    let hydrogen = hydrogen_position(donor_residue, atoms, acceptor)?;
    let lone_pair = acceptor_residue.safe_find_atom(atoms.lone_pair)?;
    Ok(mixture_probability(&descriptor(
        donor, &hydrogen, acceptor, lone_pair,
    )))
}

pub fn binary_bond_score(
    donor_residue: &Residue,
    acceptor_residue: &Residue,
    atoms: &BondAtoms,
) -> Result<f64, ResidueError> {
    let acceptor = acceptor_residue.safe_find_atom(atoms.acceptor)?;
    let hydrogen = hydrogen_position(donor_residue, atoms, acceptor)?;
    let lone_pair = acceptor_residue.safe_find_atom(atoms.lone_pair)?;
    Ok(binary_score(&hydrogen, lone_pair))
}
