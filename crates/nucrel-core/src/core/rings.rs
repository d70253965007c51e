use super::models::atom::AtomType;
use super::models::residue::{Residue, ResidueError};
use super::utils::geometry::centroid;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::f64::consts::PI;

pub const PYRIMIDINE_RING: [AtomType; 6] = [
    AtomType::N1,
    AtomType::C2,
    AtomType::N3,
    AtomType::C4,
    AtomType::C5,
    AtomType::C6,
];

pub const IMIDAZOLE_RING: [AtomType; 5] = [
    AtomType::C4,
    AtomType::C5,
    AtomType::N7,
    AtomType::C8,
    AtomType::N9,
];

/// A ring reduced to its center and unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub center: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Relative placement of two stacked rings.
///
/// `Upward`/`Downward` apply to rings with roughly parallel normals, the
/// second ring lying on the positive or negative side of the first.
/// `Inward`/`Outward` apply to antiparallel normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackingDirection {
    Upward,
    Downward,
    Inward,
    Outward,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StackingCutoffs {
    /// Maximum center-to-center distance, in Angstroms.
    pub distance: f64,
    /// Maximum deviation from (anti)parallel normals, in degrees.
    pub tilt_degrees: f64,
    /// Maximum angle between a normal and the center-to-center axis, in degrees.
    pub overlap_degrees: f64,
}

impl Default for StackingCutoffs {
    fn default() -> Self {
        Self {
            distance: 4.5,
            tilt_degrees: 35.0,
            overlap_degrees: 35.0,
        }
    }
}

fn ring_points(residue: &Residue, ring: &[AtomType]) -> Result<Vec<Point3<f64>>, ResidueError> {
    ring.iter()
        .map(|&atom| residue.safe_find_atom(atom).copied())
        .collect()
}

fn require_purine(residue: &Residue) -> Result<(), ResidueError> {
    if residue.residue_type().is_purine() {
        Ok(())
    } else {
        Err(ResidueError::UnexpectedType {
            residue: residue.id(),
            residue_type: residue.residue_type(),
            reason: "imidazole ring requires a purine",
        })
    }
}

fn require_base(residue: &Residue) -> Result<(), ResidueError> {
    let residue_type = residue.residue_type();
    if residue_type.is_purine() || residue_type.is_pyrimidine() {
        Ok(())
    } else {
        Err(ResidueError::UnexpectedType {
            residue: residue.id(),
            residue_type,
            reason: "ring geometry requires a standard purine or pyrimidine",
        })
    }
}

/// Fourier-style ring normal: unit(R1 × R2) with
/// `R1 = Σ (r_j - c) sin(2πj/n)` and `R2 = Σ (r_j - c) cos(2πj/n)`.
///
/// Points must be given in ring order; counter-clockwise traversal seen from
/// +z yields a normal along -z.
fn fourier_normal(
    residue: &Residue,
    points: &[Point3<f64>],
    center: &Point3<f64>,
) -> Result<Vector3<f64>, ResidueError> {
    let n = points.len() as f64;
    let (r1, r2) = points.iter().enumerate().fold(
        (Vector3::zeros(), Vector3::zeros()),
        |(r1, r2), (j, point)| {
            let phase = 2.0 * PI * j as f64 / n;
            let offset = point - center;
            (r1 + offset * phase.sin(), r2 + offset * phase.cos())
        },
    );
    r1.cross(&r2)
        .try_normalize(1e-12)
        .ok_or(ResidueError::DegenerateGeometry {
            residue: residue.id(),
            reason: "ring atoms are collinear",
        })
}

pub fn pyrimidine_ring_center(residue: &Residue) -> Result<Point3<f64>, ResidueError> {
    let points = ring_points(residue, &PYRIMIDINE_RING)?;
    Ok(centroid(&points).unwrap_or_else(Point3::origin))
}

pub fn imidazole_ring_center(residue: &Residue) -> Result<Point3<f64>, ResidueError> {
    require_purine(residue)?;
    let points = ring_points(residue, &IMIDAZOLE_RING)?;
    Ok(centroid(&points).unwrap_or_else(Point3::origin))
}

/// Normal of the six-membered ring. For purines the raw normal is negated so
/// that both rings of a purine point into the same hemisphere.
pub fn pyrimidine_ring_normal(
    residue: &Residue,
    center: &Point3<f64>,
) -> Result<Vector3<f64>, ResidueError> {
    let points = ring_points(residue, &PYRIMIDINE_RING)?;
    let normal = fourier_normal(residue, &points, center)?;
    Ok(if residue.residue_type().is_purine() {
        -normal
    } else {
        normal
    })
}

pub fn imidazole_ring_normal(
    residue: &Residue,
    center: &Point3<f64>,
) -> Result<Vector3<f64>, ResidueError> {
    require_purine(residue)?;
    let points = ring_points(residue, &IMIDAZOLE_RING)?;
    fourier_normal(residue, &points, center)
}

pub fn pyrimidine_ring(residue: &Residue) -> Result<Ring, ResidueError> {
    let center = pyrimidine_ring_center(residue)?;
    let normal = pyrimidine_ring_normal(residue, &center)?;
    Ok(Ring { center, normal })
}

pub fn imidazole_ring(residue: &Residue) -> Result<Ring, ResidueError> {
    let center = imidazole_ring_center(residue)?;
    let normal = imidazole_ring_normal(residue, &center)?;
    Ok(Ring { center, normal })
}

/// Decides whether two rings stack and, if so, how.
pub fn ring_stacking(a: &Ring, b: &Ring, cutoffs: &StackingCutoffs) -> Option<StackingDirection> {
    let offset = b.center - a.center;
    if offset.norm_squared() > cutoffs.distance * cutoffs.distance {
        return None;
    }

    let tilt_limit = cutoffs.tilt_degrees.to_radians();
    let tilt = a.normal.dot(&b.normal).clamp(-1.0, 1.0).acos();
    let reversed = if tilt <= tilt_limit {
        false
    } else if PI - tilt <= tilt_limit {
        true
    } else {
        return None;
    };

    let axis = offset.try_normalize(1e-12)?;
    let overlap_limit = cutoffs.overlap_degrees.to_radians();
    let within_cone = |angle: f64| angle <= overlap_limit || PI - angle <= overlap_limit;

    let angle_a = a.normal.dot(&axis).clamp(-1.0, 1.0).acos();
    let up = if within_cone(angle_a) {
        angle_a < PI / 2.0
    } else {
        let angle_b = b.normal.dot(&axis).clamp(-1.0, 1.0).acos();
        if !within_cone(angle_b) {
            return None;
        }
        (angle_b < PI / 2.0) ^ reversed
    };

    Some(match (reversed, up) {
        (false, true) => StackingDirection::Upward,
        (false, false) => StackingDirection::Downward,
        (true, true) => StackingDirection::Inward,
        (true, false) => StackingDirection::Outward,
    })
}

/// Tries every applicable ring combination, pyrimidine rings first, and
/// returns the first stacking found.
pub fn are_stacked(
    reference: &Residue,
    residue: &Residue,
    cutoffs: &StackingCutoffs,
) -> Result<Option<StackingDirection>, ResidueError> {
    require_base(reference)?;
    require_base(residue)?;

    let (ref_pyrimidine, ref_imidazole) = rings_of(reference)?;
    let (res_pyrimidine, res_imidazole) = rings_of(residue)?;

    let candidates = [
        Some((ref_pyrimidine, res_pyrimidine)),
        ref_imidazole.map(|ring| (ring, res_pyrimidine)),
        res_imidazole.map(|ring| (ref_pyrimidine, ring)),
        ref_imidazole.zip(res_imidazole),
    ];

    Ok(candidates
        .into_iter()
        .flatten()
        .find_map(|(a, b)| ring_stacking(&a, &b, cutoffs)))
}

/// Pyrimidine ring and, for purines, imidazole ring of a standard base.
fn rings_of(residue: &Residue) -> Result<(Ring, Option<Ring>), ResidueError> {
    let pyrimidine = pyrimidine_ring(residue)?;
    let imidazole = if residue.residue_type().is_purine() {
        Some(imidazole_ring(residue)?)
    } else {
        None
    };
    Ok((pyrimidine, imidazole))
}
