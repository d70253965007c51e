//! Pairing-face classification of base contact points.
//!
//! Each standard base carries a short list of reference points, one per face
//! label, expressed in the base's own reference frame. A contact point is
//! assigned the label of the nearest reference point.

use super::models::atom::AtomType;
use super::models::residue::{Residue, ResidueId, ResidueType};
use super::models::template::ideal_base;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceLabel {
    C8,
    Hh,
    Hw,
    Bh,
    Wh,
    Ww,
    Ws,
    Bs,
    Sw,
    Ss,
    Ribose,
    Phosphate,
}

/// The coarse edge a face belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edge {
    Hoogsteen,
    WatsonCrick,
    Sugar,
    Backbone,
}

impl FaceLabel {
    pub fn edge(&self) -> Edge {
        match self {
            FaceLabel::C8 | FaceLabel::Hh | FaceLabel::Hw | FaceLabel::Bh => Edge::Hoogsteen,
            FaceLabel::Wh | FaceLabel::Ww | FaceLabel::Ws => Edge::WatsonCrick,
            FaceLabel::Bs | FaceLabel::Sw | FaceLabel::Ss => Edge::Sugar,
            FaceLabel::Ribose | FaceLabel::Phosphate => Edge::Backbone,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FaceLabel::C8 => "C8",
            FaceLabel::Hh => "Hh",
            FaceLabel::Hw => "Hw",
            FaceLabel::Bh => "Bh",
            FaceLabel::Wh => "Wh",
            FaceLabel::Ww => "Ww",
            FaceLabel::Ws => "Ws",
            FaceLabel::Bs => "Bs",
            FaceLabel::Sw => "Sw",
            FaceLabel::Ss => "Ss",
            FaceLabel::Ribose => "Ribose",
            FaceLabel::Phosphate => "Phosphate",
        }
    }
}

impl fmt::Display for FaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Atom(AtomType),
    Midpoint(AtomType, AtomType),
}

use Anchor::{Atom, Midpoint};

type FaceLayout = &'static [(FaceLabel, Anchor)];

const ADENINE_FACES: FaceLayout = &[
    (FaceLabel::C8, Atom(AtomType::H8)),
    (FaceLabel::Hh, Atom(AtomType::LP7)),
    (FaceLabel::Bh, Midpoint(AtomType::LP7, AtomType::H62)),
    (FaceLabel::Hw, Atom(AtomType::H62)),
    (FaceLabel::Wh, Atom(AtomType::H61)),
    (FaceLabel::Ww, Atom(AtomType::LP1)),
    (FaceLabel::Ws, Atom(AtomType::H2)),
    (FaceLabel::Sw, Midpoint(AtomType::H2, AtomType::LP3)),
    (FaceLabel::Ss, Atom(AtomType::LP3)),
];

const GUANINE_FACES: FaceLayout = &[
    (FaceLabel::C8, Atom(AtomType::H8)),
    (FaceLabel::Hh, Atom(AtomType::LP7)),
    (FaceLabel::Bh, Midpoint(AtomType::LP7, AtomType::LP6_1)),
    (FaceLabel::Hw, Atom(AtomType::LP6_1)),
    (FaceLabel::Wh, Atom(AtomType::LP6_2)),
    (FaceLabel::Ww, Atom(AtomType::H1)),
    (FaceLabel::Ws, Atom(AtomType::H21)),
    (FaceLabel::Sw, Atom(AtomType::H22)),
    (FaceLabel::Ss, Atom(AtomType::LP3)),
];

const CYTOSINE_FACES: FaceLayout = &[
    (FaceLabel::C8, Atom(AtomType::H6)),
    (FaceLabel::Hh, Atom(AtomType::H5)),
    (FaceLabel::Bh, Midpoint(AtomType::H5, AtomType::H42)),
    (FaceLabel::Hw, Atom(AtomType::H42)),
    (FaceLabel::Wh, Atom(AtomType::H41)),
    (FaceLabel::Ww, Atom(AtomType::LP3)),
    (FaceLabel::Ws, Atom(AtomType::LP2_2)),
    (FaceLabel::Bs, Midpoint(AtomType::LP2_2, AtomType::LP2_1)),
    (FaceLabel::Ss, Atom(AtomType::LP2_1)),
];

const URACIL_FACES: FaceLayout = &[
    (FaceLabel::C8, Atom(AtomType::H6)),
    (FaceLabel::Hh, Atom(AtomType::H5)),
    (FaceLabel::Bh, Midpoint(AtomType::H5, AtomType::LP4_1)),
    (FaceLabel::Hw, Atom(AtomType::LP4_1)),
    (FaceLabel::Wh, Atom(AtomType::LP4_2)),
    (FaceLabel::Ww, Atom(AtomType::H3)),
    (FaceLabel::Ws, Atom(AtomType::LP2_2)),
    (FaceLabel::Bs, Midpoint(AtomType::LP2_2, AtomType::LP2_1)),
    (FaceLabel::Ss, Atom(AtomType::LP2_1)),
];

const THYMINE_FACES: FaceLayout = &[
    (FaceLabel::C8, Atom(AtomType::H6)),
    (FaceLabel::Hh, Atom(AtomType::C5M)),
    (FaceLabel::Bh, Midpoint(AtomType::C5M, AtomType::LP4_1)),
    (FaceLabel::Hw, Atom(AtomType::LP4_1)),
    (FaceLabel::Wh, Atom(AtomType::LP4_2)),
    (FaceLabel::Ww, Atom(AtomType::H3)),
    (FaceLabel::Ws, Atom(AtomType::LP2_2)),
    (FaceLabel::Bs, Midpoint(AtomType::LP2_2, AtomType::LP2_1)),
    (FaceLabel::Ss, Atom(AtomType::LP2_1)),
];

/// A face label with its reference point in the base's local frame.
pub type FaceReference = (FaceLabel, Point3<f64>);

#[derive(Debug, Default)]
struct FaceTables {
    a: Vec<FaceReference>,
    c: Vec<FaceReference>,
    g: Vec<FaceReference>,
    u: Vec<FaceReference>,
    t: Vec<FaceReference>,
}

static FACE_TABLES: LazyLock<FaceTables> = LazyLock::new(|| FaceTables {
    a: build_table(ResidueType::A, ADENINE_FACES),
    c: build_table(ResidueType::C, CYTOSINE_FACES),
    g: build_table(ResidueType::G, GUANINE_FACES),
    u: build_table(ResidueType::U, URACIL_FACES),
    t: build_table(ResidueType::T, THYMINE_FACES),
});

fn build_table(residue_type: ResidueType, layout: FaceLayout) -> Vec<FaceReference> {
    let Some(template) = ideal_base(residue_type, ResidueId::new(' ', 0)) else {
        warn!(%residue_type, "No idealized template; face table left empty");
        return Vec::new();
    };
    let frame = match template.reference_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!(%residue_type, error = %e, "Template frame failed; face table left empty");
            return Vec::new();
        }
    };

    layout
        .iter()
        .filter_map(|&(label, anchor)| {
            let point = anchor_position(&template, anchor);
            if point.is_none() {
                warn!(%residue_type, %label, "Face anchor missing from template");
            }
            point.map(|p| (label, frame.inverse_transform_point(&p)))
        })
        .collect()
}

fn anchor_position(residue: &Residue, anchor: Anchor) -> Option<Point3<f64>> {
    match anchor {
        Atom(atom) => residue.find_atom(atom).copied(),
        Midpoint(first, second) => {
            let a = residue.find_atom(first)?;
            let b = residue.find_atom(second)?;
            Some(nalgebra::center(a, b))
        }
    }
}

/// Forces construction of the reference tables.
///
/// Calling this before fanning work out across threads keeps the one-time
/// build off the hot path.
pub fn initialize() {
    LazyLock::force(&FACE_TABLES);
}

/// Reference points for a base letter (`A`, `C`, `G`, `U`, `T`).
pub fn reference_points(letter: char) -> Option<&'static [FaceReference]> {
    let tables = &*FACE_TABLES;
    match letter.to_ascii_uppercase() {
        'A' => Some(&tables.a),
        'C' => Some(&tables.c),
        'G' => Some(&tables.g),
        'U' => Some(&tables.u),
        'T' => Some(&tables.t),
        _ => None,
    }
}

/// The label whose reference point lies nearest to `point`.
///
/// Ties keep the entry that comes first in the table.
pub fn nearest_face(table: &[FaceReference], point: &Point3<f64>) -> Option<FaceLabel> {
    let mut best: Option<(FaceLabel, f64)> = None;
    for (label, reference) in table {
        let d = nalgebra::distance_squared(reference, point);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((*label, d));
        }
    }
    best.map(|(label, _)| label)
}

/// Classifies a world-space contact point against the faces of `residue`.
///
/// Returns `None` for non-standard bases or when the residue frame cannot be
/// built.
pub fn classify(residue: &Residue, point: &Point3<f64>) -> Option<FaceLabel> {
    let letter = residue.residue_type().base_letter()?;
    let table = reference_points(letter)?;
    let frame = residue.reference_frame().ok()?;
    nearest_face(table, &frame.inverse_transform_point(point))
}
