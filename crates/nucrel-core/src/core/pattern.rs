//! Canonical base-pairing patterns.
//!
//! A priority-ordered rule table translates a solved pairing (residue types,
//! strand orientation and the strongest hydrogen bonds) into a named pairing
//! family with its Saenger class.

use super::hbond::bond::HBondFlow;
use super::models::atom::AtomType;
use super::models::residue::{Residue, ResidueType};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Orientation {
    Parallel,
    Antiparallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingLabel {
    WatsonCrick,
    Wobble,
    ReverseWatsonCrick,
    Hoogsteen,
    ReverseHoogsteen,
    Sheared,
    Imino,
}

impl fmt::Display for PairingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PairingLabel::WatsonCrick => "Watson-Crick",
            PairingLabel::Wobble => "Wobble",
            PairingLabel::ReverseWatsonCrick => "Reverse Watson-Crick",
            PairingLabel::Hoogsteen => "Hoogsteen",
            PairingLabel::ReverseHoogsteen => "Reverse Hoogsteen",
            PairingLabel::Sheared => "Sheared",
            PairingLabel::Imino => "Imino",
        };
        f.write_str(name)
    }
}

/// Which residue of a rule donates the hydrogen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BondRequirement {
    pub donor_side: Side,
    pub donor: AtomType,
    pub acceptor: AtomType,
}

const fn bond(donor_side: Side, donor: AtomType, acceptor: AtomType) -> BondRequirement {
    BondRequirement {
        donor_side,
        donor,
        acceptor,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingPattern {
    pub label: PairingLabel,
    /// Saenger class, as a roman numeral.
    pub saenger: &'static str,
    pub first: ResidueType,
    pub second: ResidueType,
    /// Required strand orientation, if the pattern constrains it.
    pub orientation: Option<Orientation>,
    pub bonds: &'static [BondRequirement],
}

use Side::{First, Second};

/// Rules in priority order.
pub static PATTERNS: &[PairingPattern] = &[
    PairingPattern {
        label: PairingLabel::WatsonCrick,
        saenger: "XIX",
        first: ResidueType::G,
        second: ResidueType::C,
        orientation: Some(Orientation::Antiparallel),
        bonds: &[
            bond(First, AtomType::N1, AtomType::N3),
            bond(Second, AtomType::N4, AtomType::O6),
            bond(First, AtomType::N2, AtomType::O2),
        ],
    },
    PairingPattern {
        label: PairingLabel::WatsonCrick,
        saenger: "XX",
        first: ResidueType::A,
        second: ResidueType::U,
        orientation: Some(Orientation::Antiparallel),
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N1),
            bond(First, AtomType::N6, AtomType::O4),
        ],
    },
    PairingPattern {
        label: PairingLabel::WatsonCrick,
        saenger: "XX",
        first: ResidueType::A,
        second: ResidueType::T,
        orientation: Some(Orientation::Antiparallel),
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N1),
            bond(First, AtomType::N6, AtomType::O4),
        ],
    },
    PairingPattern {
        label: PairingLabel::Wobble,
        saenger: "XXVIII",
        first: ResidueType::G,
        second: ResidueType::U,
        orientation: Some(Orientation::Antiparallel),
        bonds: &[
            bond(First, AtomType::N1, AtomType::O2),
            bond(Second, AtomType::N3, AtomType::O6),
        ],
    },
    PairingPattern {
        label: PairingLabel::ReverseWatsonCrick,
        saenger: "XXI",
        first: ResidueType::A,
        second: ResidueType::U,
        orientation: Some(Orientation::Parallel),
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N1),
            bond(First, AtomType::N6, AtomType::O2),
        ],
    },
    PairingPattern {
        label: PairingLabel::Hoogsteen,
        saenger: "XXIII",
        first: ResidueType::A,
        second: ResidueType::U,
        orientation: None,
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N7),
            bond(First, AtomType::N6, AtomType::O4),
        ],
    },
    PairingPattern {
        label: PairingLabel::Hoogsteen,
        saenger: "XXIII",
        first: ResidueType::A,
        second: ResidueType::T,
        orientation: None,
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N7),
            bond(First, AtomType::N6, AtomType::O4),
        ],
    },
    PairingPattern {
        label: PairingLabel::ReverseHoogsteen,
        saenger: "XXIV",
        first: ResidueType::A,
        second: ResidueType::U,
        orientation: None,
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N7),
            bond(First, AtomType::N6, AtomType::O2),
        ],
    },
    PairingPattern {
        label: PairingLabel::ReverseHoogsteen,
        saenger: "XXIV",
        first: ResidueType::A,
        second: ResidueType::T,
        orientation: None,
        bonds: &[
            bond(Second, AtomType::N3, AtomType::N7),
            bond(First, AtomType::N6, AtomType::O2),
        ],
    },
    PairingPattern {
        label: PairingLabel::Sheared,
        saenger: "XI",
        first: ResidueType::G,
        second: ResidueType::A,
        orientation: None,
        bonds: &[
            bond(First, AtomType::N2, AtomType::N7),
            bond(Second, AtomType::N6, AtomType::N3),
        ],
    },
    PairingPattern {
        label: PairingLabel::Imino,
        saenger: "VIII",
        first: ResidueType::G,
        second: ResidueType::A,
        orientation: None,
        bonds: &[
            bond(First, AtomType::N1, AtomType::N1),
            bond(Second, AtomType::N6, AtomType::O6),
        ],
    },
];

impl PairingPattern {
    /// Checks this rule against an ordered residue pair.
    ///
    /// The rule matches in either residue order; when `reference` plays the
    /// rule's second base the donor sides are swapped.
    pub fn matches(
        &self,
        reference: &Residue,
        residue: &Residue,
        orientation: Orientation,
        ranked: &[HBondFlow],
        size_hint: usize,
    ) -> bool {
        if self.bonds.len() > size_hint {
            return false;
        }
        if self.orientation.is_some_and(|o| o != orientation) {
            return false;
        }
        let (ref_type, res_type) = (reference.residue_type(), residue.residue_type());
        let reference_side = if ref_type == self.first && res_type == self.second {
            First
        } else if ref_type == self.second && res_type == self.first {
            Second
        } else {
            return false;
        };

        self.bonds.iter().all(|required| {
            let donor_is_reference = required.donor_side == reference_side;
            ranked.iter().any(|candidate| {
                let hbond = &candidate.hbond;
                let donated_by_reference = hbond.donor_residue() == Some(reference.id());
                donated_by_reference == donor_is_reference
                    && hbond.donor() == required.donor
                    && hbond.acceptor() == required.acceptor
            })
        })
    }

    /// Returns the label of the highest-priority matching rule.
    pub fn evaluate(
        reference: &Residue,
        residue: &Residue,
        orientation: Orientation,
        ranked: &[HBondFlow],
        size_hint: usize,
    ) -> Option<PairingLabel> {
        evaluate(reference, residue, orientation, ranked, size_hint)
    }
}

pub fn evaluate(
    reference: &Residue,
    residue: &Residue,
    orientation: Orientation,
    ranked: &[HBondFlow],
    size_hint: usize,
) -> Option<PairingLabel> {
    PATTERNS
        .iter()
        .find(|pattern| pattern.matches(reference, residue, orientation, ranked, size_hint))
        .map(|pattern| pattern.label)
}
