use crate::core::pattern::PairingLabel;
use crate::core::rings::StackingDirection;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Analysis categories of a relation.
    ///
    /// Passed to `annotate` to select the analyses to run; on a relation, a set
    /// bit means the category produced at least one label.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AnnotationMask: u8 {
        const ADJACENT = 0b0001;
        const STACKING = 0b0010;
        const PAIRING = 0b0100;
        const BHBOND = 0b1000;
        const ALL = Self::ADJACENT.bits() | Self::STACKING.bits() | Self::PAIRING.bits() | Self::BHBOND.bits();
    }
}

/// A qualitative tag attached to a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    /// The residue follows the reference along the chain.
    Adjacent5p,
    /// The residue precedes the reference along the chain.
    Adjacent3p,
    Upward,
    Downward,
    Inward,
    Outward,
    Parallel,
    Antiparallel,
    Cis,
    Trans,
    Pairing,
    OneHBond,
    Pattern(PairingLabel),
    BackboneHBond,
    BasePhosphate,
    BaseRibose,
}

impl Label {
    /// The label seen from the other residue.
    pub fn inverted(self) -> Label {
        match self {
            Label::Adjacent5p => Label::Adjacent3p,
            Label::Adjacent3p => Label::Adjacent5p,
            Label::Upward => Label::Downward,
            Label::Downward => Label::Upward,
            other => other,
        }
    }

    /// The analysis category that produces this label.
    pub fn category(self) -> AnnotationMask {
        match self {
            Label::Adjacent5p | Label::Adjacent3p => AnnotationMask::ADJACENT,
            Label::Upward | Label::Downward | Label::Inward | Label::Outward => {
                AnnotationMask::STACKING
            }
            Label::Parallel
            | Label::Antiparallel
            | Label::Cis
            | Label::Trans
            | Label::Pairing
            | Label::OneHBond
            | Label::Pattern(_) => AnnotationMask::PAIRING,
            Label::BackboneHBond | Label::BasePhosphate | Label::BaseRibose => {
                AnnotationMask::BHBOND
            }
        }
    }
}

impl From<StackingDirection> for Label {
    fn from(direction: StackingDirection) -> Self {
        match direction {
            StackingDirection::Upward => Label::Upward,
            StackingDirection::Downward => Label::Downward,
            StackingDirection::Inward => Label::Inward,
            StackingDirection::Outward => Label::Outward,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Adjacent5p => f.write_str("adjacent_5p"),
            Label::Adjacent3p => f.write_str("adjacent_3p"),
            Label::Upward => f.write_str("upward"),
            Label::Downward => f.write_str("downward"),
            Label::Inward => f.write_str("inward"),
            Label::Outward => f.write_str("outward"),
            Label::Parallel => f.write_str("parallel"),
            Label::Antiparallel => f.write_str("antiparallel"),
            Label::Cis => f.write_str("cis"),
            Label::Trans => f.write_str("trans"),
            Label::Pairing => f.write_str("pairing"),
            Label::OneHBond => f.write_str("one_hbond"),
            Label::Pattern(pattern) => write!(f, "{pattern}"),
            Label::BackboneHBond => f.write_str("backbone_hbond"),
            Label::BasePhosphate => f.write_str("base_phosphate"),
            Label::BaseRibose => f.write_str("base_ribose"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inversion_swaps_directional_labels_only() {
        assert_eq!(Label::Adjacent5p.inverted(), Label::Adjacent3p);
        assert_eq!(Label::Downward.inverted(), Label::Upward);
        assert_eq!(Label::Inward.inverted(), Label::Inward);
        assert_eq!(Label::Cis.inverted(), Label::Cis);
        assert_eq!(Label::Antiparallel.inverted(), Label::Antiparallel);
        let pattern = Label::Pattern(PairingLabel::Wobble);
        assert_eq!(pattern.inverted(), pattern);
    }

    #[test]
    fn every_label_belongs_to_one_category() {
        assert_eq!(Label::Adjacent3p.category(), AnnotationMask::ADJACENT);
        assert_eq!(Label::Outward.category(), AnnotationMask::STACKING);
        assert_eq!(Label::Pattern(PairingLabel::Imino).category(), AnnotationMask::PAIRING);
        assert_eq!(Label::BaseRibose.category(), AnnotationMask::BHBOND);
    }

    #[test]
    fn all_mask_covers_every_category() {
        assert!(AnnotationMask::ALL.contains(
            AnnotationMask::ADJACENT
                | AnnotationMask::STACKING
                | AnnotationMask::PAIRING
                | AnnotationMask::BHBOND
        ));
        assert_eq!(AnnotationMask::ALL.bits(), 0b1111);
    }

    #[test]
    fn labels_serialize_in_kebab_case() {
        let json = serde_json::to_string(&Label::Pattern(PairingLabel::WatsonCrick)).unwrap();
        assert_eq!(json, r#"{"pattern":"watson-crick"}"#);
        assert_eq!(serde_json::to_string(&Label::OneHBond).unwrap(), r#""one-h-bond""#);
    }
}
