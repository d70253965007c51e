use crate::core::utils::identifiers::{AtomClass, Element, Moiety, atom_class};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown atom type name: '{0}'")]
pub struct UnknownAtomType(pub String);

/// An interned atom type, identified by its canonical name.
///
/// Atom types form a closed set: the only way to obtain one is through the
/// associated constants or [`AtomType::from_name`], which resolves against a
/// compile-time catalog. Two atom types are equal exactly when their canonical
/// names are equal, so the type is cheap to copy, hash and order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomType(&'static str);

macro_rules! atom_types {
    ($($ident:ident => $name:literal),* $(,)?) => {
        impl AtomType {
            $(pub const $ident: AtomType = AtomType($name);)*
        }
    };
}

atom_types! {
    P => "P", OP1 => "OP1", OP2 => "OP2", OP3 => "OP3",
    O5_PRIME => "O5'", C5_PRIME => "C5'", C4_PRIME => "C4'", O4_PRIME => "O4'",
    C3_PRIME => "C3'", O3_PRIME => "O3'", C2_PRIME => "C2'", O2_PRIME => "O2'",
    C1_PRIME => "C1'",

    N1 => "N1", C2 => "C2", N3 => "N3", C4 => "C4", C5 => "C5", C6 => "C6",
    N7 => "N7", C8 => "C8", N9 => "N9", O2 => "O2", O4 => "O4", O6 => "O6",
    N2 => "N2", N4 => "N4", N6 => "N6", C5M => "C5M", C7 => "C7",

    H1 => "H1", H2 => "H2", H21 => "H21", H22 => "H22", H3 => "H3",
    H41 => "H41", H42 => "H42", H5 => "H5", H6 => "H6", H61 => "H61",
    H62 => "H62", H8 => "H8", METHYL_H => "HM5",

    LP1 => "LP1", LP3 => "LP3", LP7 => "LP7",
    LP2_1 => "1LP2", LP2_2 => "2LP2", LP4_1 => "1LP4", LP4_2 => "2LP4",
    LP6_1 => "1LP6", LP6_2 => "2LP6",

    PSO => "PSO", PSX => "PSX", PSY => "PSY", PSZ => "PSZ",

    N => "N", CA => "CA", C => "C", O => "O",
}

impl AtomType {
    pub fn from_name(name: &str) -> Option<Self> {
        atom_class(name).map(|(canonical, _)| AtomType(canonical))
    }

    pub fn name(&self) -> &'static str {
        self.0
    }

    fn class(&self) -> AtomClass {
        // Every `AtomType` is built from a catalog key, so the lookup cannot miss.
        atom_class(self.0).map_or(
            AtomClass {
                element: Element::Pseudo,
                moiety: Moiety::Pseudo,
            },
            |(_, class)| class,
        )
    }

    pub fn element(&self) -> Element {
        self.class().element
    }

    pub fn moiety(&self) -> Moiety {
        self.class().moiety
    }

    pub fn is_nitrogen(&self) -> bool {
        self.element() == Element::N
    }

    pub fn is_oxygen(&self) -> bool {
        self.element() == Element::O
    }

    pub fn is_carbon(&self) -> bool {
        self.element() == Element::C
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element() == Element::H
    }

    pub fn is_lone_pair(&self) -> bool {
        self.element() == Element::LonePair
    }

    pub fn is_phosphorus(&self) -> bool {
        self.element() == Element::P
    }

    pub fn is_pseudo(&self) -> bool {
        self.element() == Element::Pseudo
    }

    /// Carbon, nitrogen or oxygen: the atoms that can anchor a hydrogen bond.
    pub fn is_polar_heavy(&self) -> bool {
        matches!(self.element(), Element::C | Element::N | Element::O)
    }

    /// Sugar-phosphate atoms of nucleotides and main-chain atoms of amino acids.
    pub fn is_backbone(&self) -> bool {
        matches!(
            self.moiety(),
            Moiety::Phosphate | Moiety::Sugar | Moiety::PeptideBackbone
        )
    }

    /// Base atoms of nucleotides and side-chain atoms of amino acids.
    pub fn is_side_chain(&self) -> bool {
        matches!(
            self.moiety(),
            Moiety::Base | Moiety::BaseMethyl | Moiety::AminoSideChain
        )
    }

    pub fn is_phosphate(&self) -> bool {
        self.moiety() == Moiety::Phosphate
    }

    pub fn is_methyl(&self) -> bool {
        self.moiety() == Moiety::BaseMethyl
    }
}

impl fmt::Debug for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AtomType({})", self.0)
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for AtomType {
    type Err = UnknownAtomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AtomType::from_name(s).ok_or_else(|| UnknownAtomType(s.to_string()))
    }
}

impl Serialize for AtomType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for AtomType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse::<AtomType>().map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_interns_to_the_matching_constant() {
        assert_eq!(AtomType::from_name("O3'"), Some(AtomType::O3_PRIME));
        assert_eq!(AtomType::from_name(" 2LP6"), Some(AtomType::LP6_2));
        assert_eq!(AtomType::from_name("ZZ"), None);
    }

    #[test]
    fn every_constant_is_in_the_catalog() {
        for atom in [
            AtomType::P,
            AtomType::C1_PRIME,
            AtomType::C5M,
            AtomType::METHYL_H,
            AtomType::LP2_1,
            AtomType::PSZ,
            AtomType::CA,
        ] {
            assert_eq!(AtomType::from_name(atom.name()), Some(atom));
        }
    }

    #[test]
    fn element_predicates_follow_the_catalog() {
        assert!(AtomType::N7.is_nitrogen());
        assert!(AtomType::O2_PRIME.is_oxygen());
        assert!(AtomType::C8.is_carbon());
        assert!(AtomType::H61.is_hydrogen());
        assert!(AtomType::LP1.is_lone_pair());
        assert!(AtomType::P.is_phosphorus());
        assert!(AtomType::PSX.is_pseudo());
        assert!(!AtomType::P.is_polar_heavy());
        assert!(AtomType::O6.is_polar_heavy());
    }

    #[test]
    fn backbone_and_side_chain_partition_real_atoms() {
        assert!(AtomType::O2_PRIME.is_backbone());
        assert!(AtomType::OP1.is_backbone() && AtomType::OP1.is_phosphate());
        assert!(AtomType::CA.is_backbone());
        assert!(AtomType::N6.is_side_chain());
        assert!(AtomType::C5M.is_side_chain() && AtomType::C5M.is_methyl());
        assert!(!AtomType::PSO.is_backbone() && !AtomType::PSO.is_side_chain());
        assert!(!AtomType::O4_PRIME.is_phosphate());
    }

    #[test]
    fn atom_type_round_trips_through_serde_as_its_name() {
        let json = serde_json::to_string(&AtomType::H21).unwrap();
        assert_eq!(json, "\"H21\"");
        let back: AtomType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AtomType::H21);
        assert!(serde_json::from_str::<AtomType>("\"NOPE\"").is_err());
    }
}
