use phf::{Map, phf_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H,
    C,
    N,
    O,
    P,
    S,
    LonePair,
    Pseudo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moiety {
    Phosphate,
    Sugar,
    Base,
    BaseMethyl,
    PeptideBackbone,
    AminoSideChain,
    Pseudo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomClass {
    pub element: Element,
    pub moiety: Moiety,
}

macro_rules! class {
    ($element:ident, $moiety:ident) => {
        AtomClass {
            element: Element::$element,
            moiety: Moiety::$moiety,
        }
    };
}

pub(crate) static ATOM_CATALOG: Map<&'static str, AtomClass> = phf_map! {
    // Sugar-phosphate backbone.
    "P" => class!(P, Phosphate), "OP1" => class!(O, Phosphate), "OP2" => class!(O, Phosphate),
    "OP3" => class!(O, Phosphate), "O5'" => class!(O, Phosphate), "O3'" => class!(O, Phosphate),
    "C5'" => class!(C, Sugar), "C4'" => class!(C, Sugar), "O4'" => class!(O, Sugar),
    "C3'" => class!(C, Sugar), "C2'" => class!(C, Sugar), "O2'" => class!(O, Sugar),
    "C1'" => class!(C, Sugar),
    "H5'" => class!(H, Sugar), "H5''" => class!(H, Sugar), "H4'" => class!(H, Sugar),
    "H3'" => class!(H, Sugar), "H2'" => class!(H, Sugar), "H2''" => class!(H, Sugar),
    "H1'" => class!(H, Sugar), "HO2'" => class!(H, Sugar), "HO3'" => class!(H, Sugar),
    "HO5'" => class!(H, Sugar),

    // Bases.
    "N1" => class!(N, Base), "C2" => class!(C, Base), "N3" => class!(N, Base),
    "C4" => class!(C, Base), "C5" => class!(C, Base), "C6" => class!(C, Base),
    "N7" => class!(N, Base), "C8" => class!(C, Base), "N9" => class!(N, Base),
    "O2" => class!(O, Base), "O4" => class!(O, Base), "O6" => class!(O, Base),
    "N2" => class!(N, Base), "N4" => class!(N, Base), "N6" => class!(N, Base),
    "H1" => class!(H, Base), "H2" => class!(H, Base), "H21" => class!(H, Base),
    "H22" => class!(H, Base), "H3" => class!(H, Base), "H41" => class!(H, Base),
    "H42" => class!(H, Base), "H5" => class!(H, Base), "H6" => class!(H, Base),
    "H61" => class!(H, Base), "H62" => class!(H, Base), "H8" => class!(H, Base),
    "LP1" => class!(LonePair, Base), "LP3" => class!(LonePair, Base), "LP7" => class!(LonePair, Base),
    "1LP2" => class!(LonePair, Base), "2LP2" => class!(LonePair, Base),
    "1LP4" => class!(LonePair, Base), "2LP4" => class!(LonePair, Base),
    "1LP6" => class!(LonePair, Base), "2LP6" => class!(LonePair, Base),
    "C5M" => class!(C, BaseMethyl), "C7" => class!(C, BaseMethyl),
    "H71" => class!(H, BaseMethyl), "H72" => class!(H, BaseMethyl), "H73" => class!(H, BaseMethyl),
    "HM5" => class!(H, BaseMethyl),

    // Reference-frame pseudo-atoms.
    "PSO" => class!(Pseudo, Pseudo), "PSX" => class!(Pseudo, Pseudo),
    "PSY" => class!(Pseudo, Pseudo), "PSZ" => class!(Pseudo, Pseudo),

    // Peptide backbone.
    "N" => class!(N, PeptideBackbone), "CA" => class!(C, PeptideBackbone),
    "C" => class!(C, PeptideBackbone), "O" => class!(O, PeptideBackbone),
    "OXT" => class!(O, PeptideBackbone), "H" => class!(H, PeptideBackbone),
    "HA" => class!(H, PeptideBackbone), "HA2" => class!(H, PeptideBackbone),
    "HA3" => class!(H, PeptideBackbone),

    // Amino-acid side chains.
    "CB" => class!(C, AminoSideChain), "CG" => class!(C, AminoSideChain),
    "CG1" => class!(C, AminoSideChain), "CG2" => class!(C, AminoSideChain),
    "CD" => class!(C, AminoSideChain), "CD1" => class!(C, AminoSideChain),
    "CD2" => class!(C, AminoSideChain), "CE" => class!(C, AminoSideChain),
    "CE1" => class!(C, AminoSideChain), "CE2" => class!(C, AminoSideChain),
    "CE3" => class!(C, AminoSideChain), "CZ" => class!(C, AminoSideChain),
    "CZ2" => class!(C, AminoSideChain), "CZ3" => class!(C, AminoSideChain),
    "CH2" => class!(C, AminoSideChain),
    "ND1" => class!(N, AminoSideChain), "ND2" => class!(N, AminoSideChain),
    "NE" => class!(N, AminoSideChain), "NE1" => class!(N, AminoSideChain),
    "NE2" => class!(N, AminoSideChain), "NH1" => class!(N, AminoSideChain),
    "NH2" => class!(N, AminoSideChain), "NZ" => class!(N, AminoSideChain),
    "OD1" => class!(O, AminoSideChain), "OD2" => class!(O, AminoSideChain),
    "OE1" => class!(O, AminoSideChain), "OE2" => class!(O, AminoSideChain),
    "OG" => class!(O, AminoSideChain), "OG1" => class!(O, AminoSideChain),
    "OH" => class!(O, AminoSideChain),
    "SD" => class!(S, AminoSideChain), "SG" => class!(S, AminoSideChain),
    "HB" => class!(H, AminoSideChain), "HB2" => class!(H, AminoSideChain),
    "HB3" => class!(H, AminoSideChain), "HG" => class!(H, AminoSideChain),
    "HG1" => class!(H, AminoSideChain), "HE" => class!(H, AminoSideChain),
    "HE1" => class!(H, AminoSideChain), "HE2" => class!(H, AminoSideChain),
    "HD1" => class!(H, AminoSideChain), "HD2" => class!(H, AminoSideChain),
    "HD21" => class!(H, AminoSideChain), "HD22" => class!(H, AminoSideChain),
    "HE21" => class!(H, AminoSideChain), "HE22" => class!(H, AminoSideChain),
    "HH" => class!(H, AminoSideChain), "HH11" => class!(H, AminoSideChain),
    "HH12" => class!(H, AminoSideChain), "HH21" => class!(H, AminoSideChain),
    "HH22" => class!(H, AminoSideChain), "HZ1" => class!(H, AminoSideChain),
    "HZ2" => class!(H, AminoSideChain), "HZ3" => class!(H, AminoSideChain),
};

static AMINO_ACID_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H',
    "HIP" => 'H', "CYX" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
};

/// Standard base letter for a nucleotide residue name, accepting the usual
/// one-letter, three-letter and DNA-prefixed spellings.
static NUCLEOTIDE_LETTERS: Map<&'static str, char> = phf_map! {
    "A" => 'A', "ADE" => 'A', "DA" => 'A', "RA" => 'A', "A5" => 'A', "A3" => 'A',
    "C" => 'C', "CYT" => 'C', "DC" => 'C', "RC" => 'C', "C5" => 'C', "C3" => 'C',
    "G" => 'G', "GUA" => 'G', "DG" => 'G', "RG" => 'G', "G5" => 'G', "G3" => 'G',
    "U" => 'U', "URA" => 'U', "URI" => 'U', "RU" => 'U', "U5" => 'U', "U3" => 'U',
    "T" => 'T', "THY" => 'T', "DT" => 'T', "DT5" => 'T', "DT3" => 'T',
    "N" => 'N', "DN" => 'N',
};

pub fn atom_class(name: &str) -> Option<(&'static str, AtomClass)> {
    ATOM_CATALOG
        .get_entry(name.trim())
        .map(|(key, class)| (*key, *class))
}

pub fn amino_acid_code(residue_name: &str) -> Option<char> {
    AMINO_ACID_CODES
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
}

pub fn nucleotide_letter(residue_name: &str) -> Option<char> {
    NUCLEOTIDE_LETTERS
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_class_resolves_canonical_names_and_trims_whitespace() {
        let (name, class) = atom_class(" O2' ").unwrap();
        assert_eq!(name, "O2'");
        assert_eq!(class.element, Element::O);
        assert_eq!(class.moiety, Moiety::Sugar);
    }

    #[test]
    fn atom_class_is_case_sensitive() {
        assert!(atom_class("ca").is_none());
        assert!(atom_class("CA").is_some());
    }

    #[test]
    fn lone_pairs_and_methyls_are_classified() {
        assert_eq!(atom_class("2LP6").unwrap().1.element, Element::LonePair);
        assert_eq!(atom_class("C5M").unwrap().1.moiety, Moiety::BaseMethyl);
        assert_eq!(atom_class("C7").unwrap().1.moiety, Moiety::BaseMethyl);
    }

    #[test]
    fn unknown_atom_names_are_rejected() {
        assert!(atom_class("XX9").is_none());
        assert!(atom_class("").is_none());
    }

    #[test]
    fn residue_name_tables_accept_common_spellings() {
        assert_eq!(nucleotide_letter("dg"), Some('G'));
        assert_eq!(nucleotide_letter("URA"), Some('U'));
        assert_eq!(nucleotide_letter("ALA"), None);
        assert_eq!(amino_acid_code("trp"), Some('W'));
        assert_eq!(amino_acid_code("HSE"), Some('H'));
        assert_eq!(amino_acid_code("G"), None);
    }
}
