use super::atom::AtomType;
use crate::core::utils::geometry::{centroid, frame_from_points};
use crate::core::utils::identifiers::{amino_acid_code, nucleotide_letter};
use nalgebra::{Isometry3, Point3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResidueError {
    #[error("Residue {residue} has no atom '{atom}'")]
    MissingAtom { residue: ResidueId, atom: AtomType },
    #[error("Residue {residue} has unexpected type {residue_type}: {reason}")]
    UnexpectedType {
        residue: ResidueId,
        residue_type: ResidueType,
        reason: &'static str,
    },
    #[error("Residue {residue} has degenerate geometry: {reason}")]
    DegenerateGeometry {
        residue: ResidueId,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueType {
    A,
    C,
    G,
    U,
    T,
    /// A nucleotide whose base is not one of the five standard bases.
    Nucleotide,
    /// An amino acid, carrying its one-letter code.
    AminoAcid(char),
    /// The synthetic phosphate group built between two adjacent nucleotides.
    Phosphate,
    Other,
}

impl ResidueType {
    pub fn is_nucleic_acid(&self) -> bool {
        matches!(
            self,
            Self::A | Self::C | Self::G | Self::U | Self::T | Self::Nucleotide
        )
    }

    pub fn is_amino_acid(&self) -> bool {
        matches!(self, Self::AminoAcid(_))
    }

    pub fn is_purine(&self) -> bool {
        matches!(self, Self::A | Self::G)
    }

    pub fn is_pyrimidine(&self) -> bool {
        matches!(self, Self::C | Self::U | Self::T)
    }

    pub fn is_a(&self) -> bool {
        *self == Self::A
    }

    pub fn is_c(&self) -> bool {
        *self == Self::C
    }

    pub fn is_g(&self) -> bool {
        *self == Self::G
    }

    pub fn is_u(&self) -> bool {
        *self == Self::U
    }

    pub fn is_t(&self) -> bool {
        *self == Self::T
    }

    /// The standard base letter, for the five standard bases only.
    pub fn base_letter(&self) -> Option<char> {
        match self {
            Self::A => Some('A'),
            Self::C => Some('C'),
            Self::G => Some('G'),
            Self::U => Some('U'),
            Self::T => Some('T'),
            _ => None,
        }
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AminoAcid(code) => write!(f, "AminoAcid({code})"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

impl FromStr for ResidueType {
    type Err = ();

    /// Resolves a residue name as found in structure files. Unrecognised names
    /// map to [`ResidueType::Other`] rather than failing; the error type exists
    /// only for blank input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(());
        }
        if let Some(letter) = nucleotide_letter(s) {
            return Ok(match letter {
                'A' => Self::A,
                'C' => Self::C,
                'G' => Self::G,
                'U' => Self::U,
                'T' => Self::T,
                _ => Self::Nucleotide,
            });
        }
        Ok(amino_acid_code(s).map_or(Self::Other, Self::AminoAcid))
    }
}

/// Value identity of a residue: chain, sequence number and insertion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidueId {
    pub chain: char,
    pub number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion: Option<char>,
}

impl ResidueId {
    pub fn new(chain: char, number: i32) -> Self {
        Self {
            chain,
            number,
            insertion: None,
        }
    }

    pub fn with_insertion(mut self, insertion: char) -> Self {
        self.insertion = Some(insertion);
        self
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.chain, self.number)?;
        if let Some(insertion) = self.insertion {
            write!(f, "{insertion}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    id: ResidueId,
    residue_type: ResidueType,
    atoms: BTreeMap<AtomType, Point3<f64>>,
}

impl Residue {
    pub fn new(id: ResidueId, residue_type: ResidueType) -> Self {
        Self {
            id,
            residue_type,
            atoms: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> ResidueId {
        self.id
    }

    pub fn residue_type(&self) -> ResidueType {
        self.residue_type
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Inserts or replaces the position of `atom`.
    pub fn insert_atom(&mut self, atom: AtomType, position: Point3<f64>) -> Option<Point3<f64>> {
        self.atoms.insert(atom, position)
    }

    pub fn remove_atom(&mut self, atom: AtomType) -> Option<Point3<f64>> {
        self.atoms.remove(&atom)
    }

    pub fn with_atom(mut self, atom: AtomType, position: Point3<f64>) -> Self {
        self.atoms.insert(atom, position);
        self
    }

    pub fn find_atom(&self, atom: AtomType) -> Option<&Point3<f64>> {
        self.atoms.get(&atom)
    }

    pub fn safe_find_atom(&self, atom: AtomType) -> Result<&Point3<f64>, ResidueError> {
        self.atoms.get(&atom).ok_or(ResidueError::MissingAtom {
            residue: self.id,
            atom,
        })
    }

    pub fn atoms(&self) -> impl Iterator<Item = (AtomType, &Point3<f64>)> {
        self.atoms.iter().map(|(atom, position)| (*atom, position))
    }

    pub fn atoms_where<'a, F>(
        &'a self,
        mut predicate: F,
    ) -> impl Iterator<Item = (AtomType, &'a Point3<f64>)> + 'a
    where
        F: FnMut(AtomType) -> bool + 'a,
    {
        self.atoms().filter(move |(atom, _)| predicate(*atom))
    }

    pub fn centroid(&self) -> Option<Point3<f64>> {
        centroid(self.atoms.values())
    }

    /// The residue's local frame, mapping local coordinates to world coordinates.
    ///
    /// Pseudo-atoms PSO/PSX/PSY take precedence when present. Otherwise the
    /// frame is anchored on N9/C4/C8 for purines, N1/C2/C6 for pyrimidines and
    /// generic nucleotides carrying N1, CA/N/C for amino acids and P/OP1/OP2
    /// for the phosphate group.
    pub fn reference_frame(&self) -> Result<Isometry3<f64>, ResidueError> {
        let [origin, x_point, plane_point] = self.frame_anchors()?;
        frame_from_points(
            self.safe_find_atom(origin)?,
            self.safe_find_atom(x_point)?,
            self.safe_find_atom(plane_point)?,
        )
        .ok_or(ResidueError::DegenerateGeometry {
            residue: self.id,
            reason: "reference frame anchors are collinear",
        })
    }

    fn frame_anchors(&self) -> Result<[AtomType; 3], ResidueError> {
        if [AtomType::PSO, AtomType::PSX, AtomType::PSY]
            .iter()
            .all(|atom| self.atoms.contains_key(atom))
        {
            return Ok([AtomType::PSO, AtomType::PSX, AtomType::PSY]);
        }
        match self.residue_type {
            ResidueType::A | ResidueType::G => Ok([AtomType::N9, AtomType::C4, AtomType::C8]),
            ResidueType::C | ResidueType::U | ResidueType::T => {
                Ok([AtomType::N1, AtomType::C2, AtomType::C6])
            }
            ResidueType::Nucleotide if self.atoms.contains_key(&AtomType::N9) => {
                Ok([AtomType::N9, AtomType::C4, AtomType::C8])
            }
            ResidueType::Nucleotide => Ok([AtomType::N1, AtomType::C2, AtomType::C6]),
            ResidueType::AminoAcid(_) => Ok([AtomType::CA, AtomType::N, AtomType::C]),
            ResidueType::Phosphate => Ok([AtomType::P, AtomType::OP1, AtomType::OP2]),
            ResidueType::Other => Err(ResidueError::UnexpectedType {
                residue: self.id,
                residue_type: self.residue_type,
                reason: "no reference frame is defined for this residue type",
            }),
        }
    }

    /// A copy of this residue with every atom moved by `transform`.
    pub fn transformed(&self, transform: &Isometry3<f64>) -> Residue {
        Residue {
            id: self.id,
            residue_type: self.residue_type,
            atoms: self
                .atoms
                .iter()
                .map(|(atom, position)| (*atom, transform * position))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion, Vector3};

    fn pyrimidine_stub() -> Residue {
        Residue::new(ResidueId::new('A', 1), ResidueType::U)
            .with_atom(AtomType::N1, Point3::new(0.0, 0.0, 0.0))
            .with_atom(AtomType::C2, Point3::new(1.4, 0.0, 0.0))
            .with_atom(AtomType::C6, Point3::new(-0.7, 1.2, 0.0))
    }

    #[test]
    fn residue_type_from_str_recognizes_nucleotides_and_amino_acids() {
        assert_eq!("G".parse::<ResidueType>(), Ok(ResidueType::G));
        assert_eq!("DT".parse::<ResidueType>(), Ok(ResidueType::T));
        assert_eq!("N".parse::<ResidueType>(), Ok(ResidueType::Nucleotide));
        assert_eq!("LYS".parse::<ResidueType>(), Ok(ResidueType::AminoAcid('K')));
        assert_eq!("HOH".parse::<ResidueType>(), Ok(ResidueType::Other));
        assert_eq!("  ".parse::<ResidueType>(), Err(()));
    }

    #[test]
    fn residue_type_predicates_are_consistent() {
        assert!(ResidueType::A.is_purine() && ResidueType::A.is_nucleic_acid());
        assert!(ResidueType::T.is_pyrimidine() && ResidueType::T.is_t());
        assert!(!ResidueType::Nucleotide.is_purine() && !ResidueType::Nucleotide.is_pyrimidine());
        assert!(ResidueType::AminoAcid('W').is_amino_acid());
        assert!(!ResidueType::Phosphate.is_nucleic_acid());
        assert_eq!(ResidueType::U.base_letter(), Some('U'));
        assert_eq!(ResidueType::Nucleotide.base_letter(), None);
    }

    #[test]
    fn residue_id_displays_chain_number_and_insertion() {
        assert_eq!(ResidueId::new('B', 42).to_string(), "B42");
        assert_eq!(ResidueId::new('A', -3).with_insertion('b').to_string(), "A-3b");
    }

    #[test]
    fn safe_find_atom_reports_the_missing_atom() {
        let residue = pyrimidine_stub();
        assert!(residue.safe_find_atom(AtomType::N1).is_ok());
        assert_eq!(
            residue.safe_find_atom(AtomType::O2),
            Err(ResidueError::MissingAtom {
                residue: ResidueId::new('A', 1),
                atom: AtomType::O2,
            })
        );
    }

    #[test]
    fn atoms_where_filters_by_atom_type() {
        let residue = pyrimidine_stub();
        let carbons: Vec<_> = residue.atoms_where(|atom| atom.is_carbon()).map(|(a, _)| a).collect();
        assert_eq!(carbons, vec![AtomType::C2, AtomType::C6]);
    }

    #[test]
    fn reference_frame_places_origin_on_anchor_atom() {
        let residue = pyrimidine_stub();
        let frame = residue.reference_frame().unwrap();
        assert!((frame * Point3::origin() - Point3::new(0.0, 0.0, 0.0)).norm() < 1e-12);
        assert!(((frame * Vector3::x()) - Vector3::x()).norm() < 1e-12);
        assert!(((frame * Vector3::z()) - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn reference_frame_prefers_pseudo_atoms() {
        let residue = pyrimidine_stub()
            .with_atom(AtomType::PSO, Point3::new(5.0, 5.0, 5.0))
            .with_atom(AtomType::PSX, Point3::new(5.0, 6.0, 5.0))
            .with_atom(AtomType::PSY, Point3::new(4.0, 5.0, 5.0));
        let frame = residue.reference_frame().unwrap();
        assert!((frame * Point3::origin() - Point3::new(5.0, 5.0, 5.0)).norm() < 1e-12);
        assert!(((frame * Vector3::x()) - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn reference_frame_fails_for_missing_anchor_and_unknown_type() {
        let mut residue = pyrimidine_stub();
        residue.remove_atom(AtomType::C6);
        assert!(matches!(
            residue.reference_frame(),
            Err(ResidueError::MissingAtom { atom: AtomType::C6, .. })
        ));

        let other = Residue::new(ResidueId::new('W', 1), ResidueType::Other);
        assert!(matches!(
            other.reference_frame(),
            Err(ResidueError::UnexpectedType { .. })
        ));
    }

    #[test]
    fn transformed_moves_frame_with_atoms() {
        let residue = pyrimidine_stub();
        let motion = nalgebra::Isometry3::from_parts(
            Translation3::new(1.0, -2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7),
        );
        let moved = residue.transformed(&motion);
        let expected = motion * residue.reference_frame().unwrap();
        let actual = moved.reference_frame().unwrap();
        assert!((expected.to_homogeneous() - actual.to_homogeneous()).norm() < 1e-9);
        assert_eq!(moved.id(), residue.id());
    }
}
