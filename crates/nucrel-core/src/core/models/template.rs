//! Idealized standard bases.
//!
//! Heavy-atom coordinates are the standard reference geometry of each base,
//! lying in the z = 0 plane with C1' on the minor-groove side. Hydrogens and
//! lone pairs are then placed by fixed sp2 rules, so every template carries the
//! full set of donor and acceptor sites the hydrogen-bond machinery expects.

use super::atom::AtomType;
use super::residue::{Residue, ResidueId, ResidueType};
use crate::core::utils::geometry::{bisector_substituent, distance, trigonal_substituents};
use nalgebra::{Point3, Vector3};

pub const NH_BOND_LENGTH: f64 = 1.01;
pub const CH_BOND_LENGTH: f64 = 1.08;
pub const LONE_PAIR_DISTANCE: f64 = 1.0;

type HeavyAtoms = &'static [(AtomType, [f64; 3])];

const ADENINE: HeavyAtoms = &[
    (AtomType::C1_PRIME, [-2.479, 5.346, 0.000]),
    (AtomType::N9, [-1.291, 4.498, 0.000]),
    (AtomType::C8, [0.024, 4.897, 0.000]),
    (AtomType::N7, [0.877, 3.902, 0.000]),
    (AtomType::C5, [0.071, 2.771, 0.000]),
    (AtomType::C6, [0.369, 1.398, 0.000]),
    (AtomType::N6, [1.611, 0.909, 0.000]),
    (AtomType::N1, [-0.668, 0.532, 0.000]),
    (AtomType::C2, [-1.912, 1.023, 0.000]),
    (AtomType::N3, [-2.320, 2.290, 0.000]),
    (AtomType::C4, [-1.267, 3.124, 0.000]),
];

const GUANINE: HeavyAtoms = &[
    (AtomType::C1_PRIME, [-2.477, 5.399, 0.000]),
    (AtomType::N9, [-1.289, 4.551, 0.000]),
    (AtomType::C8, [0.023, 4.962, 0.000]),
    (AtomType::N7, [0.870, 3.969, 0.000]),
    (AtomType::C5, [0.071, 2.833, 0.000]),
    (AtomType::C6, [0.424, 1.460, 0.000]),
    (AtomType::O6, [1.554, 0.955, 0.000]),
    (AtomType::N1, [-0.700, 0.641, 0.000]),
    (AtomType::C2, [-1.999, 1.087, 0.000]),
    (AtomType::N2, [-2.949, 0.139, -0.001]),
    (AtomType::N3, [-2.342, 2.364, 0.001]),
    (AtomType::C4, [-1.265, 3.177, 0.000]),
];

const CYTOSINE: HeavyAtoms = &[
    (AtomType::C1_PRIME, [-2.477, 5.402, 0.000]),
    (AtomType::N1, [-1.285, 4.542, 0.000]),
    (AtomType::C2, [-1.472, 3.158, 0.000]),
    (AtomType::O2, [-2.628, 2.709, 0.001]),
    (AtomType::N3, [-0.391, 2.344, 0.000]),
    (AtomType::C4, [0.837, 2.868, 0.000]),
    (AtomType::N4, [1.875, 2.027, 0.001]),
    (AtomType::C5, [1.056, 4.275, 0.000]),
    (AtomType::C6, [-0.023, 5.068, 0.000]),
];

const URACIL: HeavyAtoms = &[
    (AtomType::C1_PRIME, [-2.481, 5.354, 0.000]),
    (AtomType::N1, [-1.284, 4.500, 0.000]),
    (AtomType::C2, [-1.462, 3.135, 0.000]),
    (AtomType::O2, [-2.562, 2.608, 0.000]),
    (AtomType::N3, [-0.298, 2.407, 0.000]),
    (AtomType::C4, [0.994, 2.897, 0.000]),
    (AtomType::O4, [1.944, 2.119, 0.000]),
    (AtomType::C5, [1.106, 4.338, 0.000]),
    (AtomType::C6, [-0.024, 5.057, 0.000]),
];

const THYMINE: HeavyAtoms = &[
    (AtomType::C1_PRIME, [-2.481, 5.354, 0.000]),
    (AtomType::N1, [-1.284, 4.500, 0.000]),
    (AtomType::C2, [-1.462, 3.135, 0.000]),
    (AtomType::O2, [-2.562, 2.608, 0.000]),
    (AtomType::N3, [-0.298, 2.407, 0.000]),
    (AtomType::C4, [0.994, 2.897, 0.000]),
    (AtomType::O4, [1.944, 2.119, 0.000]),
    (AtomType::C5, [1.106, 4.338, 0.000]),
    (AtomType::C5M, [2.466, 4.961, 0.001]),
    (AtomType::C6, [-0.024, 5.057, 0.000]),
];

/// How a hydrogen or lone pair is placed from the heavy-atom skeleton.
#[derive(Debug, Clone, Copy)]
enum Site {
    /// Single substituent on the exterior bisector of a ring atom.
    Bisector {
        atom: AtomType,
        center: AtomType,
        neighbors: [AtomType; 2],
        length: f64,
    },
    /// Two substituents on an exocyclic trigonal atom; `atoms[0]` takes the
    /// position closer to `near`.
    Trigonal {
        atoms: [AtomType; 2],
        center: AtomType,
        neighbor: AtomType,
        near: AtomType,
        length: f64,
    },
}

use Site::{Bisector, Trigonal};

const ADENINE_SITES: &[Site] = &[
    Bisector { atom: AtomType::H8, center: AtomType::C8, neighbors: [AtomType::N7, AtomType::N9], length: CH_BOND_LENGTH },
    Bisector { atom: AtomType::H2, center: AtomType::C2, neighbors: [AtomType::N1, AtomType::N3], length: CH_BOND_LENGTH },
    Trigonal { atoms: [AtomType::H61, AtomType::H62], center: AtomType::N6, neighbor: AtomType::C6, near: AtomType::N1, length: NH_BOND_LENGTH },
    Bisector { atom: AtomType::LP1, center: AtomType::N1, neighbors: [AtomType::C2, AtomType::C6], length: LONE_PAIR_DISTANCE },
    Bisector { atom: AtomType::LP3, center: AtomType::N3, neighbors: [AtomType::C2, AtomType::C4], length: LONE_PAIR_DISTANCE },
    Bisector { atom: AtomType::LP7, center: AtomType::N7, neighbors: [AtomType::C5, AtomType::C8], length: LONE_PAIR_DISTANCE },
];

const GUANINE_SITES: &[Site] = &[
    Bisector { atom: AtomType::H8, center: AtomType::C8, neighbors: [AtomType::N7, AtomType::N9], length: CH_BOND_LENGTH },
    Bisector { atom: AtomType::H1, center: AtomType::N1, neighbors: [AtomType::C2, AtomType::C6], length: NH_BOND_LENGTH },
    Trigonal { atoms: [AtomType::H21, AtomType::H22], center: AtomType::N2, neighbor: AtomType::C2, near: AtomType::N1, length: NH_BOND_LENGTH },
    Bisector { atom: AtomType::LP3, center: AtomType::N3, neighbors: [AtomType::C2, AtomType::C4], length: LONE_PAIR_DISTANCE },
    Bisector { atom: AtomType::LP7, center: AtomType::N7, neighbors: [AtomType::C5, AtomType::C8], length: LONE_PAIR_DISTANCE },
    Trigonal { atoms: [AtomType::LP6_1, AtomType::LP6_2], center: AtomType::O6, neighbor: AtomType::C6, near: AtomType::C5, length: LONE_PAIR_DISTANCE },
];

const CYTOSINE_SITES: &[Site] = &[
    Bisector { atom: AtomType::H5, center: AtomType::C5, neighbors: [AtomType::C4, AtomType::C6], length: CH_BOND_LENGTH },
    Bisector { atom: AtomType::H6, center: AtomType::C6, neighbors: [AtomType::C5, AtomType::N1], length: CH_BOND_LENGTH },
    Trigonal { atoms: [AtomType::H41, AtomType::H42], center: AtomType::N4, neighbor: AtomType::C4, near: AtomType::N3, length: NH_BOND_LENGTH },
    Bisector { atom: AtomType::LP3, center: AtomType::N3, neighbors: [AtomType::C2, AtomType::C4], length: LONE_PAIR_DISTANCE },
    Trigonal { atoms: [AtomType::LP2_1, AtomType::LP2_2], center: AtomType::O2, neighbor: AtomType::C2, near: AtomType::N1, length: LONE_PAIR_DISTANCE },
];

const URACIL_SITES: &[Site] = &[
    Bisector { atom: AtomType::H5, center: AtomType::C5, neighbors: [AtomType::C4, AtomType::C6], length: CH_BOND_LENGTH },
    Bisector { atom: AtomType::H6, center: AtomType::C6, neighbors: [AtomType::C5, AtomType::N1], length: CH_BOND_LENGTH },
    Bisector { atom: AtomType::H3, center: AtomType::N3, neighbors: [AtomType::C2, AtomType::C4], length: NH_BOND_LENGTH },
    Trigonal { atoms: [AtomType::LP4_1, AtomType::LP4_2], center: AtomType::O4, neighbor: AtomType::C4, near: AtomType::C5, length: LONE_PAIR_DISTANCE },
    Trigonal { atoms: [AtomType::LP2_1, AtomType::LP2_2], center: AtomType::O2, neighbor: AtomType::C2, near: AtomType::N1, length: LONE_PAIR_DISTANCE },
];

const THYMINE_SITES: &[Site] = &[
    Bisector { atom: AtomType::H6, center: AtomType::C6, neighbors: [AtomType::C5, AtomType::N1], length: CH_BOND_LENGTH },
    Bisector { atom: AtomType::H3, center: AtomType::N3, neighbors: [AtomType::C2, AtomType::C4], length: NH_BOND_LENGTH },
    Trigonal { atoms: [AtomType::LP4_1, AtomType::LP4_2], center: AtomType::O4, neighbor: AtomType::C4, near: AtomType::C5, length: LONE_PAIR_DISTANCE },
    Trigonal { atoms: [AtomType::LP2_1, AtomType::LP2_2], center: AtomType::O2, neighbor: AtomType::C2, near: AtomType::N1, length: LONE_PAIR_DISTANCE },
];

/// Builds the idealized base of the given type, in the standard base frame.
///
/// Returns `None` for anything other than the five standard bases.
pub fn ideal_base(residue_type: ResidueType, id: ResidueId) -> Option<Residue> {
    let (heavy, sites) = match residue_type {
        ResidueType::A => (ADENINE, ADENINE_SITES),
        ResidueType::G => (GUANINE, GUANINE_SITES),
        ResidueType::C => (CYTOSINE, CYTOSINE_SITES),
        ResidueType::U => (URACIL, URACIL_SITES),
        ResidueType::T => (THYMINE, THYMINE_SITES),
        _ => return None,
    };

    let mut residue = Residue::new(id, residue_type);
    for &(atom, [x, y, z]) in heavy {
        residue.insert_atom(atom, Point3::new(x, y, z));
    }
    for site in sites {
        place_site(&mut residue, site)?;
    }
    Some(residue)
}

fn place_site(residue: &mut Residue, site: &Site) -> Option<()> {
    match *site {
        Bisector {
            atom,
            center,
            neighbors: [a, b],
            length,
        } => {
            let position = bisector_substituent(
                residue.find_atom(center)?,
                residue.find_atom(a)?,
                residue.find_atom(b)?,
                length,
            )?;
            residue.insert_atom(atom, position);
        }
        Trigonal {
            atoms: [first, second],
            center,
            neighbor,
            near,
            length,
        } => {
            let [p, q] = trigonal_substituents(
                residue.find_atom(center)?,
                residue.find_atom(neighbor)?,
                &Vector3::z(),
                length,
            )?;
            let near = *residue.find_atom(near)?;
            let (close, far) = if distance(&p, &near) <= distance(&q, &near) {
                (p, q)
            } else {
                (q, p)
            };
            residue.insert_atom(first, close);
            residue.insert_atom(second, far);
        }
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ResidueId {
        ResidueId::new('A', 1)
    }

    #[test]
    fn only_standard_bases_have_templates() {
        for residue_type in [
            ResidueType::A,
            ResidueType::C,
            ResidueType::G,
            ResidueType::U,
            ResidueType::T,
        ] {
            let residue = ideal_base(residue_type, id()).unwrap();
            assert_eq!(residue.residue_type(), residue_type);
            assert!(residue.reference_frame().is_ok());
        }
        assert!(ideal_base(ResidueType::Nucleotide, id()).is_none());
        assert!(ideal_base(ResidueType::AminoAcid('A'), id()).is_none());
    }

    #[test]
    fn derived_sites_sit_at_bond_length_from_their_parent() {
        let g = ideal_base(ResidueType::G, id()).unwrap();
        let d = |a, b| distance(g.find_atom(a).unwrap(), g.find_atom(b).unwrap());
        assert!((d(AtomType::N1, AtomType::H1) - NH_BOND_LENGTH).abs() < 1e-9);
        assert!((d(AtomType::C8, AtomType::H8) - CH_BOND_LENGTH).abs() < 1e-9);
        assert!((d(AtomType::O6, AtomType::LP6_2) - LONE_PAIR_DISTANCE).abs() < 1e-9);
    }

    #[test]
    fn watson_crick_edge_substituents_are_named_by_proximity() {
        let a = ideal_base(ResidueType::A, id()).unwrap();
        let n1 = a.find_atom(AtomType::N1).unwrap();
        assert!(
            distance(a.find_atom(AtomType::H61).unwrap(), n1)
                < distance(a.find_atom(AtomType::H62).unwrap(), n1)
        );

        let g = ideal_base(ResidueType::G, id()).unwrap();
        let c5 = g.find_atom(AtomType::C5).unwrap();
        assert!(
            distance(g.find_atom(AtomType::LP6_1).unwrap(), c5)
                < distance(g.find_atom(AtomType::LP6_2).unwrap(), c5)
        );
    }

    #[test]
    fn thymine_carries_its_methyl_but_no_h5() {
        let t = ideal_base(ResidueType::T, id()).unwrap();
        assert!(t.find_atom(AtomType::C5M).is_some());
        assert!(t.find_atom(AtomType::H5).is_none());
        assert!(t.find_atom(AtomType::LP4_1).is_some());
    }
}
