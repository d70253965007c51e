use super::config::{NetworkCutoffs, Scorer};
use crate::core::flow::{FlowNetwork, VertexId};
use crate::core::hbond::bond::{HBond, HBondError, HBondFlow};
use crate::core::models::atom::AtomType;
use crate::core::models::residue::Residue;
use crate::core::utils::geometry::distance;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, trace};

/// Flows below this are treated as zero.
const FLOW_EPSILON: f64 = 1e-9;

/// A heavy atom with one of its hydrogens or lone pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Site {
    heavy: AtomType,
    partner: AtomType,
}

#[derive(Debug, Default)]
struct Sites {
    donors: Vec<Site>,
    acceptors: Vec<Site>,
}

/// The hydrogen bonds selected by the network and the total flow they carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSolution {
    pub flows: Vec<HBondFlow>,
    pub sum_flow: f64,
}

impl NetworkSolution {
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

fn collect_sites(residue: &Residue, covalent_distance: f64) -> Sites {
    let mut sites = Sites::default();
    let heavy_atoms: Vec<_> = residue
        .atoms_where(|atom| atom.is_side_chain() && atom.is_polar_heavy())
        .collect();
    let partners: Vec<_> = residue
        .atoms_where(|atom| {
            atom.is_side_chain() && !atom.is_methyl() && (atom.is_hydrogen() || atom.is_lone_pair())
        })
        .collect();

    for &(heavy, heavy_position) in &heavy_atoms {
        if heavy.is_methyl() {
            // The methyl hydrogen is placed per acceptor by the scorer.
            sites.donors.push(Site {
                heavy,
                partner: AtomType::METHYL_H,
            });
            continue;
        }
        for &(partner, partner_position) in &partners {
            if distance(heavy_position, partner_position) >= covalent_distance {
                continue;
            }
            let site = Site { heavy, partner };
            if partner.is_hydrogen() {
                sites.donors.push(site);
            } else {
                sites.acceptors.push(site);
            }
        }
    }
    sites
}

fn score(
    hbond: &mut HBond,
    donor: &Residue,
    acceptor: &Residue,
    scorer: Scorer,
) -> Result<f64, HBondError> {
    match scorer {
        Scorer::Statistical => hbond.eval_statistical(donor, acceptor),
        Scorer::Binary => hbond.eval_binary(donor, acceptor),
    }
}

/// Scores every donor site of `donor` against every acceptor site of
/// `acceptor`, keeping the best candidate per donor/acceptor heavy-atom pair.
fn collect_candidates(
    donor: &Residue,
    donor_sites: &Sites,
    acceptor: &Residue,
    acceptor_sites: &Sites,
    cutoffs: &NetworkCutoffs,
    best: &mut BTreeMap<(bool, AtomType, AtomType), HBond>,
    forward: bool,
) {
    for d in &donor_sites.donors {
        for a in &acceptor_sites.acceptors {
            let mut hbond = HBond::new(d.heavy, d.partner, a.heavy, a.partner);
            let value = match score(&mut hbond, donor, acceptor, cutoffs.scorer) {
                Ok(value) => value,
                Err(e) => {
                    debug!(bond = %hbond, error = %e, "Skipping unscorable hydrogen bond candidate");
                    continue;
                }
            };
            if value <= cutoffs.min_score {
                continue;
            }
            trace!(bond = %hbond, value, "Hydrogen bond candidate");
            best.entry((forward, d.heavy, a.heavy))
                .and_modify(|kept| {
                    if value > kept.value() {
                        *kept = hbond.clone();
                    }
                })
                .or_insert(hbond);
        }
    }
}

/// Solves the hydrogen-bond network between two residues.
///
/// Every kept candidate becomes an edge between its two heavy atoms with the
/// candidate's score as capacity. Atoms of `a` hang off the source and atoms
/// of `b` feed the sink through unit-capacity edges, so no atom carries more
/// than one unit of flow in total.
#[instrument(skip_all, name = "hbond_network", fields(a = %a.id(), b = %b.id()))]
pub fn solve(a: &Residue, b: &Residue, cutoffs: &NetworkCutoffs) -> NetworkSolution {
    let sites_a = collect_sites(a, cutoffs.covalent_distance);
    let sites_b = collect_sites(b, cutoffs.covalent_distance);

    let mut best = BTreeMap::new();
    collect_candidates(a, &sites_a, b, &sites_b, cutoffs, &mut best, true);
    collect_candidates(b, &sites_b, a, &sites_a, cutoffs, &mut best, false);

    if best.is_empty() {
        debug!("No viable hydrogen bond candidates");
        return NetworkSolution::default();
    }

    let mut network = FlowNetwork::new();
    let source = network.add_vertex();
    let sink = network.add_vertex();
    let mut a_vertices: HashMap<AtomType, VertexId> = HashMap::new();
    let mut b_vertices: HashMap<AtomType, VertexId> = HashMap::new();

    for ((forward, donor, acceptor), hbond) in best {
        let (a_atom, b_atom) = if forward {
            (donor, acceptor)
        } else {
            (acceptor, donor)
        };
        let from = *a_vertices.entry(a_atom).or_insert_with(|| {
            let vertex = network.add_vertex();
            network.connect(source, vertex, 1.0, None);
            vertex
        });
        let to = *b_vertices.entry(b_atom).or_insert_with(|| {
            let vertex = network.add_vertex();
            network.connect(vertex, sink, 1.0, None);
            vertex
        });
        let capacity = hbond.value();
        network.connect(from, to, capacity, Some(hbond));
    }

    let sum_flow = network.max_flow(source, sink);
    let flows: Vec<HBondFlow> = network
        .into_edges()
        .filter(|(_, flow)| *flow > FLOW_EPSILON)
        .map(|(hbond, flow)| HBondFlow { hbond, flow })
        .collect();

    debug!(
        bonds = flows.len(),
        sum_flow, "Solved hydrogen bond network"
    );
    NetworkSolution { flows, sum_flow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::{ResidueId, ResidueType};
    use crate::core::models::template::ideal_base;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
    use std::f64::consts::PI;

    fn watson_crick(first: ResidueType, second: ResidueType) -> (Residue, Residue) {
        let a = ideal_base(first, ResidueId::new('A', 1)).unwrap();
        let flip = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
        );
        let b = ideal_base(second, ResidueId::new('B', 1))
            .unwrap()
            .transformed(&flip);
        (a, b)
    }

    fn per_atom_flow(solution: &NetworkSolution, residue: &Residue) -> HashMap<AtomType, f64> {
        let mut totals = HashMap::new();
        for HBondFlow { hbond, flow } in &solution.flows {
            let atom = if hbond.donor_residue() == Some(residue.id()) {
                hbond.donor()
            } else {
                hbond.acceptor()
            };
            *totals.entry(atom).or_insert(0.0) += flow;
        }
        totals
    }

    #[test]
    fn sites_pair_heavy_atoms_with_their_hydrogens_and_lone_pairs() {
        let (g, _) = watson_crick(ResidueType::G, ResidueType::C);
        let sites = collect_sites(&g, 1.7);
        assert!(sites.donors.contains(&Site {
            heavy: AtomType::N1,
            partner: AtomType::H1
        }));
        assert!(sites.acceptors.contains(&Site {
            heavy: AtomType::O6,
            partner: AtomType::LP6_2
        }));
        assert!(!sites.donors.iter().any(|s| s.heavy == AtomType::C1_PRIME));
    }

    #[test]
    fn methyl_carbon_contributes_one_synthetic_donor() {
        let t = ideal_base(ResidueType::T, ResidueId::new('A', 1)).unwrap();
        let sites = collect_sites(&t, 1.7);
        let methyl: Vec<_> = sites
            .donors
            .iter()
            .filter(|s| s.heavy == AtomType::C5M)
            .collect();
        assert_eq!(methyl.len(), 1);
        assert_eq!(methyl[0].partner, AtomType::METHYL_H);
    }

    #[test]
    fn watson_crick_gc_carries_three_bonds() {
        let (g, c) = watson_crick(ResidueType::G, ResidueType::C);
        let solution = solve(&g, &c, &NetworkCutoffs::default());

        let mut pairs: Vec<_> = solution
            .flows
            .iter()
            .filter(|f| f.flow > 0.5)
            .map(|f| (f.hbond.donor(), f.hbond.acceptor()))
            .collect();
        pairs.sort();
        let mut expected = vec![
            (AtomType::N1, AtomType::N3),
            (AtomType::N2, AtomType::O2),
            (AtomType::N4, AtomType::O6),
        ];
        expected.sort();
        assert_eq!(pairs, expected);
        assert!(solution.sum_flow > 2.1 && solution.sum_flow <= 3.0 + 1e-9);
    }

    #[test]
    fn no_atom_carries_more_than_one_unit_of_flow() {
        for (first, second) in [
            (ResidueType::G, ResidueType::C),
            (ResidueType::A, ResidueType::U),
            (ResidueType::G, ResidueType::U),
        ] {
            let (a, b) = watson_crick(first, second);
            let solution = solve(&a, &b, &NetworkCutoffs::default());
            for residue in [&a, &b] {
                for (atom, total) in per_atom_flow(&solution, residue) {
                    assert!(total <= 1.0 + 1e-9, "{atom} carries {total}");
                }
            }
            let summed: f64 = solution.flows.iter().map(|f| f.flow).sum();
            assert!((summed - solution.sum_flow).abs() < 1e-9);
        }
    }

    #[test]
    fn flow_never_exceeds_bond_value() {
        let (a, u) = watson_crick(ResidueType::A, ResidueType::U);
        let solution = solve(&a, &u, &NetworkCutoffs::default());
        assert!(!solution.is_empty());
        for f in &solution.flows {
            assert!(f.flow <= f.hbond.value() + 1e-9);
        }
    }

    #[test]
    fn distant_residues_have_an_empty_network() {
        let g = ideal_base(ResidueType::G, ResidueId::new('A', 1)).unwrap();
        let far = ideal_base(ResidueType::C, ResidueId::new('B', 1))
            .unwrap()
            .transformed(&Isometry3::translation(40.0, 0.0, 0.0));
        let solution = solve(&g, &far, &NetworkCutoffs::default());
        assert!(solution.is_empty());
        assert_eq!(solution.sum_flow, 0.0);
    }

    #[test]
    fn binary_scorer_builds_unit_capacity_bonds() {
        let (g, c) = watson_crick(ResidueType::G, ResidueType::C);
        let cutoffs = NetworkCutoffs {
            scorer: Scorer::Binary,
            ..NetworkCutoffs::default()
        };
        let solution = solve(&g, &c, &cutoffs);
        assert!(!solution.is_empty());
        for f in &solution.flows {
            assert_eq!(f.hbond.value(), 1.0);
        }
    }
}
