use super::config::Criteria;
use super::error::EngineError;
use super::labels::{AnnotationMask, Label};
use super::network::{self, NetworkSolution};
use crate::core::faces::{self, FaceLabel};
use crate::core::hbond::bond::{HBond, HBondFlow};
use crate::core::models::atom::AtomType;
use crate::core::models::residue::{Residue, ResidueError, ResidueId, ResidueType};
use crate::core::models::structure::ResidueLookup;
use crate::core::pattern::{self, Orientation, PairingLabel};
use crate::core::rings;
use crate::core::utils::geometry::{distance, torsion};
use nalgebra::{Isometry3, Point3, Vector3};
use std::collections::BTreeSet;
use std::f64::consts::FRAC_PI_2;
use tracing::{debug, instrument, warn};

/// The annotated relationship between an ordered pair of residues.
///
/// A relation refers to its residues by identity; the residues themselves
/// stay with the caller and are supplied through a [`ResidueLookup`] whenever
/// the relation is (re)computed.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub(crate) reference: ResidueId,
    pub(crate) residue: ResidueId,
    /// Places `residue` in the frame of `reference`.
    pub(crate) transform: Isometry3<f64>,
    pub(crate) transform_inverse: Isometry3<f64>,
    /// Places the phosphate bridging the two residues in the frame of `reference`.
    pub(crate) phosphate_transform: Isometry3<f64>,
    pub(crate) ref_face: Option<FaceLabel>,
    pub(crate) res_face: Option<FaceLabel>,
    pub(crate) labels: BTreeSet<Label>,
    pub(crate) mask: AnnotationMask,
    pub(crate) hbonds: Vec<HBondFlow>,
    pub(crate) sum_flow: f64,
    pub(crate) paired_faces: Vec<(FaceLabel, FaceLabel)>,
}

/// Geometry of an accepted pairing, computed before any state is touched.
struct PairingGeometry {
    orientation: Orientation,
    ref_face: Option<FaceLabel>,
    res_face: Option<FaceLabel>,
    size_hint: usize,
    pattern: Option<PairingLabel>,
    cis: bool,
}

impl Relation {
    /// An empty relation between two residue identities.
    pub fn new(reference: ResidueId, residue: ResidueId) -> Self {
        Self {
            reference,
            residue,
            transform: Isometry3::identity(),
            transform_inverse: Isometry3::identity(),
            phosphate_transform: Isometry3::identity(),
            ref_face: None,
            res_face: None,
            labels: BTreeSet::new(),
            mask: AnnotationMask::empty(),
            hbonds: Vec::new(),
            sum_flow: 0.0,
            paired_faces: Vec::new(),
        }
    }

    /// A relation between two residues with its relative transform computed.
    pub fn between(reference: &Residue, residue: &Residue) -> Self {
        let mut relation = Self::new(reference.id(), residue.id());
        relation.compute_transform(reference, residue);
        relation
    }

    pub fn reference(&self) -> ResidueId {
        self.reference
    }

    pub fn residue(&self) -> ResidueId {
        self.residue
    }

    pub fn transform(&self) -> &Isometry3<f64> {
        &self.transform
    }

    pub fn transform_inverse(&self) -> &Isometry3<f64> {
        &self.transform_inverse
    }

    pub fn phosphate_transform(&self) -> &Isometry3<f64> {
        &self.phosphate_transform
    }

    pub fn ref_face(&self) -> Option<FaceLabel> {
        self.ref_face
    }

    pub fn res_face(&self) -> Option<FaceLabel> {
        self.res_face
    }

    pub fn labels(&self) -> &BTreeSet<Label> {
        &self.labels
    }

    pub fn has_label(&self, label: Label) -> bool {
        self.labels.contains(&label)
    }

    pub fn mask(&self) -> AnnotationMask {
        self.mask
    }

    pub fn hbonds(&self) -> &[HBondFlow] {
        &self.hbonds
    }

    pub fn sum_flow(&self) -> f64 {
        self.sum_flow
    }

    pub fn paired_faces(&self) -> &[(FaceLabel, FaceLabel)] {
        &self.paired_faces
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn add_label(&mut self, label: Label) {
        self.mask |= label.category();
        self.labels.insert(label);
    }

    /// Clears every derived field, keeping the two residue identities.
    pub fn reset(&mut self) {
        *self = Self::new(self.reference, self.residue);
    }

    /// Resolves both residues of the relation.
    pub fn resolve<'a, L>(&self, lookup: &'a L) -> Result<(&'a Residue, &'a Residue), EngineError>
    where
        L: ResidueLookup + ?Sized,
    {
        let find = |id: ResidueId| {
            lookup
                .lookup(&id)
                .ok_or(EngineError::ResidueNotFound { id })
        };
        Ok((find(self.reference)?, find(self.residue)?))
    }

    /// Checks that both residues and every residue named by a stored hydrogen
    /// bond resolve in `lookup`.
    pub fn reassign_residues<L>(&self, lookup: &L) -> Result<(), EngineError>
    where
        L: ResidueLookup + ?Sized,
    {
        self.resolve(lookup)?;
        for flow in &self.hbonds {
            let ids = [flow.hbond.donor_residue(), flow.hbond.acceptor_residue()];
            for id in ids.into_iter().flatten() {
                if !lookup.contains_residue(&id) {
                    return Err(EngineError::ResidueNotFound { id });
                }
            }
        }
        Ok(())
    }

    /// Runs the analyses selected by `mask` with default criteria.
    ///
    /// Previously derived state is cleared first. Returns whether any label
    /// was produced.
    pub fn annotate<L>(&mut self, lookup: &L, mask: AnnotationMask) -> Result<bool, EngineError>
    where
        L: ResidueLookup + ?Sized,
    {
        self.annotate_with(lookup, mask, &Criteria::default())
    }

    pub fn annotate_with<L>(
        &mut self,
        lookup: &L,
        mask: AnnotationMask,
        criteria: &Criteria,
    ) -> Result<bool, EngineError>
    where
        L: ResidueLookup + ?Sized,
    {
        let (reference, residue) = self.resolve(lookup)?;
        Ok(self.annotate_residues(reference, residue, mask, criteria))
    }

    #[instrument(level = "debug", skip_all, fields(reference = %reference.id(), residue = %residue.id()))]
    pub(crate) fn annotate_residues(
        &mut self,
        reference: &Residue,
        residue: &Residue,
        mask: AnnotationMask,
        criteria: &Criteria,
    ) -> bool {
        self.reference = reference.id();
        self.residue = residue.id();
        self.reset();
        self.compute_transform(reference, residue);

        if mask.contains(AnnotationMask::ADJACENT) {
            self.are_adjacent(reference, residue, criteria);
        }
        if mask.contains(AnnotationMask::STACKING) {
            self.are_stacked(reference, residue, criteria);
        }
        if mask.contains(AnnotationMask::PAIRING) {
            self.are_paired(reference, residue, criteria);
        }
        if mask.contains(AnnotationMask::BHBOND) {
            self.are_bh_bonded(reference, residue, criteria);
        }

        debug!(labels = self.labels.len(), "Annotated residue pair");
        !self.labels.is_empty()
    }

    fn compute_transform(&mut self, reference: &Residue, residue: &Residue) {
        match (reference.reference_frame(), residue.reference_frame()) {
            (Ok(ref_frame), Ok(res_frame)) => {
                self.transform = ref_frame.inverse() * res_frame;
                self.transform_inverse = self.transform.inverse();
            }
            (Err(e), _) | (_, Err(e)) => {
                debug!(error = %e, "No relative transform; keeping identity");
                self.transform = Isometry3::identity();
                self.transform_inverse = Isometry3::identity();
            }
        }
    }

    /// Tags covalently bonded neighbours.
    ///
    /// Nucleotides are bonded through O3'-P, amino acids through C-N. For
    /// nucleotides the bridging phosphate is also located.
    pub fn are_adjacent(&mut self, reference: &Residue, residue: &Residue, criteria: &Criteria) -> bool {
        let (ref_type, res_type) = (reference.residue_type(), residue.residue_type());
        let bonded = |a: &Residue, a_atom: AtomType, b: &Residue, b_atom: AtomType| {
            match (a.find_atom(a_atom), b.find_atom(b_atom)) {
                (Some(p), Some(q)) => distance(p, q) <= criteria.adjacency_bond_length,
                _ => false,
            }
        };

        if ref_type.is_nucleic_acid() && res_type.is_nucleic_acid() {
            if bonded(reference, AtomType::O3_PRIME, residue, AtomType::P) {
                self.add_label(Label::Adjacent5p);
                self.phosphate_transform = phosphate_transform(reference, reference, residue);
                return true;
            }
            if bonded(reference, AtomType::P, residue, AtomType::O3_PRIME) {
                self.add_label(Label::Adjacent3p);
                self.phosphate_transform = phosphate_transform(reference, residue, reference);
                return true;
            }
        } else if ref_type.is_amino_acid() && res_type.is_amino_acid() {
            if bonded(reference, AtomType::C, residue, AtomType::N) {
                self.add_label(Label::Adjacent5p);
                return true;
            }
            if bonded(reference, AtomType::N, residue, AtomType::C) {
                self.add_label(Label::Adjacent3p);
                return true;
            }
        }
        false
    }

    pub fn are_stacked(&mut self, reference: &Residue, residue: &Residue, criteria: &Criteria) -> bool {
        if !(reference.residue_type().is_nucleic_acid() && residue.residue_type().is_nucleic_acid()) {
            return false;
        }
        match rings::are_stacked(reference, residue, &criteria.stacking) {
            Ok(Some(direction)) => {
                self.add_label(direction.into());
                true
            }
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "Skipping stacking analysis");
                false
            }
        }
    }

    /// Solves the hydrogen-bond network of two bases and, when enough flow
    /// passes between them, records the pairing with its faces, orientation,
    /// pattern and cis/trans geometry.
    pub fn are_paired(&mut self, reference: &Residue, residue: &Residue, criteria: &Criteria) -> bool {
        if !(reference.residue_type().is_nucleic_acid() && residue.residue_type().is_nucleic_acid()) {
            return false;
        }
        let solution = network::solve(reference, residue, &criteria.network);
        self.assign_pairing(reference, residue, solution, criteria)
    }

    pub(crate) fn assign_pairing(
        &mut self,
        reference: &Residue,
        residue: &Residue,
        solution: NetworkSolution,
        criteria: &Criteria,
    ) -> bool {
        self.hbonds = solution.flows;
        self.sum_flow = solution.sum_flow;
        if self.hbonds.is_empty() || self.sum_flow < criteria.pairing_cutoff {
            return false;
        }

        let geometry = match pairing_geometry(reference, residue, &self.hbonds, self.sum_flow, criteria) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!(error = %e, "Skipping pairing classification");
                return false;
            }
        };

        self.add_label(Label::Pairing);
        if self.sum_flow < criteria.one_hbond_cutoff {
            self.add_label(Label::OneHBond);
        }
        self.add_label(match geometry.orientation {
            Orientation::Parallel => Label::Parallel,
            Orientation::Antiparallel => Label::Antiparallel,
        });
        self.add_label(if geometry.cis { Label::Cis } else { Label::Trans });
        if let Some(pattern) = geometry.pattern {
            self.add_label(Label::Pattern(pattern));
        }
        self.ref_face = geometry.ref_face;
        self.res_face = geometry.res_face;
        if let (Some(ref_face), Some(res_face)) = (geometry.ref_face, geometry.res_face) {
            self.paired_faces.push((ref_face, res_face));
        }
        debug!(
            sum_flow = self.sum_flow,
            size_hint = geometry.size_hint,
            "Accepted base pairing"
        );
        true
    }

    /// Tags hydrogen bonds between the base of one residue and the sugar or
    /// phosphate of the other.
    pub fn are_bh_bonded(&mut self, reference: &Residue, residue: &Residue, criteria: &Criteria) -> bool {
        if !(reference.residue_type().is_nucleic_acid() && residue.residue_type().is_nucleic_acid()) {
            return false;
        }

        let mut contacts = BTreeSet::new();
        let mut found = false;
        for (base, backbone, base_is_reference) in [(reference, residue, true), (residue, reference, false)] {
            for (base_atom, base_position) in base.atoms_where(|a| a.is_side_chain() && a.is_nitrogen()) {
                for (backbone_atom, backbone_position) in backbone
                    .atoms_where(|a| a == AtomType::O2_PRIME || (a.is_phosphate() && a.is_oxygen()))
                {
                    let d = distance(base_position, backbone_position);
                    if d <= criteria.bh_min_distance || d >= criteria.bh_max_distance {
                        continue;
                    }
                    let key = if base_is_reference {
                        (base_atom, backbone_atom)
                    } else {
                        (backbone_atom, base_atom)
                    };
                    if !contacts.insert(key) {
                        continue;
                    }
                    found = true;

                    let (backbone_face, tag) = if backbone_atom.is_phosphate() {
                        (FaceLabel::Phosphate, Label::BasePhosphate)
                    } else {
                        (FaceLabel::Ribose, Label::BaseRibose)
                    };
                    self.add_label(Label::BackboneHBond);
                    self.add_label(tag);

                    match faces::classify(base, base_position) {
                        Some(base_face) if base_is_reference => {
                            self.paired_faces.push((base_face, backbone_face))
                        }
                        Some(base_face) => self.paired_faces.push((backbone_face, base_face)),
                        None => debug!(atom = %base_atom, "Base contact has no face"),
                    }
                }
            }
        }
        found
    }

    /// The same relation seen from the other residue.
    ///
    /// The phosphate transform is re-expressed in the new reference frame only
    /// while the two residues are adjacent; otherwise it stays the identity.
    pub fn invert(&self) -> Relation {
        let adjacent = self.has_label(Label::Adjacent5p) || self.has_label(Label::Adjacent3p);
        let phosphate_transform = if adjacent {
            self.transform_inverse * self.phosphate_transform
        } else {
            Isometry3::identity()
        };
        Relation {
            reference: self.residue,
            residue: self.reference,
            transform: self.transform_inverse,
            transform_inverse: self.transform,
            phosphate_transform,
            ref_face: self.res_face,
            res_face: self.ref_face,
            labels: self.labels.iter().map(|label| label.inverted()).collect(),
            mask: self.mask,
            hbonds: self.hbonds.clone(),
            sum_flow: self.sum_flow,
            paired_faces: self.paired_faces.iter().map(|&(a, b)| (b, a)).collect(),
        }
    }

    /// Stored hydrogen bonds, strongest first.
    pub fn ranked_hbonds(&self) -> Vec<&HBond> {
        let mut bonds: Vec<&HBond> = self.hbonds.iter().map(|f| &f.hbond).collect();
        bonds.sort_by(|a, b| HBond::by_descending_value(a, b));
        bonds
    }
}

fn size_hint(sum_flow: f64, criteria: &Criteria) -> usize {
    if sum_flow < criteria.one_hbond_cutoff {
        1
    } else if sum_flow < criteria.two_hbond_cutoff {
        2
    } else {
        3
    }
}

/// Flow-weighted mean of the atoms `side` contributes to the bonds.
fn contact_centroid(side: &Residue, flows: &[HBondFlow]) -> Result<Option<Point3<f64>>, ResidueError> {
    let mut weighted = Vector3::zeros();
    let mut total = 0.0;
    for HBondFlow { hbond, flow } in flows {
        let atom = if hbond.donor_residue() == Some(side.id()) {
            hbond.donor()
        } else {
            hbond.acceptor()
        };
        weighted += side.safe_find_atom(atom)?.coords * *flow;
        total += flow;
    }
    Ok((total > 0.0).then(|| Point3::from(weighted / total)))
}

/// C1', or the glycosidic nitrogen when the sugar is absent.
fn glycosidic_anchor(residue: &Residue) -> Result<Point3<f64>, ResidueError> {
    if let Some(c1) = residue.find_atom(AtomType::C1_PRIME) {
        return Ok(*c1);
    }
    let nitrogen = if residue.residue_type().is_purine() || residue.find_atom(AtomType::N9).is_some() {
        AtomType::N9
    } else {
        AtomType::N1
    };
    residue.safe_find_atom(nitrogen).copied()
}

fn pairing_geometry(
    reference: &Residue,
    residue: &Residue,
    flows: &[HBondFlow],
    sum_flow: f64,
    criteria: &Criteria,
) -> Result<PairingGeometry, ResidueError> {
    let ref_ring = rings::pyrimidine_ring(reference)?;
    let res_ring = rings::pyrimidine_ring(residue)?;
    let orientation = if ref_ring.normal.dot(&res_ring.normal) > 0.0 {
        Orientation::Parallel
    } else {
        Orientation::Antiparallel
    };

    let ref_face = contact_centroid(reference, flows)?.and_then(|p| faces::classify(reference, &p));
    let res_face = contact_centroid(residue, flows)?.and_then(|p| faces::classify(residue, &p));

    let size_hint = size_hint(sum_flow, criteria);
    let mut ranked = flows.to_vec();
    ranked.sort_by(|a, b| HBond::by_descending_value(&a.hbond, &b.hbond));
    ranked.truncate(size_hint);
    let pattern = pattern::evaluate(reference, residue, orientation, &ranked, size_hint);

    let tau = torsion(
        &glycosidic_anchor(reference)?,
        &ref_ring.center,
        &res_ring.center,
        &glycosidic_anchor(residue)?,
    );

    Ok(PairingGeometry {
        orientation,
        ref_face,
        res_face,
        size_hint,
        pattern,
        cis: tau.abs() < FRAC_PI_2,
    })
}

/// Frame of the phosphate joining `upstream` (O3') to `downstream` (P, OP1,
/// OP2, O5'), relative to `reference`. Identity when it cannot be built.
fn phosphate_transform(reference: &Residue, upstream: &Residue, downstream: &Residue) -> Isometry3<f64> {
    let build = || -> Result<Isometry3<f64>, ResidueError> {
        let mut phosphate = Residue::new(downstream.id(), ResidueType::Phosphate);
        phosphate.insert_atom(AtomType::O3_PRIME, *upstream.safe_find_atom(AtomType::O3_PRIME)?);
        for atom in [AtomType::P, AtomType::OP1, AtomType::OP2, AtomType::O5_PRIME] {
            phosphate.insert_atom(atom, *downstream.safe_find_atom(atom)?);
        }
        Ok(reference.reference_frame()?.inverse() * phosphate.reference_frame()?)
    };
    build().unwrap_or_else(|e| {
        warn!(error = %e, "Could not place the bridging phosphate; using identity");
        Isometry3::identity()
    })
}
