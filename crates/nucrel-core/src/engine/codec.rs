//! Text encoding of relations.
//!
//! A [`Relation`] is written field by field as JSON. Residues are stored by
//! identity only, so reading a relation back requires a lookup in which every
//! referenced residue resolves.

use super::labels::{AnnotationMask, Label};
use super::relation::Relation;
use crate::core::faces::FaceLabel;
use crate::core::hbond::bond::HBondFlow;
use crate::core::models::residue::ResidueId;
use crate::core::models::structure::ResidueLookup;
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed relation record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Relation refers to residue {0}, which the lookup cannot resolve")]
    UnresolvedResidue(ResidueId),
}

/// A rigid transform as a translation and an `(i, j, k, w)` unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    pub translation: [f64; 3],
    pub rotation: [f64; 4],
}

impl From<&Isometry3<f64>> for TransformRecord {
    fn from(isometry: &Isometry3<f64>) -> Self {
        let t = &isometry.translation.vector;
        let q = isometry.rotation.coords;
        Self {
            translation: [t.x, t.y, t.z],
            rotation: [q.x, q.y, q.z, q.w],
        }
    }
}

impl From<TransformRecord> for Isometry3<f64> {
    fn from(record: TransformRecord) -> Self {
        let [x, y, z] = record.translation;
        let [i, j, k, w] = record.rotation;
        Isometry3::from_parts(
            Translation3::new(x, y, z),
            UnitQuaternion::new_unchecked(Quaternion::new(w, i, j, k)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelationRecord {
    pub reference: ResidueId,
    pub residue: ResidueId,
    pub transform: TransformRecord,
    pub transform_inverse: TransformRecord,
    pub phosphate_transform: TransformRecord,
    #[serde(default)]
    pub ref_face: Option<FaceLabel>,
    #[serde(default)]
    pub res_face: Option<FaceLabel>,
    pub labels: Vec<Label>,
    pub mask: AnnotationMask,
    pub hbonds: Vec<HBondFlow>,
    pub sum_flow: f64,
    pub paired_faces: Vec<(FaceLabel, FaceLabel)>,
}

impl From<&Relation> for RelationRecord {
    fn from(relation: &Relation) -> Self {
        Self {
            reference: relation.reference,
            residue: relation.residue,
            transform: (&relation.transform).into(),
            transform_inverse: (&relation.transform_inverse).into(),
            phosphate_transform: (&relation.phosphate_transform).into(),
            ref_face: relation.ref_face,
            res_face: relation.res_face,
            labels: relation.labels.iter().copied().collect(),
            mask: relation.mask,
            hbonds: relation.hbonds.clone(),
            sum_flow: relation.sum_flow,
            paired_faces: relation.paired_faces.clone(),
        }
    }
}

impl RelationRecord {
    /// Rebuilds the relation, checking that every residue it names resolves.
    pub fn into_relation<L>(self, lookup: &L) -> Result<Relation, CodecError>
    where
        L: ResidueLookup + ?Sized,
    {
        let bond_ids = self
            .hbonds
            .iter()
            .flat_map(|f| [f.hbond.donor_residue(), f.hbond.acceptor_residue()])
            .flatten();
        if let Some(id) = [self.reference, self.residue]
            .into_iter()
            .chain(bond_ids)
            .find(|id| !lookup.contains_residue(id))
        {
            return Err(CodecError::UnresolvedResidue(id));
        }

        let mut relation = Relation::new(self.reference, self.residue);
        relation.transform = self.transform.into();
        relation.transform_inverse = self.transform_inverse.into();
        relation.phosphate_transform = self.phosphate_transform.into();
        relation.ref_face = self.ref_face;
        relation.res_face = self.res_face;
        relation.labels = self.labels.into_iter().collect();
        relation.mask = self.mask;
        relation.hbonds = self.hbonds;
        relation.sum_flow = self.sum_flow;
        relation.paired_faces = self.paired_faces;
        Ok(relation)
    }
}

impl Relation {
    pub fn to_record(&self) -> RelationRecord {
        self.into()
    }

    pub fn to_json(&self) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    /// Reads a relation written by [`Relation::to_json`].
    pub fn from_json<L>(text: &str, lookup: &L) -> Result<Relation, CodecError>
    where
        L: ResidueLookup + ?Sized,
    {
        let record: RelationRecord = serde_json::from_str(text)?;
        record.into_relation(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::{Residue, ResidueType};
    use crate::core::models::template::ideal_base;
    use nalgebra::Vector3;
    use std::collections::HashMap;
    use std::f64::consts::PI;

    fn paired_structure() -> HashMap<ResidueId, Residue> {
        let g = ideal_base(ResidueType::G, ResidueId::new('A', 1)).unwrap();
        let c = ideal_base(ResidueType::C, ResidueId::new('B', 1).with_insertion('a'))
            .unwrap()
            .transformed(&Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
            ));
        [g, c].into_iter().map(|r| (r.id(), r)).collect()
    }

    fn annotated(residues: &HashMap<ResidueId, Residue>) -> Relation {
        let mut relation = Relation::new(ResidueId::new('A', 1), ResidueId::new('B', 1).with_insertion('a'));
        relation.annotate(residues, AnnotationMask::ALL).unwrap();
        relation
    }

    #[test]
    fn json_round_trip_reproduces_the_relation() {
        let residues = paired_structure();
        let relation = annotated(&residues);
        assert!(!relation.hbonds().is_empty());

        let text = relation.to_json().unwrap();
        let back = Relation::from_json(&text, &residues).unwrap();
        assert_eq!(back, relation);

        let inverse = relation.invert();
        let back = Relation::from_json(&inverse.to_json().unwrap(), &residues).unwrap();
        assert_eq!(back, inverse);
    }

    #[test]
    fn record_uses_readable_field_names() {
        let residues = paired_structure();
        let text = annotated(&residues).to_json().unwrap();
        for key in ["\"ref-face\":\"Ww\"", "\"sum-flow\"", "\"paired-faces\"", "\"phosphate-transform\""] {
            assert!(text.contains(key), "{key} missing from {text}");
        }
    }

    #[test]
    fn unresolved_residue_is_rejected() {
        let residues = paired_structure();
        let text = annotated(&residues).to_json().unwrap();

        let partial: HashMap<ResidueId, Residue> = residues
            .into_iter()
            .filter(|(id, _)| id.chain == 'A')
            .collect();
        match Relation::from_json(&text, &partial) {
            Err(CodecError::UnresolvedResidue(id)) => assert_eq!(id.chain, 'B'),
            other => panic!("expected an unresolved residue, got {other:?}"),
        }
    }

    #[test]
    fn malformed_text_is_a_json_error() {
        let residues = paired_structure();
        assert!(matches!(
            Relation::from_json("{\"reference\": 3}", &residues),
            Err(CodecError::Json(_))
        ));
    }

    #[test]
    fn transform_record_preserves_the_isometry() {
        let isometry = Isometry3::from_parts(
            Translation3::new(1.5, -2.0, 0.25),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7),
        );
        let back: Isometry3<f64> = TransformRecord::from(&isometry).into();
        assert_eq!(back, isometry);
    }
}
