use super::scorer::{self, BondAtoms};
use crate::core::models::atom::AtomType;
use crate::core::models::residue::{Residue, ResidueError, ResidueId};
use crate::core::models::structure::ResidueLookup;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HBondError {
    #[error("Hydrogen bond {bond} has no {role} residue set")]
    ResidueNotSet { bond: String, role: &'static str },
    #[error("Residue {0} referenced by a hydrogen bond is not available")]
    ResidueNotFound(ResidueId),
    #[error(transparent)]
    Residue(#[from] ResidueError),
}

/// A candidate hydrogen bond between a donor-hydrogen pair and an
/// acceptor-lone pair pair, with the score it was last evaluated to.
///
/// The residue handles are only set once the bond has been evaluated against
/// real residues; atom positions can be resolved only after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HBond {
    donor: AtomType,
    hydrogen: AtomType,
    acceptor: AtomType,
    lone_pair: AtomType,
    value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    donor_residue: Option<ResidueId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    acceptor_residue: Option<ResidueId>,
}

impl HBond {
    pub fn new(donor: AtomType, hydrogen: AtomType, acceptor: AtomType, lone_pair: AtomType) -> Self {
        Self {
            donor,
            hydrogen,
            acceptor,
            lone_pair,
            value: 0.0,
            donor_residue: None,
            acceptor_residue: None,
        }
    }

    /// Binds the bond to its residues without scoring it.
    pub fn with_residues(mut self, donor: ResidueId, acceptor: ResidueId) -> Self {
        self.donor_residue = Some(donor);
        self.acceptor_residue = Some(acceptor);
        self
    }

    pub fn donor(&self) -> AtomType {
        self.donor
    }

    pub fn hydrogen(&self) -> AtomType {
        self.hydrogen
    }

    pub fn acceptor(&self) -> AtomType {
        self.acceptor
    }

    pub fn lone_pair(&self) -> AtomType {
        self.lone_pair
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn donor_residue(&self) -> Option<ResidueId> {
        self.donor_residue
    }

    pub fn acceptor_residue(&self) -> Option<ResidueId> {
        self.acceptor_residue
    }

    fn atoms(&self) -> BondAtoms {
        BondAtoms {
            donor: self.donor,
            hydrogen: self.hydrogen,
            acceptor: self.acceptor,
            lone_pair: self.lone_pair,
        }
    }

    fn bind(&mut self, donor: &Residue, acceptor: &Residue) {
        self.donor_residue = Some(donor.id());
        self.acceptor_residue = Some(acceptor.id());
    }

    /// Scores the bond with the binary overlap rule and records the result.
    pub fn eval_binary(&mut self, donor: &Residue, acceptor: &Residue) -> Result<f64, HBondError> {
        self.bind(donor, acceptor);
        self.value = scorer::binary_bond_score(donor, acceptor, &self.atoms())?;
        Ok(self.value)
    }

    /// Scores the bond with the statistical mixture model and records the result.
    pub fn eval_statistical(
        &mut self,
        donor: &Residue,
        acceptor: &Residue,
    ) -> Result<f64, HBondError> {
        self.bind(donor, acceptor);
        self.value = scorer::statistical_score(donor, acceptor, &self.atoms())?;
        Ok(self.value)
    }

    /// Resolves the donor and acceptor residues of an evaluated bond.
    pub fn resolve<'a, L>(&self, lookup: &'a L) -> Result<(&'a Residue, &'a Residue), HBondError>
    where
        L: ResidueLookup + ?Sized,
    {
        let donor_id = self.donor_residue.ok_or_else(|| self.not_set("donor"))?;
        let acceptor_id = self.acceptor_residue.ok_or_else(|| self.not_set("acceptor"))?;
        let donor = lookup
            .lookup(&donor_id)
            .ok_or(HBondError::ResidueNotFound(donor_id))?;
        let acceptor = lookup
            .lookup(&acceptor_id)
            .ok_or(HBondError::ResidueNotFound(acceptor_id))?;
        Ok((donor, acceptor))
    }

    fn not_set(&self, role: &'static str) -> HBondError {
        HBondError::ResidueNotSet {
            bond: self.to_string(),
            role,
        }
    }

    pub fn donor_position<L>(&self, lookup: &L) -> Result<Point3<f64>, HBondError>
    where
        L: ResidueLookup + ?Sized,
    {
        let (donor, _) = self.resolve(lookup)?;
        Ok(*donor.safe_find_atom(self.donor)?)
    }

    /// Hydrogen position; synthesised for methyl donors.
    pub fn hydrogen_position<L>(&self, lookup: &L) -> Result<Point3<f64>, HBondError>
    where
        L: ResidueLookup + ?Sized,
    {
        let (donor, acceptor) = self.resolve(lookup)?;
        let acceptor_position = acceptor.safe_find_atom(self.acceptor)?;
        Ok(scorer::hydrogen_position(
            donor,
            &self.atoms(),
            acceptor_position,
        )?)
    }

    pub fn acceptor_position<L>(&self, lookup: &L) -> Result<Point3<f64>, HBondError>
    where
        L: ResidueLookup + ?Sized,
    {
        let (_, acceptor) = self.resolve(lookup)?;
        Ok(*acceptor.safe_find_atom(self.acceptor)?)
    }

    pub fn lone_pair_position<L>(&self, lookup: &L) -> Result<Point3<f64>, HBondError>
    where
        L: ResidueLookup + ?Sized,
    {
        let (_, acceptor) = self.resolve(lookup)?;
        Ok(*acceptor.safe_find_atom(self.lone_pair)?)
    }

    /// Ordering that places stronger bonds first.
    pub fn by_descending_value(a: &HBond, b: &HBond) -> Ordering {
        b.value.total_cmp(&a.value)
    }
}

impl fmt::Display for HBond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} ... {}-{}",
            self.donor, self.hydrogen, self.acceptor, self.lone_pair
        )
    }
}

/// A hydrogen bond together with the flow it carries in the solved network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HBondFlow {
    pub hbond: HBond,
    pub flow: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::ResidueType;
    use crate::core::models::template::ideal_base;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
    use std::collections::HashMap;
    use std::f64::consts::PI;

    fn pair() -> (Residue, Residue) {
        let g = ideal_base(ResidueType::G, ResidueId::new('A', 1)).unwrap();
        let flip = Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI),
        );
        let c = ideal_base(ResidueType::C, ResidueId::new('B', 1))
            .unwrap()
            .transformed(&flip);
        (g, c)
    }

    fn imino_bond() -> HBond {
        HBond::new(AtomType::N1, AtomType::H1, AtomType::N3, AtomType::LP3)
    }

    #[test]
    fn unevaluated_bond_has_no_residues() {
        let bond = imino_bond();
        let lookup: HashMap<ResidueId, Residue> = HashMap::new();
        assert_eq!(bond.value(), 0.0);
        assert!(matches!(
            bond.donor_position(&lookup),
            Err(HBondError::ResidueNotSet { role: "donor", .. })
        ));
    }

    #[test]
    fn eval_statistical_binds_residues_and_records_value() {
        let (g, c) = pair();
        let mut bond = imino_bond();
        let score = bond.eval_statistical(&g, &c).unwrap();
        assert!(score > 0.9);
        assert_eq!(bond.value(), score);
        assert_eq!(bond.donor_residue(), Some(g.id()));
        assert_eq!(bond.acceptor_residue(), Some(c.id()));
    }

    #[test]
    fn eval_binary_scores_overlap() {
        let (g, c) = pair();
        let mut bond = imino_bond();
        assert_eq!(bond.eval_binary(&g, &c).unwrap(), 1.0);
    }

    #[test]
    fn positions_resolve_through_a_lookup() {
        let (g, c) = pair();
        let mut bond = imino_bond();
        bond.eval_statistical(&g, &c).unwrap();
        let residues = vec![g.clone(), c.clone()];

        assert_eq!(
            bond.donor_position(&residues).unwrap(),
            *g.find_atom(AtomType::N1).unwrap()
        );
        assert_eq!(
            bond.hydrogen_position(&residues).unwrap(),
            *g.find_atom(AtomType::H1).unwrap()
        );
        assert_eq!(
            bond.lone_pair_position(&residues).unwrap(),
            *c.find_atom(AtomType::LP3).unwrap()
        );

        let only_g = vec![g];
        assert_eq!(
            bond.acceptor_position(&only_g),
            Err(HBondError::ResidueNotFound(c.id()))
        );
    }

    #[test]
    fn descending_value_order_puts_strong_bonds_first() {
        let (g, c) = pair();
        let mut strong = imino_bond();
        strong.eval_statistical(&g, &c).unwrap();
        let weak = imino_bond();

        let mut bonds = vec![weak.clone(), strong.clone()];
        bonds.sort_by(HBond::by_descending_value);
        assert_eq!(bonds, vec![strong, weak]);
    }

    #[test]
    fn hbond_serializes_with_atom_names() {
        let (g, c) = pair();
        let mut bond = imino_bond();
        bond.eval_statistical(&g, &c).unwrap();
        let json = serde_json::to_string(&bond).unwrap();
        assert!(json.contains("\"lone-pair\":\"LP3\""));
        let back: HBond = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bond);
    }
}
