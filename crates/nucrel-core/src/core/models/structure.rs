use super::ids::ResidueKey;
use super::residue::{Residue, ResidueId};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Resolves residue identities to residues.
///
/// Relations hold [`ResidueId`] values rather than references, so anything that
/// owns residues can back them: a [`Structure`], a map keyed by id, or a plain
/// slice of residues.
pub trait ResidueLookup {
    fn lookup(&self, id: &ResidueId) -> Option<&Residue>;

    fn contains_residue(&self, id: &ResidueId) -> bool {
        self.lookup(id).is_some()
    }
}

impl ResidueLookup for HashMap<ResidueId, Residue> {
    fn lookup(&self, id: &ResidueId) -> Option<&Residue> {
        self.get(id)
    }
}

impl ResidueLookup for [Residue] {
    fn lookup(&self, id: &ResidueId) -> Option<&Residue> {
        self.iter().find(|residue| residue.id() == *id)
    }
}

impl ResidueLookup for Vec<Residue> {
    fn lookup(&self, id: &ResidueId) -> Option<&Residue> {
        self.as_slice().lookup(id)
    }
}

/// A caller-owned collection of residues, stored in an arena and indexed by
/// residue identity.
///
/// Insertion order is preserved and drives the order in which batch
/// annotation visits residue pairs.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for residues.
    residues: SlotMap<ResidueKey, Residue>,
    /// Lookup map from residue identity to its arena key.
    index: HashMap<ResidueId, ResidueKey>,
    /// Arena keys in insertion order.
    order: Vec<ResidueKey>,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a residue to the structure.
    ///
    /// If a residue with the same identity is already present, its contents
    /// are replaced and the existing key is returned, so the call is idempotent
    /// with respect to identity.
    ///
    /// # Arguments
    ///
    /// * `residue` - The residue to store.
    ///
    /// # Return
    ///
    /// The arena key of the stored residue.
    pub fn add_residue(&mut self, residue: Residue) -> ResidueKey {
        let id = residue.id();
        if let Some(&key) = self.index.get(&id) {
            if let Some(slot) = self.residues.get_mut(key) {
                *slot = residue;
            }
            return key;
        }
        let key = self.residues.insert(residue);
        self.index.insert(id, key);
        self.order.push(key);
        key
    }

    /// Removes a residue by key, returning it if it was present.
    pub fn remove_residue(&mut self, key: ResidueKey) -> Option<Residue> {
        let residue = self.residues.remove(key)?;
        self.index.remove(&residue.id());
        self.order.retain(|&k| k != key);
        Some(residue)
    }

    pub fn residue(&self, key: ResidueKey) -> Option<&Residue> {
        self.residues.get(key)
    }

    pub fn residue_mut(&mut self, key: ResidueKey) -> Option<&mut Residue> {
        self.residues.get_mut(key)
    }

    /// Finds the arena key of a residue by its identity.
    pub fn find_residue(&self, id: &ResidueId) -> Option<ResidueKey> {
        self.index.get(id).copied()
    }

    /// Returns an iterator over all residues in insertion order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ResidueKey, &Residue)` pairs.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueKey, &Residue)> {
        self.order
            .iter()
            .filter_map(|&key| self.residues.get(key).map(|residue| (key, residue)))
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

impl ResidueLookup for Structure {
    fn lookup(&self, id: &ResidueId) -> Option<&Residue> {
        self.find_residue(id).and_then(|key| self.residues.get(key))
    }
}

impl FromIterator<Residue> for Structure {
    fn from_iter<I: IntoIterator<Item = Residue>>(iter: I) -> Self {
        let mut structure = Structure::new();
        for residue in iter {
            structure.add_residue(residue);
        }
        structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomType;
    use crate::core::models::residue::ResidueType;
    use nalgebra::Point3;

    fn residue(chain: char, number: i32) -> Residue {
        Residue::new(ResidueId::new(chain, number), ResidueType::G)
    }

    #[test]
    fn add_residue_indexes_by_identity_and_keeps_order() {
        let mut structure = Structure::new();
        let k1 = structure.add_residue(residue('A', 2));
        let k2 = structure.add_residue(residue('A', 1));

        assert_eq!(structure.len(), 2);
        assert_eq!(structure.find_residue(&ResidueId::new('A', 2)), Some(k1));
        let order: Vec<_> = structure.residues_iter().map(|(key, _)| key).collect();
        assert_eq!(order, vec![k1, k2]);
    }

    #[test]
    fn add_residue_with_existing_identity_replaces_contents() {
        let mut structure = Structure::new();
        let key = structure.add_residue(residue('A', 1));
        let replacement =
            residue('A', 1).with_atom(AtomType::N9, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(structure.add_residue(replacement), key);
        assert_eq!(structure.len(), 1);
        assert!(structure.residue(key).unwrap().find_atom(AtomType::N9).is_some());
    }

    #[test]
    fn remove_residue_clears_index_and_order() {
        let mut structure: Structure = [residue('A', 1), residue('B', 1)].into_iter().collect();
        let key = structure.find_residue(&ResidueId::new('A', 1)).unwrap();
        assert!(structure.remove_residue(key).is_some());
        assert!(structure.lookup(&ResidueId::new('A', 1)).is_none());
        assert_eq!(structure.residues_iter().count(), 1);
        assert!(structure.remove_residue(key).is_none());
    }

    #[test]
    fn lookup_is_available_for_maps_and_slices() {
        let residues = vec![residue('A', 1), residue('A', 2)];
        let id = ResidueId::new('A', 2);
        assert_eq!(residues.lookup(&id).map(Residue::id), Some(id));
        assert!(residues.as_slice().contains_residue(&id));

        let map: HashMap<_, _> = residues.into_iter().map(|r| (r.id(), r)).collect();
        assert!(map.contains_residue(&id));
        assert!(!map.contains_residue(&ResidueId::new('Z', 9)));
    }
}
