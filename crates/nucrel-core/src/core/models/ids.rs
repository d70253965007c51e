use slotmap::new_key_type;

new_key_type! {
    /// Arena key of a residue stored in a [`Structure`](super::structure::Structure).
    pub struct ResidueKey;
}
