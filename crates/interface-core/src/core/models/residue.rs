use std::collections::HashMap;

/// A residue (group): the structural subunit owning a contiguous set of atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub index: usize,       // Position of the residue in the system
    pub id: isize,          // Residue sequence number from source file
    pub name: String,       // Name of the residue (e.g., "ALA", "GLY")
    pub chain_index: usize, // Position of the parent chain in the system
    pub(crate) atom_indices: Vec<usize>,
    atom_name_map: HashMap<String, usize>,
}

impl Residue {
    pub(crate) fn new(index: usize, id: isize, name: &str, chain_index: usize) -> Self {
        Self {
            index,
            id,
            name: name.to_string(),
            chain_index,
            atom_indices: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_index: usize) {
        self.atom_indices.push(atom_index);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_index);
    }

    pub fn atom_indices(&self) -> &[usize] {
        &self.atom_indices
    }

    /// Returns the first atom of this residue carrying `name`.
    pub fn atom_index_by_name(&self, name: &str) -> Option<usize> {
        self.atom_name_map.get(name).copied()
    }
}
