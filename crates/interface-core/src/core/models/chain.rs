use std::fmt;

/// Whether a chain was built from polymer (`ATOM`) or hetero (`HETATM`) records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChainType {
    #[default]
    Polymer,
    Hetero,
}

impl ChainType {
    pub fn from_hetero_flag(is_hetero: bool) -> Self {
        if is_hetero {
            ChainType::Hetero
        } else {
            ChainType::Polymer
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainType::Polymer => write!(f, "polymer"),
            ChainType::Hetero => write!(f, "hetero"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub index: usize,
    pub id: char,
    pub chain_type: ChainType,
    pub(crate) residue_indices: Vec<usize>, // groups of this chain, ascending
}

impl Chain {
    pub(crate) fn new(index: usize, id: char, chain_type: ChainType) -> Self {
        Self {
            index,
            id,
            chain_type,
            residue_indices: Vec::new(),
        }
    }

    pub fn residue_indices(&self) -> &[usize] {
        &self.residue_indices
    }

    pub fn n_residues(&self) -> usize {
        self.residue_indices.len()
    }
}
