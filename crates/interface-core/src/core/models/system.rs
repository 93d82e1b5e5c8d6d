use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Frame has {found} coordinates but the system has {expected} atoms")]
    FrameSizeMismatch { expected: usize, found: usize },

    #[error("Atom index {index} is out of range for a system of {len} atoms")]
    AtomIndexOutOfRange { index: usize, len: usize },

    #[error("A chain must be started before adding residues or atoms")]
    NoOpenChain,

    #[error("A residue must be started before adding atoms")]
    NoOpenResidue,
}

/// A molecular system: topology shared by one or more coordinate frames.
///
/// Atoms, residues and chains are stored in file order and addressed by position. Each
/// frame holds exactly one coordinate (in Angstroms) per atom.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    pub(crate) atoms: Vec<Atom>,
    pub(crate) residues: Vec<Residue>,
    pub(crate) chains: Vec<Chain>,
    pub(crate) frames: Vec<Vec<Point3<f64>>>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system with no frames.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn chain(&self, index: usize) -> Option<&Chain> {
        self.chains.get(index)
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_residues(&self) -> usize {
        self.residues.len()
    }

    pub fn n_chains(&self) -> usize {
        self.chains.len()
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Returns the coordinates of every atom in frame `frame`.
    pub fn frame(&self, frame: usize) -> Option<&[Point3<f64>]> {
        self.frames.get(frame).map(Vec::as_slice)
    }

    /// Returns the position of `atom` in frame `frame`.
    pub fn position(&self, frame: usize, atom: usize) -> Option<&Point3<f64>> {
        self.frames.get(frame).and_then(|coords| coords.get(atom))
    }

    /// Appends a coordinate frame.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::FrameSizeMismatch`] if `coordinates` does not hold exactly one
    /// position per atom.
    pub fn push_frame(&mut self, coordinates: Vec<Point3<f64>>) -> Result<(), ModelError> {
        if coordinates.len() != self.atoms.len() {
            return Err(ModelError::FrameSizeMismatch {
                expected: self.atoms.len(),
                found: coordinates.len(),
            });
        }
        self.frames.push(coordinates);
        Ok(())
    }

    /// Appends every frame of `other` to this system.
    ///
    /// Only coordinate counts are checked; the caller is responsible for `other` sharing
    /// this system's topology.
    pub fn append_frames_from(&mut self, other: &MolecularSystem) -> Result<(), ModelError> {
        for coords in &other.frames {
            self.push_frame(coords.clone())?;
        }
        Ok(())
    }

    /// Builds an independent system containing only `atom_indices`.
    ///
    /// Atoms keep their relative file order regardless of the order of `atom_indices`;
    /// duplicates are ignored. Chains and residues are rebuilt from the kept atoms, and every
    /// frame is copied.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AtomIndexOutOfRange`] if any index does not address an atom.
    pub fn extract(&self, atom_indices: &[usize]) -> Result<MolecularSystem, ModelError> {
        let mut kept: Vec<usize> = atom_indices.to_vec();
        kept.sort_unstable();
        kept.dedup();
        if let Some(&index) = kept.iter().find(|&&i| i >= self.atoms.len()) {
            return Err(ModelError::AtomIndexOutOfRange {
                index,
                len: self.atoms.len(),
            });
        }

        let mut sub = MolecularSystem::new();
        let mut chain_map: HashMap<usize, usize> = HashMap::new();
        let mut residue_map: HashMap<usize, usize> = HashMap::new();

        for &old_index in &kept {
            let old_atom = &self.atoms[old_index];
            let old_residue = &self.residues[old_atom.residue_index];
            let old_chain = &self.chains[old_atom.chain_index];

            let chain_index = *chain_map.entry(old_chain.index).or_insert_with(|| {
                let index = sub.chains.len();
                sub.chains
                    .push(Chain::new(index, old_chain.id, old_chain.chain_type));
                index
            });

            let residue_index = *residue_map.entry(old_residue.index).or_insert_with(|| {
                let index = sub.residues.len();
                sub.residues.push(Residue::new(
                    index,
                    old_residue.id,
                    &old_residue.name,
                    chain_index,
                ));
                sub.chains[chain_index].residue_indices.push(index);
                index
            });

            let atom_index = sub.atoms.len();
            let mut atom = old_atom.clone();
            atom.index = atom_index;
            atom.residue_index = residue_index;
            atom.chain_index = chain_index;
            sub.residues[residue_index].add_atom(&atom.name, atom_index);
            sub.atoms.push(atom);
        }

        sub.frames = self
            .frames
            .iter()
            .map(|coords| kept.iter().map(|&i| coords[i]).collect())
            .collect();

        Ok(sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::MolecularSystemBuilder;
    use crate::core::models::chain::ChainType;

    fn create_two_chain_system() -> MolecularSystem {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Polymer);
        builder.start_residue(1, "GLY").unwrap();
        builder
            .add_atom(1, "N", Point3::new(0.0, 0.0, 0.0), -0.3, "N_R")
            .unwrap();
        builder
            .add_atom(2, "CA", Point3::new(1.4, 0.0, 0.0), 0.1, "C_3")
            .unwrap();
        builder.start_residue(2, "ALA").unwrap();
        builder
            .add_atom(3, "CA", Point3::new(3.0, 0.0, 0.0), 0.1, "C_3")
            .unwrap();
        builder.start_chain('B', ChainType::Hetero);
        builder.start_residue(1, "LIG").unwrap();
        builder
            .add_atom(4, "O1", Point3::new(6.0, 0.0, 0.0), -0.5, "O_2")
            .unwrap();
        builder.build()
    }

    #[test]
    fn system_creation_and_access() {
        let system = create_two_chain_system();

        assert_eq!(system.n_atoms(), 4);
        assert_eq!(system.n_residues(), 3);
        assert_eq!(system.n_chains(), 2);
        assert_eq!(system.n_frames(), 1);
        assert_eq!(system.residue(1).unwrap().name, "ALA");
        assert_eq!(system.chain(1).unwrap().id, 'B');
        assert_eq!(system.atom(3).unwrap().residue_index, 2);
        assert_eq!(system.position(0, 1), Some(&Point3::new(1.4, 0.0, 0.0)));
    }

    #[test]
    fn push_frame_rejects_wrong_coordinate_count() {
        let mut system = create_two_chain_system();
        let result = system.push_frame(vec![Point3::origin(); 3]);
        assert_eq!(
            result,
            Err(ModelError::FrameSizeMismatch {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(system.n_frames(), 1);
    }

    #[test]
    fn push_frame_appends_new_coordinates() {
        let mut system = create_two_chain_system();
        system.push_frame(vec![Point3::new(9.0, 9.0, 9.0); 4]).unwrap();
        assert_eq!(system.n_frames(), 2);
        assert_eq!(system.position(1, 2), Some(&Point3::new(9.0, 9.0, 9.0)));
    }

    #[test]
    fn append_frames_from_copies_all_frames() {
        let mut system = create_two_chain_system();
        let other = create_two_chain_system();
        system.append_frames_from(&other).unwrap();
        assert_eq!(system.n_frames(), 2);
        assert_eq!(system.frame(1), other.frame(0));
    }

    #[test]
    fn extract_rebuilds_hierarchy_and_preserves_coordinates() {
        let mut system = create_two_chain_system();
        system.push_frame(vec![Point3::new(5.0, 5.0, 5.0); 4]).unwrap();

        let sub = system.extract(&[3, 2]).unwrap();

        assert_eq!(sub.n_atoms(), 2);
        assert_eq!(sub.n_residues(), 2);
        assert_eq!(sub.n_chains(), 2);
        assert_eq!(sub.n_frames(), 2);
        assert_eq!(sub.atom(0).unwrap().name, "CA");
        assert_eq!(sub.atom(1).unwrap().name, "O1");
        assert_eq!(sub.atom(1).unwrap().index, 1);
        assert_eq!(sub.atom(1).unwrap().residue_index, 1);
        assert_eq!(sub.residue(0).unwrap().id, 2);
        assert_eq!(sub.residue(0).unwrap().atom_indices(), &[0]);
        assert_eq!(sub.chain(1).unwrap().residue_indices(), &[1]);
        assert_eq!(sub.position(0, 0), Some(&Point3::new(3.0, 0.0, 0.0)));
        assert_eq!(sub.position(1, 1), Some(&Point3::new(5.0, 5.0, 5.0)));
    }

    #[test]
    fn extract_ignores_duplicate_indices() {
        let system = create_two_chain_system();
        let sub = system.extract(&[0, 0, 1]).unwrap();
        assert_eq!(sub.n_atoms(), 2);
        assert_eq!(sub.n_residues(), 1);
    }

    #[test]
    fn extract_rejects_out_of_range_indices() {
        let system = create_two_chain_system();
        assert_eq!(
            system.extract(&[0, 10]).unwrap_err(),
            ModelError::AtomIndexOutOfRange { index: 10, len: 4 }
        );
    }
}
