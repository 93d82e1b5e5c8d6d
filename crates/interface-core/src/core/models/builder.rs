use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::residue::Residue;
use super::system::{ModelError, MolecularSystem};
use nalgebra::Point3;
use std::collections::HashMap;

/// Incrementally assembles a single-frame [`MolecularSystem`] in file order.
pub struct MolecularSystemBuilder {
    system: MolecularSystem,
    positions: Vec<Point3<f64>>,

    // --- Builder-specific state for efficient construction ---
    chain_id_map: HashMap<char, usize>,
    residue_key_map: HashMap<(usize, isize), usize>,
    current_chain_idx: Option<usize>,
    current_residue_idx: Option<usize>,
}

impl Default for MolecularSystemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self {
            system: MolecularSystem::new(),
            positions: Vec::new(),
            chain_id_map: HashMap::new(),
            residue_key_map: HashMap::new(),
            current_chain_idx: None,
            current_residue_idx: None,
        }
    }

    /// Opens the chain `id`, creating it on first use.
    pub fn start_chain(&mut self, id: char, chain_type: ChainType) -> &mut Self {
        let idx = *self.chain_id_map.entry(id).or_insert_with(|| {
            let index = self.system.chains.len();
            self.system.chains.push(Chain::new(index, id, chain_type));
            index
        });
        self.current_chain_idx = Some(idx);
        self.current_residue_idx = None;
        self
    }

    /// Opens residue `id` of the current chain, creating it on first use.
    pub fn start_residue(&mut self, id: isize, name: &str) -> Result<&mut Self, ModelError> {
        let chain_idx = self.current_chain_idx.ok_or(ModelError::NoOpenChain)?;

        let res_idx = *self
            .residue_key_map
            .entry((chain_idx, id))
            .or_insert_with(|| {
                let index = self.system.residues.len();
                self.system
                    .residues
                    .push(Residue::new(index, id, name, chain_idx));
                self.system.chains[chain_idx].residue_indices.push(index);
                index
            });
        self.current_residue_idx = Some(res_idx);
        Ok(self)
    }

    /// Adds an atom to the current residue with its frame-0 position.
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        position: Point3<f64>,
        charge: f64,
        ff_type: &str,
    ) -> Result<&mut Self, ModelError> {
        let chain_idx = self.current_chain_idx.ok_or(ModelError::NoOpenChain)?;
        let res_idx = self.current_residue_idx.ok_or(ModelError::NoOpenResidue)?;

        let atom_idx = self.system.atoms.len();
        let mut atom = Atom::new(atom_idx, serial, name, ff_type, res_idx, chain_idx);
        atom.partial_charge = charge;

        self.system.residues[res_idx].add_atom(name, atom_idx);
        self.system.atoms.push(atom);
        self.positions.push(position);
        Ok(self)
    }

    pub fn build(mut self) -> MolecularSystem {
        self.system.frames = vec![self.positions];
        self.system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_residue_without_chain_fails() {
        let mut builder = MolecularSystemBuilder::new();
        assert_eq!(
            builder.start_residue(1, "ALA").err(),
            Some(ModelError::NoOpenChain)
        );
    }

    #[test]
    fn adding_atom_without_residue_fails() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Polymer);
        let result = builder.add_atom(1, "CA", Point3::origin(), 0.0, "C_3");
        assert_eq!(result.err(), Some(ModelError::NoOpenResidue));
    }

    #[test]
    fn reopening_chain_and_residue_reuses_existing_entries() {
        let mut builder = MolecularSystemBuilder::new();
        builder.start_chain('A', ChainType::Polymer);
        builder.start_residue(1, "GLY").unwrap();
        builder
            .add_atom(1, "N", Point3::origin(), 0.0, "N_R")
            .unwrap();
        builder.start_chain('B', ChainType::Polymer);
        builder.start_residue(1, "ALA").unwrap();
        builder
            .add_atom(2, "CA", Point3::origin(), 0.0, "C_3")
            .unwrap();
        builder.start_chain('A', ChainType::Polymer);
        builder.start_residue(1, "GLY").unwrap();
        builder
            .add_atom(3, "CA", Point3::new(1.0, 0.0, 0.0), 0.0, "C_3")
            .unwrap();

        let system = builder.build();
        assert_eq!(system.n_chains(), 2);
        assert_eq!(system.n_residues(), 2);
        assert_eq!(system.residue(0).unwrap().atom_indices(), &[0, 2]);
        assert_eq!(system.chain(0).unwrap().residue_indices(), &[0]);
        assert_eq!(system.n_frames(), 1);
        assert_eq!(system.frame(0).unwrap().len(), 3);
    }
}
