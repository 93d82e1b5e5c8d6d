use super::error::ToolkitError;
use super::geometry::{self, check_atom_indices};
use super::provider::{DistanceTensor, FrameSelection, RadiusType, SasaArray, StructureProvider, Target};
use super::radii::RadiiTable;
use super::selection::Selection;
use super::surface::ShrakeRupley;
use crate::core::models::system::MolecularSystem;
use crate::core::units::{AreaUnit, Length, LengthUnit};
use itertools::Itertools;
use ndarray::{Array2, Array3};
use tracing::debug;

/// The reference [`StructureProvider`] over an in-memory [`MolecularSystem`].
#[derive(Debug, Clone, Default)]
pub struct SystemToolkit {
    radii: RadiiTable,
    surface: ShrakeRupley,
}

impl SystemToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_radii(mut self, radii: RadiiTable) -> Self {
        self.radii = radii;
        self
    }

    pub fn with_surface(mut self, probe_radius: Length, sphere_points: usize) -> Self {
        self.surface = ShrakeRupley::new(probe_radius, sphere_points);
        self
    }

    pub fn radii_table(&self) -> &RadiiTable {
        &self.radii
    }

    fn selected_atoms(
        &self,
        system: &MolecularSystem,
        selection: &Selection,
    ) -> Result<Vec<usize>, ToolkitError> {
        Ok(selection
            .atom_mask(system)?
            .into_iter()
            .enumerate()
            .filter_map(|(i, selected)| selected.then_some(i))
            .collect())
    }

    fn element_of(atom_index: usize, system: &MolecularSystem, target: Target) -> usize {
        let atom = &system.atoms()[atom_index];
        match target {
            Target::Atom => atom.index,
            Target::Group => atom.residue_index,
            Target::Chain => atom.chain_index,
        }
    }

    fn group_label(system: &MolecularSystem, residue_index: usize) -> String {
        let residue = &system.residues()[residue_index];
        let chain = &system.chains()[residue.chain_index];
        format!("{}{}:{}", residue.name, residue.id, chain.id)
    }
}

impl StructureProvider for SystemToolkit {
    type Handle = MolecularSystem;

    fn get_indices(
        &self,
        item: &MolecularSystem,
        selection: &Selection,
        target: Target,
    ) -> Result<Vec<usize>, ToolkitError> {
        let atoms = self.selected_atoms(item, selection)?;
        Ok(match target {
            Target::Atom => atoms,
            _ => atoms
                .into_iter()
                .map(|a| Self::element_of(a, item, target))
                .sorted_unstable()
                .dedup()
                .collect(),
        })
    }

    fn atom_group_indices(
        &self,
        item: &MolecularSystem,
        atoms: &[usize],
    ) -> Result<Vec<usize>, ToolkitError> {
        check_atom_indices(item, atoms)?;
        Ok(atoms
            .iter()
            .map(|&a| item.atoms()[a].residue_index)
            .collect())
    }

    fn n_frames(&self, item: &MolecularSystem) -> Result<usize, ToolkitError> {
        Ok(item.n_frames())
    }

    fn contact_map(
        &self,
        item: &MolecularSystem,
        atoms_1: &[usize],
        atoms_2: &[usize],
        threshold: Length,
    ) -> Result<Array3<bool>, ToolkitError> {
        geometry::contact_tensor(item, atoms_1, atoms_2, threshold)
    }

    fn distance(
        &self,
        item: &MolecularSystem,
        atoms_1: &[usize],
        atoms_2: &[usize],
    ) -> Result<DistanceTensor, ToolkitError> {
        Ok(DistanceTensor {
            values: geometry::distance_tensor(item, atoms_1, atoms_2)?,
            unit: LengthUnit::Angstrom,
        })
    }

    fn sasa(
        &self,
        item: &MolecularSystem,
        selection: &Selection,
        frames: &FrameSelection,
        target: Target,
    ) -> Result<SasaArray, ToolkitError> {
        let frames = frames.resolve(item.n_frames())?;
        let selected = self.selected_atoms(item, selection)?;
        let elements = self.get_indices(item, selection, target)?;

        let all_atoms: Vec<usize> = (0..item.n_atoms()).collect();
        let radii: Vec<f64> = self
            .radii(item, &all_atoms, RadiusType::VanDerWaals)?
            .into_iter()
            .map(|r| r.value_in(LengthUnit::Angstrom))
            .collect();

        let column_of: std::collections::HashMap<usize, usize> = elements
            .iter()
            .enumerate()
            .map(|(column, &element)| (element, column))
            .collect();

        let mut values = Array2::<f64>::zeros((frames.len(), elements.len()));
        for (row, &frame) in frames.iter().enumerate() {
            let coords = item
                .frame(frame)
                .ok_or(ToolkitError::FrameOutOfRange {
                    frame,
                    n_frames: item.n_frames(),
                })?;
            let areas = self.surface.atom_areas(coords, &radii);
            for &atom in &selected {
                let element = Self::element_of(atom, item, target);
                if let Some(&column) = column_of.get(&element) {
                    values[[row, column]] += areas[atom];
                }
            }
        }

        debug!(
            frames = frames.len(),
            elements = elements.len(),
            target = %target,
            "Computed solvent-accessible surface areas."
        );
        Ok(SasaArray {
            values,
            unit: AreaUnit::SquareAngstrom,
        })
    }

    fn extract(
        &self,
        item: &MolecularSystem,
        selection: &Selection,
    ) -> Result<MolecularSystem, ToolkitError> {
        let atoms = self.selected_atoms(item, selection)?;
        Ok(item.extract(&atoms)?)
    }

    fn labels(
        &self,
        item: &MolecularSystem,
        target: Target,
        indices: &[usize],
    ) -> Result<Vec<String>, ToolkitError> {
        let (kind, len) = match target {
            Target::Atom => ("Atom", item.n_atoms()),
            Target::Group => ("Group", item.n_residues()),
            Target::Chain => ("Chain", item.n_chains()),
        };
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(ToolkitError::IndexOutOfRange { kind, index, len });
        }

        Ok(indices
            .iter()
            .map(|&i| match target {
                Target::Atom => {
                    let atom = &item.atoms()[i];
                    format!("{}@{}", Self::group_label(item, atom.residue_index), atom.name)
                }
                Target::Group => Self::group_label(item, i),
                Target::Chain => item.chains()[i].id.to_string(),
            })
            .collect())
    }

    fn radii(
        &self,
        item: &MolecularSystem,
        atoms: &[usize],
        radius_type: RadiusType,
    ) -> Result<Vec<Length>, ToolkitError> {
        check_atom_indices(item, atoms)?;
        match radius_type {
            RadiusType::VanDerWaals => atoms
                .iter()
                .map(|&a| self.radii.vdw_radius(&item.atoms()[a].element))
                .collect(),
        }
    }
}
