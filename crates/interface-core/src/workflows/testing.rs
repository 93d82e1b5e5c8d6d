use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::chain::ChainType;
use crate::core::models::system::MolecularSystem;
use crate::core::units::{AreaUnit, Length};
use crate::toolkit::error::ToolkitError;
use crate::toolkit::provider::{
    DistanceTensor, FrameSelection, RadiusType, SasaArray, StructureProvider, Target,
};
use crate::toolkit::selection::Selection;
use crate::toolkit::system::SystemToolkit;
use nalgebra::Point3;
use ndarray::{Array2, Array3};
use std::collections::HashMap;

pub(crate) type AtomSpec<'a> = (&'a str, &'a str, [f64; 3]);
pub(crate) type ResidueSpec<'a> = (isize, &'a str, &'a [AtomSpec<'a>]);

pub(crate) fn build_system(chains: &[(char, &[ResidueSpec])]) -> MolecularSystem {
    let mut builder = MolecularSystemBuilder::new();
    let mut serial = 1;
    for &(chain_id, residues) in chains {
        builder.start_chain(chain_id, ChainType::Polymer);
        for &(res_id, res_name, atoms) in residues {
            builder.start_residue(res_id, res_name).unwrap();
            for &(name, ff_type, [x, y, z]) in atoms {
                builder
                    .add_atom(serial, name, Point3::new(x, y, z), 0.0, ff_type)
                    .unwrap();
                serial += 1;
            }
        }
    }
    builder.build()
}

/// Receptor chain A (ALA1, GLY2, SER3) facing ligand chain B (LEU1, VAL2).
///
/// Alpha-carbon distances (Å): ALA1–LEU1 5.0, ALA1–VAL2 15.8, GLY2–LEU1 9.4, GLY2–VAL2 8.6,
/// SER3–LEU1 20.6, SER3–VAL2 7.1. VAL2:CB sits 4.5 Å from GLY2:CA and LEU1:HA 2.0 Å from it.
/// A second frame moves the ligand 100 Å away along z.
pub(crate) fn complex_fixture() -> MolecularSystem {
    let mut system = build_system(&[
        (
            'A',
            &[
                (1, "ALA", &[("CA", "C_3", [0.0, 0.0, 0.0]), ("CB", "C_3", [0.0, -1.5, 0.0])]),
                (2, "GLY", &[("CA", "C_3", [0.0, 8.0, 0.0])]),
                (3, "SER", &[("CA", "C_3", [0.0, 20.0, 0.0]), ("OG", "O_3", [-1.5, 20.0, 0.0])]),
            ],
        ),
        (
            'B',
            &[
                (1, "LEU", &[("CA", "C_3", [5.0, 0.0, 0.0]), ("HA", "H_", [2.0, 8.0, 0.0])]),
                (2, "VAL", &[("CA", "C_3", [5.0, 15.0, 0.0]), ("CB", "C_3", [4.0, 6.0, 0.0])]),
            ],
        ),
    ]);
    let moved: Vec<Point3<f64>> = system
        .frame(0)
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, p)| if i >= 5 { p + nalgebra::Vector3::new(0.0, 0.0, 100.0) } else { *p })
        .collect();
    system.push_frame(moved).unwrap();
    system
}

pub(crate) fn keyword(text: &str) -> Selection {
    Selection::parse(text, crate::toolkit::selection::SelectionSyntax::Keyword).unwrap()
}

/// Delegates to [`SystemToolkit`] but answers SASA requests from fixed tables keyed by the
/// chain ids present in the structure and the requested target (e.g. `"AB/group"`).
pub(crate) struct ScriptedSasa {
    pub inner: SystemToolkit,
    pub tables: HashMap<String, Array2<f64>>,
}

impl ScriptedSasa {
    pub fn new(tables: &[(&str, Array2<f64>)]) -> Self {
        Self {
            inner: SystemToolkit::new(),
            tables: tables
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    fn key(item: &MolecularSystem, target: Target) -> String {
        let chains: String = item.chains().iter().map(|c| c.id).collect();
        format!("{}/{}", chains, target)
    }
}

impl StructureProvider for ScriptedSasa {
    type Handle = MolecularSystem;

    fn get_indices(
        &self,
        item: &MolecularSystem,
        selection: &Selection,
        target: Target,
    ) -> Result<Vec<usize>, ToolkitError> {
        self.inner.get_indices(item, selection, target)
    }

    fn atom_group_indices(
        &self,
        item: &MolecularSystem,
        atoms: &[usize],
    ) -> Result<Vec<usize>, ToolkitError> {
        self.inner.atom_group_indices(item, atoms)
    }

    fn n_frames(&self, item: &MolecularSystem) -> Result<usize, ToolkitError> {
        self.inner.n_frames(item)
    }

    fn contact_map(
        &self,
        item: &MolecularSystem,
        atoms_1: &[usize],
        atoms_2: &[usize],
        threshold: Length,
    ) -> Result<Array3<bool>, ToolkitError> {
        self.inner.contact_map(item, atoms_1, atoms_2, threshold)
    }

    fn distance(
        &self,
        item: &MolecularSystem,
        atoms_1: &[usize],
        atoms_2: &[usize],
    ) -> Result<DistanceTensor, ToolkitError> {
        self.inner.distance(item, atoms_1, atoms_2)
    }

    fn sasa(
        &self,
        item: &MolecularSystem,
        _selection: &Selection,
        _frames: &FrameSelection,
        target: Target,
    ) -> Result<SasaArray, ToolkitError> {
        let key = Self::key(item, target);
        let values = self
            .tables
            .get(&key)
            .cloned()
            .ok_or_else(|| ToolkitError::Internal(format!("no scripted SASA for '{}'", key)))?;
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
        self.inner.extract(item, selection)
    }

    fn labels(
        &self,
        item: &MolecularSystem,
        target: Target,
        indices: &[usize],
    ) -> Result<Vec<String>, ToolkitError> {
        self.inner.labels(item, target, indices)
    }

    fn radii(
        &self,
        item: &MolecularSystem,
        atoms: &[usize],
        radius_type: RadiusType,
    ) -> Result<Vec<Length>, ToolkitError> {
        self.inner.radii(item, atoms, radius_type)
    }
}
