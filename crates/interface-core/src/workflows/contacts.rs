use crate::core::units::Length;
use crate::core::utils::identifiers::ALPHA_CARBON_ATOM_NAME;
use crate::engine::config::{ContactMapConfig, ContactType, DEFAULT_NEARBY_THRESHOLD};
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::labels::{ElementLabel, LabeledSeries};
use crate::toolkit::provider::{StructureProvider, Target};
use crate::toolkit::selection::Selection;
use ndarray::{Array3, Axis};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Group-level contacts between a receptor and a ligand, indexed
/// `[frame, receptor group, ligand group]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactMap {
    pub tensor: Array3<bool>,
    pub receptor: Vec<ElementLabel>,
    pub ligand: Vec<ElementLabel>,
}

/// Per-frame contact counts of every receptor and ligand group.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectivity {
    pub receptor: LabeledSeries<usize>,
    pub ligand: LabeledSeries<usize>,
}

impl ContactMap {
    /// Sums the contact tensor along the ligand axis (receptor counts) and the receptor axis
    /// (ligand counts).
    pub fn connectivity(&self) -> Result<Connectivity, EngineError> {
        let counts = self.tensor.mapv(usize::from);
        Ok(Connectivity {
            receptor: LabeledSeries::new(self.receptor.clone(), counts.sum_axis(Axis(2)))?,
            ligand: LabeledSeries::new(self.ligand.clone(), counts.sum_axis(Axis(1)))?,
        })
    }
}

#[instrument(skip_all, name = "contact_map_workflow")]
pub fn contact_map<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor: &Selection,
    ligand: &Selection,
    config: &ContactMapConfig,
) -> Result<ContactMap, EngineError> {
    let provider = context.provider;

    let receptor_groups = provider.get_indices(item, receptor, Target::Group)?;
    let ligand_groups = provider.get_indices(item, ligand, Target::Group)?;
    info!(
        receptor_groups = receptor_groups.len(),
        ligand_groups = ligand_groups.len(),
        contact_type = %config.contact_type,
        threshold = %config.threshold,
        "Building group contact map."
    );

    let tensor = context.reporter.stage("Contact map", || match config.contact_type {
        ContactType::CAlpha => alpha_carbon_contacts(context, item, &receptor_groups, &ligand_groups, config),
        ContactType::HeavyAtoms | ContactType::AllAtoms => {
            atom_reduced_contacts(context, item, &receptor_groups, &ligand_groups, config)
        }
    })?;

    let receptor_labels = ElementLabel::zip(
        &receptor_groups,
        provider.labels(item, Target::Group, &receptor_groups)?,
        "receptor labels",
    )?;
    let ligand_labels = ElementLabel::zip(
        &ligand_groups,
        provider.labels(item, Target::Group, &ligand_groups)?,
        "ligand labels",
    )?;

    debug!(
        contacts = tensor.iter().filter(|&&c| c).count(),
        "Contact map complete."
    );
    Ok(ContactMap {
        tensor,
        receptor: receptor_labels,
        ligand: ligand_labels,
    })
}

/// Per-frame contact counts of receptor and ligand groups at `config`.
#[instrument(skip_all, name = "connectivity_workflow")]
pub fn connectivity<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor: &Selection,
    ligand: &Selection,
    config: &ContactMapConfig,
) -> Result<Connectivity, EngineError> {
    contact_map(context, item, receptor, ligand, config)?.connectivity()
}

/// [`connectivity`] at the tighter nearby threshold, 0.6 nm unless `threshold` is given.
#[instrument(skip_all, name = "nearby_connectivity_workflow")]
pub fn nearby_connectivity<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor: &Selection,
    ligand: &Selection,
    contact_type: ContactType,
    threshold: Option<Length>,
) -> Result<Connectivity, EngineError> {
    let config = ContactMapConfig {
        contact_type,
        threshold: threshold.unwrap_or(DEFAULT_NEARBY_THRESHOLD),
    };
    connectivity(context, item, receptor, ligand, &config)
}

fn alpha_carbon_contacts<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor_groups: &[usize],
    ligand_groups: &[usize],
    config: &ContactMapConfig,
) -> Result<Array3<bool>, EngineError> {
    let provider = context.provider;
    let alpha_carbons = |groups: &[usize], role: &'static str| -> Result<Vec<usize>, EngineError> {
        let selection = Selection::AtomNames(vec![ALPHA_CARBON_ATOM_NAME.to_string()])
            .and(Selection::groups(groups.iter().copied()));
        let atoms = provider.get_indices(item, &selection, Target::Atom)?;
        // Exactly one CA per group, in group order.
        let owners = provider.atom_group_indices(item, &atoms)?;
        if owners != groups {
            let found = groups
                .iter()
                .filter(|&&g| owners.iter().filter(|&&o| o == g).count() == 1)
                .count();
            return Err(EngineError::ShapeMismatch {
                context: role,
                expected: groups.len(),
                found,
            });
        }
        Ok(atoms)
    };

    let receptor_atoms = alpha_carbons(receptor_groups, "receptor alpha-carbons")?;
    let ligand_atoms = alpha_carbons(ligand_groups, "ligand alpha-carbons")?;
    let tensor = provider.contact_map(item, &receptor_atoms, &ligand_atoms, config.threshold)?;
    check_pair_axes(&tensor, receptor_groups.len(), ligand_groups.len())?;
    Ok(tensor)
}

fn atom_reduced_contacts<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor_groups: &[usize],
    ligand_groups: &[usize],
    config: &ContactMapConfig,
) -> Result<Array3<bool>, EngineError> {
    let provider = context.provider;
    let member_atoms = |groups: &[usize]| -> Result<Vec<usize>, EngineError> {
        let mut selection = Selection::groups(groups.iter().copied());
        if config.contact_type == ContactType::HeavyAtoms {
            selection = selection.and(Selection::Elements(vec!["H".to_string()]).negate());
        }
        Ok(provider.get_indices(item, &selection, Target::Atom)?)
    };

    let receptor_atoms = member_atoms(receptor_groups)?;
    let ligand_atoms = member_atoms(ligand_groups)?;
    let atom_tensor = provider.contact_map(item, &receptor_atoms, &ligand_atoms, config.threshold)?;
    check_pair_axes(&atom_tensor, receptor_atoms.len(), ligand_atoms.len())?;

    let column_of = |groups: &[usize], atoms: &[usize]| -> Result<Vec<usize>, EngineError> {
        let position: HashMap<usize, usize> =
            groups.iter().enumerate().map(|(p, &g)| (g, p)).collect();
        provider
            .atom_group_indices(item, atoms)?
            .into_iter()
            .map(|g| {
                position.get(&g).copied().ok_or(EngineError::ShapeMismatch {
                    context: "atom-to-group mapping",
                    expected: groups.len(),
                    found: g,
                })
            })
            .collect()
    };
    let receptor_columns = column_of(receptor_groups, &receptor_atoms)?;
    let ligand_columns = column_of(ligand_groups, &ligand_atoms)?;

    let n_frames = atom_tensor.len_of(Axis(0));
    let mut tensor = Array3::from_elem((n_frames, receptor_groups.len(), ligand_groups.len()), false);
    for ((frame, i, j), &in_contact) in atom_tensor.indexed_iter() {
        if in_contact {
            tensor[[frame, receptor_columns[i], ligand_columns[j]]] = true;
        }
    }
    Ok(tensor)
}

fn check_pair_axes(
    tensor: &Array3<bool>,
    n_receptor: usize,
    n_ligand: usize,
) -> Result<(), EngineError> {
    if tensor.len_of(Axis(1)) != n_receptor {
        return Err(EngineError::ShapeMismatch {
            context: "contact tensor receptor axis",
            expected: n_receptor,
            found: tensor.len_of(Axis(1)),
        });
    }
    if tensor.len_of(Axis(2)) != n_ligand {
        return Err(EngineError::ShapeMismatch {
            context: "contact tensor ligand axis",
            expected: n_ligand,
            found: tensor.len_of(Axis(2)),
        });
    }
    Ok(())
}
