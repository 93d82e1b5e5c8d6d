use crate::core::units::LengthUnit;
use crate::engine::config::{FineFilterFrame, InterfaceCriteria};
use crate::engine::context::AnalysisContext;
use crate::engine::error::EngineError;
use crate::engine::labels::ElementLabel;
use crate::engine::progress::Progress;
use crate::toolkit::provider::{RadiusType, StructureProvider, Target};
use crate::toolkit::selection::Selection;
use itertools::Itertools;
use ndarray::Axis;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, instrument};

/// Groups on each side with at least one atom in van der Waals contact with the other side,
/// over all frames. Both lists are sorted by group index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContactingResidues {
    pub receptor: Vec<ElementLabel>,
    pub ligand: Vec<ElementLabel>,
}

/// Finds receptor and ligand groups in contact.
///
/// Atom pairs closer than `criteria.coarse_cutoff` in any frame are candidates. A candidate is
/// accepted when its distance is strictly below the sum of both van der Waals radii plus
/// `criteria.tolerance`. With [`FineFilterFrame::First`] that distance is always read from
/// frame 0; with [`FineFilterFrame::Candidate`] it is read from the frame that produced the
/// candidate.
#[instrument(skip_all, name = "contacting_residues_workflow")]
pub fn contacting_residues<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    receptor: &Selection,
    ligand: &Selection,
    criteria: &InterfaceCriteria,
) -> Result<ContactingResidues, EngineError> {
    let provider = context.provider;

    let receptor_atoms = provider.get_indices(item, receptor, Target::Atom)?;
    let ligand_atoms = provider.get_indices(item, ligand, Target::Atom)?;
    info!(
        receptor_atoms = receptor_atoms.len(),
        ligand_atoms = ligand_atoms.len(),
        coarse_cutoff = %criteria.coarse_cutoff,
        tolerance = %criteria.tolerance,
        fine_filter_frame = %criteria.fine_filter_frame,
        "Detecting contacting residues."
    );

    let distances = context
        .reporter
        .stage("Interface distances", || {
            provider.distance(item, &receptor_atoms, &ligand_atoms)
        })?;
    for (axis, expected, what) in [
        (1, receptor_atoms.len(), "distance tensor receptor axis"),
        (2, ligand_atoms.len(), "distance tensor ligand axis"),
    ] {
        let found = distances.values.len_of(Axis(axis));
        if found != expected {
            return Err(EngineError::ShapeMismatch {
                context: what,
                expected,
                found,
            });
        }
    }

    let unit = distances.unit;
    let coarse_cutoff = criteria.coarse_cutoff.value_in(unit);
    let candidates: Vec<(usize, usize, usize)> = distances
        .values
        .indexed_iter()
        .filter(|&(_, &d)| d < coarse_cutoff)
        .map(|(index, _)| index)
        .collect();
    debug!(candidates = candidates.len(), "Coarse filter applied.");

    if candidates.is_empty() {
        return Ok(ContactingResidues::default());
    }

    let receptor_radius = candidate_radii(
        context,
        item,
        &receptor_atoms,
        candidates.iter().map(|&(_, i, _)| i),
        unit,
    )?;
    let ligand_radius = candidate_radii(
        context,
        item,
        &ligand_atoms,
        candidates.iter().map(|&(_, _, j)| j),
        unit,
    )?;
    let tolerance = criteria.tolerance.value_in(unit);

    let reporter = context.reporter;
    reporter.report(Progress::Message(format!(
        "{} candidate atom pairs within {}",
        candidates.len(),
        criteria.coarse_cutoff
    )));
    let (receptor_hits, ligand_hits) = reporter.stage("Van der Waals check", || {
        reporter.report(Progress::TaskStart {
            total_steps: candidates.len() as u64,
        });
        let mut receptor_hits = BTreeSet::new();
        let mut ligand_hits = BTreeSet::new();
        for &(frame, i, j) in &candidates {
            let fine_frame = match criteria.fine_filter_frame {
                FineFilterFrame::First => 0,
                FineFilterFrame::Candidate => frame,
            };
            let limit = receptor_radius[&i] + ligand_radius[&j] + tolerance;
            if distances.values[[fine_frame, i, j]] < limit {
                receptor_hits.insert(receptor_atoms[i]);
                ligand_hits.insert(ligand_atoms[j]);
            }
            reporter.report(Progress::TaskIncrement);
        }
        reporter.report(Progress::TaskFinish);
        (receptor_hits, ligand_hits)
    });
    debug!(
        receptor_atoms = receptor_hits.len(),
        ligand_atoms = ligand_hits.len(),
        "Fine filter applied."
    );

    let receptor = owning_groups(context, item, &receptor_hits, "receptor labels")?;
    let ligand = owning_groups(context, item, &ligand_hits, "ligand labels")?;
    info!(
        receptor_groups = receptor.len(),
        ligand_groups = ligand.len(),
        "Contacting residues found."
    );
    Ok(ContactingResidues { receptor, ligand })
}

/// Van der Waals radius, in `unit`, of every atom position appearing among the candidates.
fn candidate_radii<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    atoms: &[usize],
    positions: impl Iterator<Item = usize>,
    unit: LengthUnit,
) -> Result<HashMap<usize, f64>, EngineError> {
    let positions: Vec<usize> = positions.sorted_unstable().dedup().collect();
    let indices: Vec<usize> = positions.iter().map(|&p| atoms[p]).collect();
    let radii = context
        .provider
        .radii(item, &indices, RadiusType::VanDerWaals)?;
    if radii.len() != indices.len() {
        return Err(EngineError::ShapeMismatch {
            context: "van der Waals radii",
            expected: indices.len(),
            found: radii.len(),
        });
    }
    Ok(positions
        .into_iter()
        .zip(radii)
        .map(|(p, r)| (p, r.value_in(unit)))
        .collect())
}

fn owning_groups<P: StructureProvider>(
    context: &AnalysisContext<P>,
    item: &P::Handle,
    atoms: &BTreeSet<usize>,
    labels_context: &'static str,
) -> Result<Vec<ElementLabel>, EngineError> {
    let provider = context.provider;
    let atoms: Vec<usize> = atoms.iter().copied().collect();
    let groups: Vec<usize> = provider
        .atom_group_indices(item, &atoms)?
        .into_iter()
        .sorted_unstable()
        .dedup()
        .collect();
    ElementLabel::zip(
        &groups,
        provider.labels(item, Target::Group, &groups)?,
        labels_context,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::system::MolecularSystem;
    use crate::core::units::Length;
    use crate::engine::config::InterfaceCriteriaBuilder;
    use crate::engine::progress::ProgressReporter;
    use crate::toolkit::error::ToolkitError;
    use crate::toolkit::radii::RadiiTable;
    use crate::toolkit::system::SystemToolkit;
    use crate::workflows::testing::{build_system, complex_fixture, keyword};
    use nalgebra::Point3;

    fn pair_toolkit() -> SystemToolkit {
        let mut radii = RadiiTable::new();
        radii.set("C", 1.5).unwrap();
        radii.set("N", 1.4).unwrap();
        SystemToolkit::new().with_radii(radii)
    }

    fn atom_pair(separation: f64) -> MolecularSystem {
        build_system(&[
            ('A', &[(7, "ALA", &[("C1", "C_3", [0.0, 0.0, 0.0])])]),
            ('B', &[(1, "LIG", &[("N1", "N_R", [separation, 0.0, 0.0])])]),
        ])
    }

    fn names(labels: &[ElementLabel]) -> Vec<&str> {
        labels.iter().map(|l| l.label.as_str()).collect()
    }

    #[test]
    fn pair_within_radii_plus_tolerance_is_accepted() {
        let toolkit = pair_toolkit();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);

        let result = contacting_residues(
            &context,
            &atom_pair(3.0),
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        )
        .unwrap();

        assert_eq!(result.receptor, vec![ElementLabel::new(0, "ALA7:A")]);
        assert_eq!(result.ligand, vec![ElementLabel::new(1, "LIG1:B")]);
    }

    #[test]
    fn pair_beyond_radii_plus_tolerance_is_rejected() {
        let toolkit = pair_toolkit();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);

        let result = contacting_residues(
            &context,
            &atom_pair(3.5),
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        )
        .unwrap();

        assert!(result.receptor.is_empty());
        assert!(result.ligand.is_empty());
    }

    #[test]
    fn coarse_cutoff_bounds_candidates() {
        let toolkit = pair_toolkit();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);
        let criteria = InterfaceCriteriaBuilder::new()
            .coarse_cutoff(Length::angstroms(2.5))
            .build()
            .unwrap();

        let result = contacting_residues(
            &context,
            &atom_pair(3.0),
            &keyword("chain A"),
            &keyword("chain B"),
            &criteria,
        )
        .unwrap();
        assert_eq!(result, ContactingResidues::default());
    }

    #[test]
    fn fine_filter_reads_first_frame_unless_candidate_mode() {
        let toolkit = pair_toolkit();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);
        let mut system = atom_pair(3.95);
        system
            .push_frame(vec![Point3::origin(), Point3::new(2.0, 0.0, 0.0)])
            .unwrap();

        let first = contacting_residues(
            &context,
            &system,
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        )
        .unwrap();
        assert!(first.receptor.is_empty());

        let criteria = InterfaceCriteriaBuilder::new()
            .fine_filter_frame(FineFilterFrame::Candidate)
            .build()
            .unwrap();
        let candidate = contacting_residues(
            &context,
            &system,
            &keyword("chain A"),
            &keyword("chain B"),
            &criteria,
        )
        .unwrap();
        assert_eq!(names(&candidate.receptor), vec!["ALA7:A"]);
        assert_eq!(names(&candidate.ligand), vec!["LIG1:B"]);
    }

    #[test]
    fn fixture_interface_is_the_hydrogen_contact() {
        let toolkit = SystemToolkit::new();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);

        let result = contacting_residues(
            &context,
            &complex_fixture(),
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        )
        .unwrap();

        assert_eq!(result.receptor, vec![ElementLabel::new(1, "GLY2:A")]);
        assert_eq!(result.ligand, vec![ElementLabel::new(3, "LEU1:B")]);
    }

    #[test]
    fn fine_filter_reports_one_step_per_candidate() {
        let toolkit = pair_toolkit();
        let events = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let context = AnalysisContext::new(&toolkit, &reporter);

        contacting_residues(
            &context,
            &atom_pair(3.0),
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        )
        .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert!(matches!(&events[2], Progress::Message(text) if text.starts_with("1 candidate")));
        assert_eq!(
            events[3..],
            [
                Progress::StageStart {
                    name: "Van der Waals check"
                },
                Progress::TaskStart { total_steps: 1 },
                Progress::TaskIncrement,
                Progress::TaskFinish,
                Progress::StageFinish,
            ]
        );
    }

    #[test]
    fn radii_are_only_required_for_candidates() {
        let toolkit = pair_toolkit();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);
        let far_unknown = build_system(&[
            ('A', &[(1, "ALA", &[("C1", "C_3", [0.0, 0.0, 0.0])])]),
            (
                'B',
                &[
                    (1, "LIG", &[("N1", "N_R", [3.0, 0.0, 0.0])]),
                    (2, "UNK", &[("1", "", [30.0, 0.0, 0.0])]),
                ],
            ),
        ]);

        let result = contacting_residues(
            &context,
            &far_unknown,
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        )
        .unwrap();
        assert_eq!(names(&result.ligand), vec!["LIG1:B"]);
    }

    #[test]
    fn unknown_element_among_candidates_is_an_error() {
        let toolkit = pair_toolkit();
        let reporter = ProgressReporter::new();
        let context = AnalysisContext::new(&toolkit, &reporter);
        let system = build_system(&[
            ('A', &[(1, "ALA", &[("C1", "C_3", [0.0, 0.0, 0.0])])]),
            ('B', &[(1, "UNK", &[("1", "", [3.0, 0.0, 0.0])])]),
        ]);

        let result = contacting_residues(
            &context,
            &system,
            &keyword("chain A"),
            &keyword("chain B"),
            &InterfaceCriteria::default(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Toolkit(ToolkitError::UnknownElement(_)))
        ));
    }
}
