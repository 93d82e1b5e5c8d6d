use super::{GlobalOptions, prepare, progress_reporter};
use crate::cli::{ContactArgs, NearbyArgs};
use crate::config::CommandOverrides;
use crate::error::Result;
use crate::output;
use openinterface::core::units::Length;
use openinterface::engine::context::AnalysisContext;
use openinterface::workflows::contacts;
use tracing::info;

fn contact_overrides(args: &ContactArgs) -> CommandOverrides {
    CommandOverrides {
        contact_type: args.contact_type,
        threshold_nm: args.threshold,
        ..CommandOverrides::default()
    }
}

pub fn run_contact_map(args: &ContactArgs, globals: &GlobalOptions) -> Result<()> {
    let prepared = prepare(&args.pair, contact_overrides(args), globals)?;
    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&prepared.config.toolkit, &reporter);

    let map = contacts::contact_map(
        &context,
        &prepared.system,
        &prepared.receptor,
        &prepared.ligand,
        &prepared.config.contact_map,
    )?;
    info!(
        receptor_groups = map.receptor.len(),
        ligand_groups = map.ligand.len(),
        "Writing contact map."
    );

    let mut writer = output::open_writer(args.pair.structure.output.as_deref())?;
    output::write_contact_map(&mut writer, &map)
}

pub fn run_connectivity(args: &ContactArgs, globals: &GlobalOptions) -> Result<()> {
    let prepared = prepare(&args.pair, contact_overrides(args), globals)?;
    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&prepared.config.toolkit, &reporter);

    let connectivity = contacts::connectivity(
        &context,
        &prepared.system,
        &prepared.receptor,
        &prepared.ligand,
        &prepared.config.contact_map,
    )?;

    let mut writer = output::open_writer(args.pair.structure.output.as_deref())?;
    output::write_sided_series(
        &mut writer,
        &[
            ("receptor", &connectivity.receptor),
            ("ligand", &connectivity.ligand),
        ],
    )
}

pub fn run_nearby_connectivity(args: &NearbyArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = CommandOverrides {
        contact_type: args.contact_type,
        ..CommandOverrides::default()
    };
    let prepared = prepare(&args.pair, overrides, globals)?;
    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&prepared.config.toolkit, &reporter);

    let connectivity = contacts::nearby_connectivity(
        &context,
        &prepared.system,
        &prepared.receptor,
        &prepared.ligand,
        prepared.config.contact_map.contact_type,
        args.threshold.map(Length::nanometers),
    )?;

    let mut writer = output::open_writer(args.pair.structure.output.as_deref())?;
    output::write_sided_series(
        &mut writer,
        &[
            ("receptor", &connectivity.receptor),
            ("ligand", &connectivity.ligand),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{PairArgs, StructureArgs};
    use crate::commands::fixtures;
    use openinterface::engine::config::ContactType;
    use openinterface::toolkit::selection::SelectionSyntax;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn pair_args(dir: &Path) -> PairArgs {
        let input = fixtures::write(dir, "complex.bgf", &fixtures::complex_bgf(0.0));
        let apart = fixtures::write(dir, "apart.bgf", &fixtures::complex_bgf(100.0));
        PairArgs {
            structure: StructureArgs {
                input,
                frames: vec![apart],
                syntax: Some(SelectionSyntax::Keyword),
                output: Some(dir.join("out.csv")),
            },
            receptor: "chain A".to_string(),
            ligand: "chain B".to_string(),
        }
    }

    fn globals() -> GlobalOptions<'static> {
        GlobalOptions {
            config: None,
            set_values: &[],
            quiet: true,
        }
    }

    #[test]
    fn connectivity_writes_counts_for_both_sides() {
        let dir = tempdir().unwrap();
        let args = ContactArgs {
            pair: pair_args(dir.path()),
            contact_type: None,
            threshold: None,
        };

        run_connectivity(&args, &globals()).unwrap();

        let csv = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "side,index,label,frame,value");
        assert!(lines.contains(&"receptor,1,GLY2:A,0,2"));
        assert!(lines.contains(&"receptor,1,GLY2:A,1,0"));
        assert!(lines.contains(&"ligand,2,LEU1:B,0,2"));
        assert_eq!(lines.len(), 1 + 2 * (2 + 2));
    }

    #[test]
    fn contact_map_honours_contact_type_and_threshold() {
        let dir = tempdir().unwrap();
        let args = ContactArgs {
            pair: pair_args(dir.path()),
            contact_type: Some(ContactType::AllAtoms),
            threshold: Some(0.3),
        };

        run_contact_map(&args, &globals()).unwrap();

        let csv = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(
            csv,
            "frame,receptor_index,receptor,ligand_index,ligand\n0,1,GLY2:A,2,LEU1:B\n"
        );
    }

    #[test]
    fn nearby_connectivity_uses_the_tighter_threshold() {
        let dir = tempdir().unwrap();
        let args = NearbyArgs {
            pair: pair_args(dir.path()),
            contact_type: None,
            threshold: None,
        };

        run_nearby_connectivity(&args, &globals()).unwrap();

        let csv = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(csv.contains("receptor,0,ALA1:A,0,1"));
        assert!(csv.contains("receptor,1,GLY2:A,0,0"));
    }

    #[test]
    fn nearby_threshold_flag_widens_the_cutoff() {
        let dir = tempdir().unwrap();
        let args = NearbyArgs {
            pair: pair_args(dir.path()),
            contact_type: None,
            threshold: Some(1.0),
        };

        run_nearby_connectivity(&args, &globals()).unwrap();

        let csv = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(csv.contains("receptor,1,GLY2:A,0,2"));
        assert!(csv.contains("ligand,3,VAL2:B,0,1"));
    }
}
