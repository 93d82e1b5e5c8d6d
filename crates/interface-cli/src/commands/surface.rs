use super::{GlobalOptions, load_structure, prepare, progress_reporter};
use crate::cli::{BuriedArgs, PairArgs, SasaArgs};
use crate::config::{CommandOverrides, build_config};
use crate::error::{CliError, Result};
use crate::output;
use openinterface::engine::config::SasaOptionsBuilder;
use openinterface::engine::context::AnalysisContext;
use openinterface::engine::labels::ElementLabel;
use openinterface::toolkit::provider::{FrameSelection, StructureProvider};
use openinterface::toolkit::selection::Selection;
use openinterface::workflows::surface;
use tracing::info;

pub fn run_sasa(args: &SasaArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = CommandOverrides {
        syntax: args.structure.syntax,
        target: args.target,
        ..CommandOverrides::default()
    };
    let config = build_config(globals.config, globals.set_values, &overrides)?;
    let system = load_structure(&args.structure)?;

    let frames = if args.frame_indices.is_empty() {
        FrameSelection::All
    } else {
        FrameSelection::Indices(args.frame_indices.clone())
    };
    let options = SasaOptionsBuilder::new()
        .selection(args.selection.clone())
        .syntax(config.syntax)
        .frames(frames)
        .target(config.sasa_target)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&config.toolkit, &reporter);
    let sasa = reporter.stage("SASA", || surface::sasa(&context, &system, &options))?;

    let selection = Selection::parse(&options.selection, options.syntax)?;
    let indices = config
        .toolkit
        .get_indices(&system, &selection, options.target)?;
    let labels: Vec<ElementLabel> = indices
        .iter()
        .zip(config.toolkit.labels(&system, options.target, &indices)?)
        .map(|(&index, label)| ElementLabel::new(index, label))
        .collect();
    let frame_numbers = options.frames.resolve(system.n_frames())?;
    info!(
        elements = labels.len(),
        frames = frame_numbers.len(),
        target = %options.target,
        "Writing SASA."
    );

    let mut writer = output::open_writer(args.structure.output.as_deref())?;
    output::write_sasa(&mut writer, &labels, &frame_numbers, &sasa)
}

pub fn run_buried_factors(args: &BuriedArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = CommandOverrides {
        target: args.target,
        ..CommandOverrides::default()
    };
    let prepared = prepare(&args.pair, overrides, globals)?;
    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&prepared.config.toolkit, &reporter);

    let factors = surface::buried_factors(
        &context,
        &prepared.system,
        &prepared.receptor,
        &prepared.ligand,
        prepared.config.buried_target,
    )?;

    let mut writer = output::open_writer(args.pair.structure.output.as_deref())?;
    output::write_sided_series(
        &mut writer,
        &[("receptor", &factors.receptor), ("ligand", &factors.ligand)],
    )
}

pub fn run_sasa_buried(args: &PairArgs, globals: &GlobalOptions) -> Result<()> {
    let prepared = prepare(args, CommandOverrides::default(), globals)?;
    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&prepared.config.toolkit, &reporter);

    let buried = surface::sasa_buried(
        &context,
        &prepared.system,
        &prepared.receptor,
        &prepared.ligand,
    )?;
    info!(frames = buried.len(), "Writing buried SASA.");

    let mut writer = output::open_writer(args.structure.output.as_deref())?;
    output::write_sasa_buried(&mut writer, &buried)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StructureArgs;
    use crate::commands::fixtures;
    use openinterface::toolkit::provider::Target;
    use openinterface::toolkit::selection::SelectionSyntax;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const FAST_SURFACE: &[String] = &[];

    fn structure(dir: &Path) -> StructureArgs {
        let input = fixtures::write(dir, "complex.bgf", &fixtures::complex_bgf(0.0));
        let apart = fixtures::write(dir, "apart.bgf", &fixtures::complex_bgf(100.0));
        StructureArgs {
            input,
            frames: vec![apart],
            syntax: Some(SelectionSyntax::Keyword),
            output: Some(dir.join("out.csv")),
        }
    }

    fn pair(dir: &Path) -> PairArgs {
        PairArgs {
            structure: structure(dir),
            receptor: "chain A".to_string(),
            ligand: "chain B".to_string(),
        }
    }

    fn rows(dir: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::Reader::from_path(dir.join("out.csv")).unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn sasa_writes_selected_atoms_of_requested_frames() {
        let dir = tempdir().unwrap();
        let set_values = vec!["surface.sphere-points=120".to_string()];
        let globals = GlobalOptions {
            config: None,
            set_values: &set_values,
            quiet: true,
        };
        let args = SasaArgs {
            structure: structure(dir.path()),
            selection: "chain B".to_string(),
            target: Some(Target::Atom),
            frame_indices: vec![1],
        };

        run_sasa(&args, &globals).unwrap();

        let header = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert!(header.starts_with("index,label,frame,sasa_a2\n"));
        let rows = rows(dir.path());
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0][0], "3");
        assert_eq!(rows[0][1], "LEU1:B@CA");
        assert!(rows.iter().all(|r| r[2] == "1"));
        assert!(rows.iter().all(|r| r[3].parse::<f64>().unwrap() > 0.0));
    }

    #[test]
    fn buried_factors_are_between_zero_and_one() {
        let dir = tempdir().unwrap();
        let globals = GlobalOptions {
            config: None,
            set_values: FAST_SURFACE,
            quiet: true,
        };
        let args = BuriedArgs {
            pair: pair(dir.path()),
            target: None,
        };

        run_buried_factors(&args, &globals).unwrap();

        let rows = rows(dir.path());
        assert_eq!(rows.len(), 2 * 2 + 2 * 2);
        for row in &rows {
            let value: f64 = row[4].parse().unwrap();
            assert!((0.0..=1.0).contains(&value));
            if row[3] == "1" {
                assert!(value.abs() < 1e-9);
            }
        }
        assert!(rows
            .iter()
            .any(|r| r[0] == "receptor" && r[2] == "GLY2:A" && r[3] == "0"
                && r[4].parse::<f64>().unwrap() > 0.0));
    }

    #[test]
    fn sasa_buried_is_positive_only_in_contact() {
        let dir = tempdir().unwrap();
        let globals = GlobalOptions {
            config: None,
            set_values: FAST_SURFACE,
            quiet: true,
        };

        run_sasa_buried(&pair(dir.path()), &globals).unwrap();

        let rows = rows(dir.path());
        assert_eq!(rows.len(), 2);
        assert!(rows[0][1].parse::<f64>().unwrap() > 0.0);
        assert!(rows[1][1].parse::<f64>().unwrap().abs() < 1e-6);
    }

    #[test]
    fn bad_selection_is_reported() {
        let dir = tempdir().unwrap();
        let globals = GlobalOptions {
            config: None,
            set_values: FAST_SURFACE,
            quiet: true,
        };
        let mut args = pair(dir.path());
        args.receptor = "(chain A".to_string();

        let result = run_sasa_buried(&args, &globals);
        assert!(matches!(result, Err(CliError::Toolkit(_))));
    }
}
