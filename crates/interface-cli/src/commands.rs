pub mod contacts;
pub mod interface;
pub mod surface;

use crate::cli::{PairArgs, StructureArgs};
use crate::config::{AppConfig, CommandOverrides, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use openinterface::core::io::bgf::BgfFile;
use openinterface::core::io::traits::MolecularFile;
use openinterface::core::models::system::MolecularSystem;
use openinterface::engine::progress::ProgressReporter;
use openinterface::toolkit::selection::{Selection, SelectionSyntax};
use std::path::Path;
use tracing::info;

/// Options shared by every subcommand.
pub struct GlobalOptions<'a> {
    pub config: Option<&'a Path>,
    pub set_values: &'a [String],
    pub quiet: bool,
}

/// Reads the input structure and appends every `--frame` file as an extra frame.
pub fn load_structure(args: &StructureArgs) -> Result<MolecularSystem> {
    info!("Loading input structure from {:?}", &args.input);
    let mut system =
        BgfFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e,
        })?;

    for path in &args.frames {
        let frame = BgfFile::read_from_path(path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e,
        })?;
        system
            .append_frames_from(&frame)
            .map_err(|e| CliError::Frame {
                path: path.clone(),
                source: e,
            })?;
    }

    info!(
        atoms = system.n_atoms(),
        groups = system.n_residues(),
        chains = system.n_chains(),
        frames = system.n_frames(),
        "Structure loaded."
    );
    Ok(system)
}

pub fn parse_pair(args: &PairArgs, syntax: SelectionSyntax) -> Result<(Selection, Selection)> {
    let receptor = Selection::parse(&args.receptor, syntax)?;
    let ligand = Selection::parse(&args.ligand, syntax)?;
    Ok((receptor, ligand))
}

pub fn progress_reporter(quiet: bool) -> ProgressReporter<'static> {
    let handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    ProgressReporter::with_callback(handler.get_callback())
}

/// Configuration, structure and parsed selections of a receptor/ligand command.
pub struct Prepared {
    pub config: AppConfig,
    pub system: MolecularSystem,
    pub receptor: Selection,
    pub ligand: Selection,
}

pub fn prepare(
    pair: &PairArgs,
    overrides: CommandOverrides,
    globals: &GlobalOptions,
) -> Result<Prepared> {
    let overrides = CommandOverrides {
        syntax: pair.structure.syntax,
        ..overrides
    };
    let config = build_config(globals.config, globals.set_values, &overrides)?;
    let system = load_structure(&pair.structure)?;
    let (receptor, ligand) = parse_pair(pair, config.syntax)?;
    Ok(Prepared {
        config,
        system,
        receptor,
        ligand,
    })
}
