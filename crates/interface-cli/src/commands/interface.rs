use super::{GlobalOptions, prepare, progress_reporter};
use crate::cli::InterfaceArgs;
use crate::config::CommandOverrides;
use crate::error::Result;
use crate::output;
use openinterface::engine::context::AnalysisContext;
use openinterface::workflows::interface;
use tracing::info;

pub fn run_contacting_residues(args: &InterfaceArgs, globals: &GlobalOptions) -> Result<()> {
    let overrides = CommandOverrides {
        coarse_cutoff: args.coarse_cutoff,
        tolerance: args.tolerance,
        fine_filter_frame: args.fine_filter_frame,
        radii_file: args.radii.clone(),
        ..CommandOverrides::default()
    };
    let prepared = prepare(&args.pair, overrides, globals)?;
    let reporter = progress_reporter(globals.quiet);
    let context = AnalysisContext::new(&prepared.config.toolkit, &reporter);

    let residues = interface::contacting_residues(
        &context,
        &prepared.system,
        &prepared.receptor,
        &prepared.ligand,
        &prepared.config.criteria,
    )?;
    info!(
        receptor = residues.receptor.len(),
        ligand = residues.ligand.len(),
        "Writing contacting residues."
    );

    let mut writer = output::open_writer(args.pair.structure.output.as_deref())?;
    output::write_contacting_residues(&mut writer, &residues)
}
