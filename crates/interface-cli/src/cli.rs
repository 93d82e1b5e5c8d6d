use clap::{Args, Parser, Subcommand};
use openinterface::engine::config::{ContactType, FineFilterFrame};
use openinterface::toolkit::provider::Target;
use openinterface::toolkit::selection::SelectionSyntax;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "OpenInterface Developers",
    version,
    about = "OpenInterface CLI - contact maps, connectivity, buried surface area and contacting residues of receptor-ligand complexes.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S contacts.threshold=0.8
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the group contact map between receptor and ligand for every frame.
    ContactMap(ContactArgs),
    /// Count the contacts of every receptor and ligand group for every frame.
    Connectivity(ContactArgs),
    /// Connectivity at the tighter nearby threshold (0.6 nm unless `-t` is given).
    NearbyConnectivity(NearbyArgs),
    /// Solvent-accessible surface area of a selection, per frame.
    Sasa(SasaArgs),
    /// Fraction of each receptor and ligand element's surface buried by the partner.
    BuriedFactors(BuriedArgs),
    /// Total surface area buried at the interface, per frame.
    SasaBuried(PairArgs),
    /// Receptor and ligand residues in van der Waals contact.
    ContactingResidues(InterfaceArgs),
}

/// The structure to analyse and where results go.
#[derive(Args, Debug, Clone)]
pub struct StructureArgs {
    /// Path to the input structure (BGF).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Additional BGF files with the same atoms, appended as frames in order.
    #[arg(long = "frame", value_name = "PATH")]
    pub frames: Vec<PathBuf>,

    /// Selection dialect of every selection argument.
    #[arg(long, value_name = "comparison|keyword")]
    pub syntax: Option<SelectionSyntax>,

    /// Write CSV output to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// A structure with receptor and ligand selections.
#[derive(Args, Debug, Clone)]
pub struct PairArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Selection of the receptor atoms.
    #[arg(short, long, required = true, value_name = "SELECTION")]
    pub receptor: String,

    /// Selection of the ligand atoms.
    #[arg(short, long, required = true, value_name = "SELECTION")]
    pub ligand: String,
}

#[derive(Args, Debug, Clone)]
pub struct ContactArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Atoms standing in for each group: c-alpha, heavy-atoms or all-atoms.
    #[arg(long, value_name = "TYPE")]
    pub contact_type: Option<ContactType>,

    /// Contact distance threshold in nanometers.
    #[arg(short, long, value_name = "NM")]
    pub threshold: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct NearbyArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Atoms standing in for each group: c-alpha, heavy-atoms or all-atoms.
    #[arg(long, value_name = "TYPE")]
    pub contact_type: Option<ContactType>,

    /// Nearby distance threshold in nanometers (default 0.6).
    #[arg(short, long, value_name = "NM")]
    pub threshold: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct SasaArgs {
    #[command(flatten)]
    pub structure: StructureArgs,

    /// Selection of the atoms whose area is reported.
    #[arg(short, long, default_value = "all", value_name = "SELECTION")]
    pub selection: String,

    /// Granularity of the reported areas: atom, group or chain.
    #[arg(long, value_name = "TARGET")]
    pub target: Option<Target>,

    /// Restrict the output to these frame indices (0-based). Can be used multiple times.
    #[arg(long = "frame-index", value_name = "INDEX")]
    pub frame_indices: Vec<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct BuriedArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Granularity of the buried factors: atom, group or chain.
    #[arg(long, value_name = "TARGET")]
    pub target: Option<Target>,
}

#[derive(Args, Debug, Clone)]
pub struct InterfaceArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Distance below which atom pairs become candidates, in Angstroms.
    #[arg(long, value_name = "ANGSTROM")]
    pub coarse_cutoff: Option<f64>,

    /// Slack added to the sum of van der Waals radii, in Angstroms.
    #[arg(long, value_name = "ANGSTROM")]
    pub tolerance: Option<f64>,

    /// Frame read by the van der Waals check: first or candidate.
    #[arg(long, value_name = "MODE")]
    pub fine_filter_frame: Option<FineFilterFrame>,

    /// TOML file overriding van der Waals radii (`[vdw]` table, Angstroms).
    #[arg(long, value_name = "PATH")]
    pub radii: Option<PathBuf>,
}
