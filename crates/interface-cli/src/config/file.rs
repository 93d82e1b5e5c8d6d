use crate::error::{CliError, Result};
use openinterface::engine::config::{ContactType, FineFilterFrame};
use openinterface::toolkit::provider::Target;
use openinterface::toolkit::selection::SelectionSyntax;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSelectionConfig {
    pub syntax: Option<SelectionSyntax>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileContactsConfig {
    pub contact_type: Option<ContactType>,
    /// Nanometers.
    pub threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSurfaceConfig {
    /// Angstroms.
    pub probe_radius: Option<f64>,
    pub sphere_points: Option<usize>,
    pub target: Option<Target>,
    pub buried_target: Option<Target>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileInterfaceConfig {
    /// Angstroms.
    pub coarse_cutoff: Option<f64>,
    /// Angstroms.
    pub tolerance: Option<f64>,
    pub fine_filter_frame: Option<FineFilterFrame>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRadiiConfig {
    /// A radius override file with a `[vdw]` table.
    pub file: Option<PathBuf>,
    /// Inline overrides, element symbol to Angstroms; applied after `file`.
    #[serde(default)]
    pub vdw: HashMap<String, f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub selection: Option<FileSelectionConfig>,
    pub contacts: Option<FileContactsConfig>,
    pub surface: Option<FileSurfaceConfig>,
    pub interface: Option<FileInterfaceConfig>,
    pub radii: Option<FileRadiiConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }
}
