use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::error::{CliError, Result};
use openinterface::core::units::Length;
use openinterface::engine::config::{
    ContactMapConfigBuilder, ContactType, FineFilterFrame, InterfaceCriteriaBuilder,
};
use openinterface::toolkit::provider::Target;
use openinterface::toolkit::radii::RadiiTable;
use openinterface::toolkit::selection::SelectionSyntax;
use openinterface::toolkit::system::SystemToolkit;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Settings given as subcommand flags; they take precedence over the file and `--set`.
#[derive(Debug, Default, Clone)]
pub struct CommandOverrides {
    pub syntax: Option<SelectionSyntax>,
    pub contact_type: Option<ContactType>,
    pub threshold_nm: Option<f64>,
    pub target: Option<Target>,
    pub coarse_cutoff: Option<f64>,
    pub tolerance: Option<f64>,
    pub fine_filter_frame: Option<FineFilterFrame>,
    pub radii_file: Option<PathBuf>,
}

pub fn build_config(
    config_path: Option<&Path>,
    set_values: &[String],
    overrides: &CommandOverrides,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(path) = config_path {
        FileConfig::from_file(path)?
    } else {
        FileConfig::default()
    };
    let mut file_config = apply_set_values(file_config, set_values)?;

    let selection_file = file_config.selection.take().unwrap_or_default();
    let syntax = overrides
        .syntax
        .or(selection_file.syntax)
        .unwrap_or(defaults.syntax);

    let contacts_file = file_config.contacts.take().unwrap_or_default();
    let contact_map = ContactMapConfigBuilder::new()
        .contact_type(
            overrides
                .contact_type
                .or(contacts_file.contact_type)
                .unwrap_or(defaults.contact_type),
        )
        .threshold(Length::nanometers(
            overrides
                .threshold_nm
                .or(contacts_file.threshold)
                .unwrap_or(defaults.threshold_nm),
        ))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let surface_file = file_config.surface.take().unwrap_or_default();
    let probe_radius = surface_file.probe_radius.unwrap_or(defaults.probe_radius);
    if !probe_radius.is_finite() || probe_radius < 0.0 {
        return Err(CliError::Config(format!(
            "`surface.probe-radius` must be non-negative, got {}",
            probe_radius
        )));
    }
    let sphere_points = surface_file.sphere_points.unwrap_or(defaults.sphere_points);
    if sphere_points == 0 {
        return Err(CliError::Config(
            "`surface.sphere-points` must be at least 1".to_string(),
        ));
    }
    let sasa_target = overrides
        .target
        .or(surface_file.target)
        .unwrap_or(defaults.sasa_target);
    let buried_target = overrides
        .target
        .or(surface_file.buried_target)
        .unwrap_or(defaults.buried_target);

    let interface_file = file_config.interface.take().unwrap_or_default();
    let criteria = InterfaceCriteriaBuilder::new()
        .coarse_cutoff(Length::angstroms(
            overrides
                .coarse_cutoff
                .or(interface_file.coarse_cutoff)
                .unwrap_or(defaults.coarse_cutoff),
        ))
        .tolerance(Length::angstroms(
            overrides
                .tolerance
                .or(interface_file.tolerance)
                .unwrap_or(defaults.tolerance),
        ))
        .fine_filter_frame(
            overrides
                .fine_filter_frame
                .or(interface_file.fine_filter_frame)
                .unwrap_or(defaults.fine_filter_frame),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let radii_file = file_config.radii.take().unwrap_or_default();
    let mut radii = match overrides.radii_file.as_ref().or(radii_file.file.as_ref()) {
        Some(path) => RadiiTable::load(path)?,
        None => RadiiTable::new(),
    };
    for (element, radius) in &radii_file.vdw {
        radii.set(element, *radius)?;
    }

    debug!(
        %syntax,
        contact_type = %contact_map.contact_type,
        threshold = %contact_map.threshold,
        probe_radius,
        sphere_points,
        "Configuration resolved."
    );

    Ok(AppConfig {
        syntax,
        contact_map,
        sasa_target,
        buried_target,
        criteria,
        toolkit: SystemToolkit::new()
            .with_radii(radii)
            .with_surface(Length::angstroms(probe_radius), sphere_points),
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let (key, value_str) = (key.trim(), value_str.trim());

        match key {
            "selection.syntax" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .syntax = Some(parse_value(key, value_str, "syntax")?);
            }
            "contacts.contact-type" => {
                config
                    .contacts
                    .get_or_insert_with(Default::default)
                    .contact_type = Some(parse_value(key, value_str, "contact type")?);
            }
            "contacts.threshold" => {
                config
                    .contacts
                    .get_or_insert_with(Default::default)
                    .threshold = Some(parse_value(key, value_str, "float")?);
            }
            "surface.probe-radius" => {
                config
                    .surface
                    .get_or_insert_with(Default::default)
                    .probe_radius = Some(parse_value(key, value_str, "float")?);
            }
            "surface.sphere-points" => {
                config
                    .surface
                    .get_or_insert_with(Default::default)
                    .sphere_points = Some(parse_value(key, value_str, "integer")?);
            }
            "surface.target" => {
                config
                    .surface
                    .get_or_insert_with(Default::default)
                    .target = Some(parse_value(key, value_str, "target")?);
            }
            "surface.buried-target" => {
                config
                    .surface
                    .get_or_insert_with(Default::default)
                    .buried_target = Some(parse_value(key, value_str, "target")?);
            }
            "interface.coarse-cutoff" => {
                config
                    .interface
                    .get_or_insert_with(Default::default)
                    .coarse_cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "interface.tolerance" => {
                config
                    .interface
                    .get_or_insert_with(Default::default)
                    .tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "interface.fine-filter-frame" => {
                config
                    .interface
                    .get_or_insert_with(Default::default)
                    .fine_filter_frame = Some(parse_value(key, value_str, "frame mode")?);
            }
            "radii.file" => {
                config.radii.get_or_insert_with(Default::default).file =
                    Some(PathBuf::from(value_str));
            }
            _ => match key.strip_prefix("radii.vdw.") {
                Some(element) if !element.is_empty() => {
                    config
                        .radii
                        .get_or_insert_with(Default::default)
                        .vdw
                        .insert(element.to_string(), parse_value(key, value_str, "float")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            },
        }
    }
    Ok(config)
}
