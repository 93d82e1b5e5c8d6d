use super::error::ToolkitError;
use crate::core::units::Length;
use crate::core::utils::identifiers::normalize_element;
use crate::core::utils::radii::vdw_radius_angstrom;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RadiiFile {
    #[serde(default)]
    vdw: HashMap<String, f64>,
}

/// Van der Waals radii by element: the Bondi table plus user overrides.
///
/// Override files are TOML with a single `[vdw]` table mapping element symbols to radii in
/// Angstroms, e.g. `Zn = 1.39`.
#[derive(Debug, Clone, Default)]
pub struct RadiiTable {
    overrides: HashMap<String, f64>,
}

impl RadiiTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ToolkitError> {
        let content = std::fs::read_to_string(path).map_err(|e| ToolkitError::RadiiIo {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: RadiiFile = toml::from_str(&content).map_err(|e| ToolkitError::RadiiParse {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut table = Self::new();
        for (element, radius) in file.vdw {
            table.set(&element, radius)?;
        }
        debug!(
            path = %path.display(),
            overrides = table.overrides.len(),
            "Loaded van der Waals radius overrides."
        );
        Ok(table)
    }

    /// Overrides the radius of `element`, in Angstroms.
    pub fn set(&mut self, element: &str, radius_angstrom: f64) -> Result<(), ToolkitError> {
        if !radius_angstrom.is_finite() || radius_angstrom <= 0.0 {
            return Err(ToolkitError::InvalidRadius {
                element: element.to_string(),
                value: radius_angstrom,
            });
        }
        self.overrides
            .insert(normalize_element(element), radius_angstrom);
        Ok(())
    }

    pub fn vdw_radius(&self, element: &str) -> Result<Length, ToolkitError> {
        let symbol = normalize_element(element);
        self.overrides
            .get(&symbol)
            .copied()
            .or_else(|| vdw_radius_angstrom(&symbol))
            .map(Length::angstroms)
            .ok_or(ToolkitError::UnknownElement(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::LengthUnit;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_table_uses_bondi_radii() {
        let table = RadiiTable::new();
        assert_eq!(table.vdw_radius("C").unwrap(), Length::angstroms(1.70));
        assert_eq!(table.vdw_radius("cl").unwrap(), Length::angstroms(1.75));
        assert!(matches!(
            table.vdw_radius("X"),
            Err(ToolkitError::UnknownElement(symbol)) if symbol == "X"
        ));
    }

    #[test]
    fn load_applies_overrides_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[vdw]\nC = 1.9\nZN = 1.2\nXx = 2.0").unwrap();

        let table = RadiiTable::load(file.path()).unwrap();
        let carbon = table.vdw_radius("C").unwrap();
        assert_eq!(carbon.unit(), LengthUnit::Angstrom);
        assert!((carbon.value() - 1.9).abs() < 1e-12);
        assert_eq!(table.vdw_radius("Zn").unwrap(), Length::angstroms(1.2));
        assert_eq!(table.vdw_radius("XX").unwrap(), Length::angstroms(2.0));
        assert_eq!(table.vdw_radius("N").unwrap(), Length::angstroms(1.55));
    }

    #[test]
    fn load_rejects_unknown_sections_and_bad_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[covalent]\nC = 0.7").unwrap();
        assert!(matches!(
            RadiiTable::load(file.path()),
            Err(ToolkitError::RadiiParse { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[vdw]\nC = -1.0").unwrap();
        assert!(matches!(
            RadiiTable::load(file.path()),
            Err(ToolkitError::InvalidRadius { .. })
        ));
    }

    #[test]
    fn load_reports_missing_files() {
        let result = RadiiTable::load(Path::new("/nonexistent/radii.toml"));
        assert!(matches!(result, Err(ToolkitError::RadiiIo { .. })));
    }
}
