use crate::core::units::Length;
use crate::toolkit::provider::{FrameSelection, Target};
use crate::toolkit::selection::SelectionSyntax;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CONTACT_THRESHOLD: Length = Length::nanometers(1.2);
pub const DEFAULT_NEARBY_THRESHOLD: Length = Length::nanometers(0.6);
pub const DEFAULT_COARSE_CUTOFF: Length = Length::angstroms(4.1);
pub const DEFAULT_VDW_TOLERANCE: Length = Length::angstroms(0.5);

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Parameter '{name}' is invalid: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which atoms of a group stand in for it when contacts are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactType {
    /// The group's alpha-carbon (atom named `CA`).
    #[default]
    CAlpha,
    /// Every non-hydrogen atom of the group.
    HeavyAtoms,
    /// Every atom of the group.
    AllAtoms,
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactType::CAlpha => write!(f, "c-alpha"),
            ContactType::HeavyAtoms => write!(f, "heavy-atoms"),
            ContactType::AllAtoms => write!(f, "all-atoms"),
        }
    }
}

impl FromStr for ContactType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "ca" | "calpha" | "c-alpha" => Ok(ContactType::CAlpha),
            "heavy" | "heavy-atoms" => Ok(ContactType::HeavyAtoms),
            "all" | "all-atoms" => Ok(ContactType::AllAtoms),
            _ => Err(ConfigError::InvalidParameter {
                name: "contact_type",
                reason: format!("unknown contact type '{}'", s),
            }),
        }
    }
}

/// Parameters of the contact-map builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactMapConfig {
    pub contact_type: ContactType,
    pub threshold: Length,
}

impl Default for ContactMapConfig {
    fn default() -> Self {
        Self {
            contact_type: ContactType::default(),
            threshold: DEFAULT_CONTACT_THRESHOLD,
        }
    }
}

impl ContactMapConfig {
    /// The tighter configuration used by nearby connectivity.
    pub fn nearby() -> Self {
        Self {
            threshold: DEFAULT_NEARBY_THRESHOLD,
            ..Self::default()
        }
    }
}

#[derive(Default)]
pub struct ContactMapConfigBuilder {
    contact_type: Option<ContactType>,
    threshold: Option<Length>,
}

impl ContactMapConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_type(mut self, contact_type: ContactType) -> Self {
        self.contact_type = Some(contact_type);
        self
    }
    pub fn threshold(mut self, threshold: Length) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Builds the configuration, falling back to `base` for unset fields.
    pub fn build_from(self, base: ContactMapConfig) -> Result<ContactMapConfig, ConfigError> {
        let threshold = self.threshold.unwrap_or(base.threshold);
        require_positive("threshold", threshold)?;
        Ok(ContactMapConfig {
            contact_type: self.contact_type.unwrap_or(base.contact_type),
            threshold,
        })
    }

    pub fn build(self) -> Result<ContactMapConfig, ConfigError> {
        self.build_from(ContactMapConfig::default())
    }
}

/// Options of the SASA accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct SasaOptions {
    pub selection: String,
    pub syntax: SelectionSyntax,
    pub frames: FrameSelection,
    pub target: Target,
}

impl Default for SasaOptions {
    fn default() -> Self {
        Self {
            selection: "all".to_string(),
            syntax: SelectionSyntax::default(),
            frames: FrameSelection::All,
            target: Target::Group,
        }
    }
}

#[derive(Default)]
pub struct SasaOptionsBuilder {
    selection: Option<String>,
    syntax: Option<SelectionSyntax>,
    frames: Option<FrameSelection>,
    target: Option<Target>,
}

impl SasaOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }
    pub fn syntax(mut self, syntax: SelectionSyntax) -> Self {
        self.syntax = Some(syntax);
        self
    }
    pub fn frames(mut self, frames: FrameSelection) -> Self {
        self.frames = Some(frames);
        self
    }
    pub fn target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn build(self) -> Result<SasaOptions, ConfigError> {
        let defaults = SasaOptions::default();
        let selection = self.selection.unwrap_or(defaults.selection);
        if selection.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "selection",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(SasaOptions {
            selection,
            syntax: self.syntax.unwrap_or(defaults.syntax),
            frames: self.frames.unwrap_or(defaults.frames),
            target: self.target.unwrap_or(defaults.target),
        })
    }
}

/// Frame at which the van der Waals check of the contact detector reads distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FineFilterFrame {
    /// Always read frame 0, whichever frame produced the candidate pair.
    #[default]
    First,
    /// Read the frame in which the candidate pair passed the coarse cutoff.
    Candidate,
}

impl fmt::Display for FineFilterFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FineFilterFrame::First => write!(f, "first"),
            FineFilterFrame::Candidate => write!(f, "candidate"),
        }
    }
}

impl FromStr for FineFilterFrame {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(FineFilterFrame::First),
            "candidate" => Ok(FineFilterFrame::Candidate),
            _ => Err(ConfigError::InvalidParameter {
                name: "fine_filter_frame",
                reason: format!("unknown frame mode '{}'", s),
            }),
        }
    }
}

/// Distance criteria of the contacting-residue detector.
///
/// A receptor/ligand atom pair is a candidate when its distance is strictly below
/// `coarse_cutoff`, and is accepted when that distance is strictly below the sum of both van
/// der Waals radii plus `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterfaceCriteria {
    pub coarse_cutoff: Length,
    pub tolerance: Length,
    pub fine_filter_frame: FineFilterFrame,
}

impl Default for InterfaceCriteria {
    fn default() -> Self {
        Self {
            coarse_cutoff: DEFAULT_COARSE_CUTOFF,
            tolerance: DEFAULT_VDW_TOLERANCE,
            fine_filter_frame: FineFilterFrame::default(),
        }
    }
}

#[derive(Default)]
pub struct InterfaceCriteriaBuilder {
    coarse_cutoff: Option<Length>,
    tolerance: Option<Length>,
    fine_filter_frame: Option<FineFilterFrame>,
}

impl InterfaceCriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coarse_cutoff(mut self, cutoff: Length) -> Self {
        self.coarse_cutoff = Some(cutoff);
        self
    }
    pub fn tolerance(mut self, tolerance: Length) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn fine_filter_frame(mut self, frame: FineFilterFrame) -> Self {
        self.fine_filter_frame = Some(frame);
        self
    }

    pub fn build(self) -> Result<InterfaceCriteria, ConfigError> {
        let defaults = InterfaceCriteria::default();
        let coarse_cutoff = self.coarse_cutoff.unwrap_or(defaults.coarse_cutoff);
        let tolerance = self.tolerance.unwrap_or(defaults.tolerance);
        require_positive("coarse_cutoff", coarse_cutoff)?;
        if !tolerance.value().is_finite() || tolerance.value() < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "tolerance",
                reason: format!("must be non-negative, got {}", tolerance),
            });
        }
        Ok(InterfaceCriteria {
            coarse_cutoff,
            tolerance,
            fine_filter_frame: self.fine_filter_frame.unwrap_or(defaults.fine_filter_frame),
        })
    }
}

fn require_positive(name: &'static str, length: Length) -> Result<(), ConfigError> {
    if length.value().is_finite() && length.value() > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("must be positive, got {}", length),
        })
    }
}
