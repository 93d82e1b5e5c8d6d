use super::error::ToolkitError;
use super::selection::Selection;
use crate::core::units::{AreaUnit, Length, LengthUnit};
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity at which elements of a structure are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Atom,
    #[default]
    Group,
    Chain,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Atom => write!(f, "atom"),
            Target::Group => write!(f, "group"),
            Target::Chain => write!(f, "chain"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTargetError(String);

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown target '{}' (expected atom, group or chain)", self.0)
    }
}

impl std::error::Error for ParseTargetError {}

impl FromStr for Target {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atom" => Ok(Target::Atom),
            "group" | "residue" => Ok(Target::Group),
            "chain" => Ok(Target::Chain),
            _ => Err(ParseTargetError(s.to_string())),
        }
    }
}

/// Which frames a per-frame computation covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrameSelection {
    #[default]
    All,
    Indices(Vec<usize>),
}

impl FrameSelection {
    /// Resolves this selection against a structure holding `n_frames` frames.
    pub fn resolve(&self, n_frames: usize) -> Result<Vec<usize>, ToolkitError> {
        match self {
            FrameSelection::All => Ok((0..n_frames).collect()),
            FrameSelection::Indices(frames) => {
                if let Some(&frame) = frames.iter().find(|&&f| f >= n_frames) {
                    return Err(ToolkitError::FrameOutOfRange { frame, n_frames });
                }
                Ok(frames.clone())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RadiusType {
    VanDerWaals,
}

/// Pairwise distances indexed `[frame, first-set atom, second-set atom]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTensor {
    pub values: Array3<f64>,
    pub unit: LengthUnit,
}

impl DistanceTensor {
    pub fn get(&self, frame: usize, i: usize, j: usize) -> Length {
        Length::new(self.values[[frame, i, j]], self.unit)
    }
}

/// Solvent-accessible surface areas indexed `[frame, element]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SasaArray {
    pub values: Array2<f64>,
    pub unit: AreaUnit,
}

impl SasaArray {
    pub fn n_frames(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_elements(&self) -> usize {
        self.values.ncols()
    }

    /// Re-expresses every value in `unit`.
    pub fn to(&self, unit: AreaUnit) -> SasaArray {
        let factor = crate::core::units::Area::new(1.0, self.unit).value_in(unit);
        SasaArray {
            values: &self.values * factor,
            unit,
        }
    }
}

/// The structure capabilities the analysis layer is built on.
///
/// Element indices are positions in the handle's ordered atom, group or chain lists. All
/// index lists returned by a provider are ascending.
pub trait StructureProvider {
    type Handle;

    /// Indices of the elements of granularity `target` covered by `selection`.
    fn get_indices(
        &self,
        item: &Self::Handle,
        selection: &Selection,
        target: Target,
    ) -> Result<Vec<usize>, ToolkitError>;

    /// The owning group of every atom in `atoms`, in the same order.
    fn atom_group_indices(
        &self,
        item: &Self::Handle,
        atoms: &[usize],
    ) -> Result<Vec<usize>, ToolkitError>;

    fn n_frames(&self, item: &Self::Handle) -> Result<usize, ToolkitError>;

    /// Boolean contacts `[frame, i, j]` between atom sets at or below `threshold`.
    fn contact_map(
        &self,
        item: &Self::Handle,
        atoms_1: &[usize],
        atoms_2: &[usize],
        threshold: Length,
    ) -> Result<Array3<bool>, ToolkitError>;

    fn distance(
        &self,
        item: &Self::Handle,
        atoms_1: &[usize],
        atoms_2: &[usize],
    ) -> Result<DistanceTensor, ToolkitError>;

    /// Per-frame SASA of the elements of granularity `target` covered by `selection`.
    fn sasa(
        &self,
        item: &Self::Handle,
        selection: &Selection,
        frames: &FrameSelection,
        target: Target,
    ) -> Result<SasaArray, ToolkitError>;

    /// An independent structure holding only the atoms covered by `selection`.
    fn extract(
        &self,
        item: &Self::Handle,
        selection: &Selection,
    ) -> Result<Self::Handle, ToolkitError>;

    fn labels(
        &self,
        item: &Self::Handle,
        target: Target,
        indices: &[usize],
    ) -> Result<Vec<String>, ToolkitError>;

    fn radii(
        &self,
        item: &Self::Handle,
        atoms: &[usize],
        radius_type: RadiusType,
    ) -> Result<Vec<Length>, ToolkitError>;
}
