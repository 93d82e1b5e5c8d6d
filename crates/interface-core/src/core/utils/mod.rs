//! Element inference and per-element physical constants.

pub mod identifiers;
pub mod radii;
