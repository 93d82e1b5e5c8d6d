//! # Toolkit Module
//!
//! The structure-provider layer: everything the analysis workflows need from a molecular
//! structure, expressed as the [`provider::StructureProvider`] capability contract.
//!
//! - **Contract** ([`provider`]) - selection resolution, distances, contact maps, surface
//!   area, extraction, labels and radii, plus the granularity and frame-selection types.
//! - **Selection language** ([`selection`]) - expression trees and their two dialects.
//! - **Reference provider** ([`system`]) - [`system::SystemToolkit`] over `MolecularSystem`,
//!   backed by [`geometry`], the Shrake–Rupley integrator in [`surface`] and the radius
//!   table in [`radii`].

pub mod error;
pub mod geometry;
pub mod provider;
pub mod radii;
pub mod selection;
pub mod surface;
pub mod system;
