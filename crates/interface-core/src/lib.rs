//! # OpenInterface Core Library
//!
//! Geometric and biophysical descriptors of receptor–ligand complexes across one or more
//! frames: inter-residue contact maps, connectivity profiles, buried solvent-accessible
//! surface area, and van der Waals contact detection.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict layering so that the analysis logic never depends on how a
//! structure is stored or how its geometry is computed.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`), unit-tagged
//!   quantities (`Length`, `Area`), element tables and structure input.
//!
//! - **[`toolkit`]: The Structure Provider.** The `StructureProvider` capability contract
//!   (selection, distances, contact maps, surface area, extraction, labels, radii), the
//!   selection language, and `SystemToolkit`, the reference provider over `MolecularSystem`.
//!
//! - **[`engine`]: The Analysis Core.** Configuration, errors, labelled result containers,
//!   progress reporting and the `AnalysisContext` that binds one provider for a call site.
//!
//! - **[`workflows`]: The Public API.** Contact maps, connectivity, SASA, buried factors,
//!   aggregate buried SASA and the contacting-residue detector.

pub mod core;
pub mod engine;
pub mod toolkit;
pub mod workflows;
