//! # Core Module
//!
//! Fundamental building blocks shared by the provider and the analysis layers.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains and multi-frame systems
//! - **Physical Quantities** ([`units`]) - Unit-tagged lengths and areas
//! - **File I/O** ([`io`]) - Reading molecular structure files
//! - **Utilities** ([`utils`]) - Element inference and atomic radius tables

pub mod io;
pub mod models;
pub mod units;
pub mod utils;
