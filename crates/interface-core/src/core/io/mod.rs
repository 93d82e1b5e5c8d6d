//! Reading molecular structure files into [`MolecularSystem`](crate::core::models::system::MolecularSystem).
//!
//! Structure input serves the reference toolkit and the command-line front end; the analysis
//! layer itself never reads files.

pub mod bgf;
pub mod traits;
