//! # Core Models Module
//!
//! Data structures describing a molecular system across simulation frames.
//!
//! Topology (atoms, residues, chains) is stored once in file order; coordinates are stored
//! per frame, indexed by atom position. Every structural element is addressed by its
//! zero-based position in the system, which is the index space used by selections and by
//! every array returned from the analysis layer.
//!
//! - [`atom`] - Atom identity and physicochemical labels
//! - [`residue`] - Residues (groups) and their member atoms
//! - [`chain`] - Chains and their classification
//! - [`system`] - The multi-frame molecular system and sub-system extraction
//! - [`builder`] - Incremental construction used by file readers
//!
//! ```ignore
//! use openinterface::core::models::builder::MolecularSystemBuilder;
//!
//! let mut builder = MolecularSystemBuilder::new();
//! builder.start_chain('A', ChainType::Polymer);
//! builder.start_residue(1, "ALA")?;
//! builder.add_atom(1, "CA", Point3::new(0.0, 0.0, 0.0), 0.0, "C_3")?;
//! let system = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod residue;
pub mod system;
