//! # Workflows Module
//!
//! The public entry points of OpenInterface. Every workflow takes an
//! [`AnalysisContext`](crate::engine::context::AnalysisContext), a structure handle and the
//! receptor and ligand selections, and returns labelled per-frame results.
//!
//! - **Contacts** ([`contacts`]) - group contact maps (alpha-carbon, heavy-atom or all-atom)
//!   and the connectivity profiles derived from them.
//! - **Surface** ([`surface`]) - SASA, per-element buried factors and aggregate buried SASA.
//! - **Interface** ([`interface`]) - residues in van der Waals contact across the interface.
//!
//! Geometry and surface areas always come from the provider; the workflows only select,
//! combine and label.

pub mod contacts;
pub mod interface;
pub mod surface;

#[cfg(test)]
pub(crate) mod testing;
