//! # Engine Module
//!
//! Shared machinery of the analysis workflows: everything a workflow needs besides the
//! structure provider itself.
//!
//! - **Configuration** ([`config`]) - contact-map thresholds and contact types, SASA options,
//!   and the distance criteria of the contact detector, each with defaults and a builder.
//! - **Results** ([`labels`]) - element labels and [`labels::LabeledSeries`], which keeps
//!   per-frame values and their labels aligned.
//! - **Context** ([`context`]) - [`context::AnalysisContext`], the provider and reporter
//!   bound once per call site.
//! - **Progress Monitoring** ([`progress`]) - callback-based progress events.
//! - **Error Handling** ([`error`]) - [`error::EngineError`].

pub mod config;
pub mod context;
pub mod error;
pub mod labels;
pub mod progress;
