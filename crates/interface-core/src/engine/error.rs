use super::config::ConfigError;
use crate::toolkit::error::ToolkitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Toolkit(#[from] ToolkitError),

    #[error("Shape mismatch in {context}: expected {expected}, found {found}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
