use openinterface::core::io::bgf::BgfError;
use openinterface::core::models::system::ModelError;
use openinterface::engine::error::EngineError;
use openinterface::toolkit::error::ToolkitError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Toolkit(#[from] ToolkitError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: BgfError,
    },

    #[error("Frame file '{path}' does not match the input topology: {source}", path = path.display())]
    Frame {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
