use crate::core::models::system::ModelError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolkitError {
    #[error("Invalid selection '{text}' at position {position}: {message}")]
    SelectionParse {
        text: String,
        position: usize,
        message: String,
    },

    #[error("{kind} index {index} is out of range (count: {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Frame {frame} is out of range (system has {n_frames} frames)")]
    FrameOutOfRange { frame: usize, n_frames: usize },

    #[error("No van der Waals radius is known for element '{0}'")]
    UnknownElement(String),

    #[error("Invalid radius for element '{element}': {value} (must be positive and finite)")]
    InvalidRadius { element: String, value: f64 },

    #[error("Structure error: {0}")]
    Model(#[from] ModelError),

    #[error("Failed to read radii file '{path}': {source}")]
    RadiiIo {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse radii file '{path}': {source}")]
    RadiiParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Internal toolkit error: {0}")]
    Internal(String),
}
