pub mod state;

use thiserror::Error;

pub use state::{Extraction, SENSITIVE_ATTR_PATTERNS, extract_resources, parse_state};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid state document: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("invalid state document: expected a JSON object at the top level")]
    NotAnObject,
}
