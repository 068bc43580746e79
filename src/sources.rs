pub mod github;
pub mod local;

use async_trait::async_trait;
use thiserror::Error;

pub use github::GitHubSource;
pub use local::{FileSource, StdinSource};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unknown source: {0}")]
    UnknownSource(String),
    #[error("cannot read {location}: {source}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("github error: {0}")]
    GitHub(String),
}

/// Somewhere raw state text can be read from: a file, stdin, or a repository.
#[async_trait]
pub trait StateSource: Send + Sync {
    fn name(&self) -> &str;
    fn location(&self) -> String;
    async fn fetch(&self) -> Result<String, SourceError>;
}

/// Resolves a local location: `-` is stdin, `file://` or a bare path is a file.
pub fn get_source(location: &str) -> Result<Box<dyn StateSource>, SourceError> {
    if location == "-" {
        return Ok(Box::new(StdinSource));
    }
    if let Some(path) = location.strip_prefix("file://") {
        return Ok(Box::new(FileSource::new(path)));
    }
    if let Some((scheme, _)) = location.split_once("://") {
        return Err(SourceError::UnknownSource(scheme.to_string()));
    }
    Ok(Box::new(FileSource::new(location)))
}
