use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use super::{SourceError, StateSource};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StateSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Read {
                location: self.location(),
                source,
            })?;
        tracing::info!(path = %self.path.display(), bytes = text.len(), "state file read");
        Ok(text)
    }
}

/// Reads the whole of standard input, the CLI equivalent of a raw JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

#[async_trait]
impl StateSource for StdinSource {
    fn name(&self) -> &str {
        "stdin"
    }

    fn location(&self) -> String {
        "-".to_string()
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .map_err(|source| SourceError::Read {
                location: "stdin".to_string(),
                source,
            })?;
        tracing::info!(bytes = text.len(), "state read from stdin");
        Ok(text)
    }
}
