mod client;
mod error;
mod types;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use types::{DEFAULT_BRANCH, RepoInfo, ScanResult, StateProject, is_state_file, parse_repo_url};

use async_trait::async_trait;

use super::{SourceError, StateSource};

/// One state file inside a GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    client: GitHubClient,
    repo: RepoInfo,
    branch: String,
    path: String,
}

impl GitHubSource {
    pub fn new(client: GitHubClient, repo: RepoInfo, branch: String, path: String) -> Self {
        Self {
            client,
            repo,
            branch,
            path,
        }
    }

    pub fn from_url(
        url: &str,
        branch: String,
        path: String,
        token: Option<String>,
    ) -> Result<Self, GitHubError> {
        let repo = parse_repo_url(url)?;
        let client = GitHubClient::new(token)?;
        Ok(Self::new(client, repo, branch, path))
    }
}

#[async_trait]
impl StateSource for GitHubSource {
    fn name(&self) -> &str {
        "github"
    }

    fn location(&self) -> String {
        format!("github:{}@{}:{}", self.repo, self.branch, self.path)
    }

    async fn fetch(&self) -> Result<String, SourceError> {
        let text = self
            .client
            .fetch_file(&self.repo.owner, &self.repo.repo, &self.branch, &self.path)
            .await?;
        tracing::info!(
            repo = %self.repo,
            branch = %self.branch,
            path = %self.path,
            bytes = text.len(),
            "state fetched from GitHub"
        );
        Ok(text)
    }
}
