use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};

use super::GitHubError;
use super::types::{DEFAULT_BRANCH, FALLBACK_BRANCH, GitTreeResponse, ScanResult};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_RAW_BASE: &str = "https://raw.githubusercontent.com";
const CLIENT_USER_AGENT: &str = "infragraph";

#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    api_base: String,
    raw_base: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self, GitHubError> {
        Self::with_base_urls(
            token,
            GITHUB_API_BASE.to_string(),
            GITHUB_RAW_BASE.to_string(),
        )
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_urls(
        token: Option<String>,
        api_base: String,
        raw_base: String,
    ) -> Result<Self, GitHubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        if let Some(token) = &token {
            let auth_value = format!("Bearer {}", token);
            let header_value =
                HeaderValue::from_str(&auth_value).map_err(|_| GitHubError::InvalidToken)?;
            headers.insert(AUTHORIZATION, header_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(GitHubError::Network)?;

        Ok(Self {
            client,
            token,
            api_base: api_base.trim_end_matches('/').to_string(),
            raw_base: raw_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn raw_base(&self) -> &str {
        &self.raw_base
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Lists state files in the repository. A missing `main` branch is
    /// retried once as `master`.
    pub async fn scan_repo(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ScanResult, GitHubError> {
        match self.fetch_tree(owner, repo, branch).await {
            Err(GitHubError::RepoNotFound { .. }) if branch == DEFAULT_BRANCH => {
                tracing::info!(
                    repo = %format!("{}/{}", owner, repo),
                    "branch {} not found, retrying {}",
                    DEFAULT_BRANCH,
                    FALLBACK_BRANCH
                );
                let tree = self.fetch_tree(owner, repo, FALLBACK_BRANCH).await?;
                Ok(ScanResult::from_tree(FALLBACK_BRANCH, tree))
            }
            result => Ok(ScanResult::from_tree(branch, result?)),
        }
    }

    async fn fetch_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<GitTreeResponse, GitHubError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, owner, repo, branch
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(GitHubError::RepoNotFound {
                repo: format!("{}/{}", owner, repo),
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| GitHubError::Api {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })?;

        if !status.is_success() {
            let error_msg = body
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error")
                .to_string();

            return Err(GitHubError::Api {
                status: status.as_u16(),
                message: error_msg,
            });
        }

        let tree: GitTreeResponse =
            serde_json::from_value(body).map_err(|e| GitHubError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse tree: {}", e),
            })?;

        if tree.truncated {
            tracing::warn!(sha = %tree.sha, "git tree truncated; some state files may be missing");
        }
        tracing::debug!(sha = %tree.sha, entries = tree.tree.len(), "git tree fetched");

        Ok(tree)
    }

    /// Fetches raw file contents from the raw content host.
    pub async fn fetch_file(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> Result<String, GitHubError> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            self.raw_base,
            owner,
            repo,
            branch,
            path.trim_start_matches('/')
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(GitHubError::FetchFailed {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(GitHubClient::new(None).is_ok());
        assert!(GitHubClient::new(Some("ghp_test".to_string())).is_ok());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let result = GitHubClient::new(Some("bad\ntoken".to_string()));
        assert!(matches!(result, Err(GitHubError::InvalidToken)));
    }

    #[test]
    fn test_debug_does_not_expose_token() {
        let client = GitHubClient::new(Some("ghp_super_secret_12345".to_string())).unwrap();
        let debug_output = format!("{:?}", client);

        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("ghp_super_secret_12345"),
            "Debug output must NOT contain the actual token"
        );
    }

    #[test]
    fn test_default_base_urls() {
        let client = GitHubClient::new(None).unwrap();
        assert_eq!(client.api_base(), "https://api.github.com");
        assert_eq!(client.raw_base(), "https://raw.githubusercontent.com");
        assert!(!client.is_authenticated());
    }

    #[test]
    fn test_base_urls_trailing_slash_trimmed() {
        let client = GitHubClient::with_base_urls(
            None,
            "http://localhost:1234/".to_string(),
            "http://localhost:5678/".to_string(),
        )
        .unwrap();
        assert_eq!(client.api_base(), "http://localhost:1234");
        assert_eq!(client.raw_base(), "http://localhost:5678");
    }
}
