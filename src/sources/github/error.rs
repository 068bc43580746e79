use thiserror::Error;

/// GitHub-specific errors from repository scanning and file fetches.
///
/// SECURITY: Error messages must NEVER contain the access token.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// URL is not of the form `https://github.com/<owner>/<repo>`
    #[error("invalid GitHub URL '{url}'. Expected format: https://github.com/owner/repo")]
    InvalidUrl { url: String },

    /// Token contains characters that cannot go in a header
    #[error("invalid token format")]
    InvalidToken,

    /// Repository or branch not found (or not visible with the given token)
    #[error("repository not found: {repo}")]
    RepoNotFound { repo: String },

    /// API returned an error response
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Raw content fetch failed
    #[error("failed to fetch {path}: {status}")]
    FetchFailed { path: String, status: u16 },

    /// Network-level error (connection failed, timeout, etc.)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<GitHubError> for crate::sources::SourceError {
    fn from(err: GitHubError) -> Self {
        crate::sources::SourceError::GitHub(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let err = GitHubError::InvalidUrl {
            url: "https://gitlab.com/a/b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid GitHub URL 'https://gitlab.com/a/b'. Expected format: https://github.com/owner/repo"
        );
    }

    #[test]
    fn test_repo_not_found_display() {
        let err = GitHubError::RepoNotFound {
            repo: "acme/infra".to_string(),
        };
        assert_eq!(err.to_string(), "repository not found: acme/infra");
    }

    #[test]
    fn test_api_error_display() {
        let err = GitHubError::Api {
            status: 403,
            message: "API rate limit exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "GitHub API error (403): API rate limit exceeded");
    }

    #[test]
    fn test_fetch_failed_display() {
        let err = GitHubError::FetchFailed {
            path: "envs/prod/terraform.tfstate".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "failed to fetch envs/prod/terraform.tfstate: 404");
    }

    #[test]
    fn test_conversion_to_source_error() {
        let gh_err = GitHubError::RepoNotFound {
            repo: "acme/infra".to_string(),
        };
        let source_err: crate::sources::SourceError = gh_err.into();

        assert!(matches!(source_err, crate::sources::SourceError::GitHub(_)));
        assert!(source_err.to_string().contains("repository not found"));
    }
}
