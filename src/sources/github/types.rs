use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::GitHubError;

pub const DEFAULT_BRANCH: &str = "main";
pub const FALLBACK_BRANCH: &str = "master";

/// File suffixes recognised as Terraform state.
pub const STATE_SUFFIXES: &[&str] = &[".tfstate", ".tfstate.json"];

static REPO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)")
        .expect("repository URL pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RepoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

pub fn parse_repo_url(url: &str) -> Result<RepoInfo, GitHubError> {
    let captures = REPO_URL
        .captures(url.trim())
        .ok_or_else(|| GitHubError::InvalidUrl {
            url: url.to_string(),
        })?;

    let owner = captures[1].to_string();
    let repo = captures[2].trim_end_matches(".git").to_string();
    if repo.is_empty() {
        return Err(GitHubError::InvalidUrl {
            url: url.to_string(),
        });
    }

    Ok(RepoInfo { owner, repo })
}

pub fn is_state_file(path: &str) -> bool {
    STATE_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

#[derive(Debug, Deserialize)]
pub struct GitTreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Deserialize)]
pub struct GitTreeResponse {
    pub sha: String,
    pub tree: Vec<GitTreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

/// A directory holding one or more state files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateProject {
    pub path: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Branch the tree was actually read from (after any fallback).
    pub default_branch: String,
    pub projects: Vec<StateProject>,
}

impl ScanResult {
    pub fn from_tree(branch: &str, tree: GitTreeResponse) -> Self {
        let mut dirs: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for item in tree.tree {
            if item.type_ != "blob" || !is_state_file(&item.path) {
                continue;
            }
            let (dir, file) = match item.path.rsplit_once('/') {
                Some((dir, file)) => (dir.to_string(), file.to_string()),
                None => (".".to_string(), item.path.clone()),
            };
            dirs.entry(dir).or_default().push(file);
        }

        Self {
            default_branch: branch.to_string(),
            projects: dirs
                .into_iter()
                .map(|(path, files)| StateProject { path, files })
                .collect(),
        }
    }
}
