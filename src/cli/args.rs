use std::path::PathBuf;

use clap::{Parser, Subcommand};

use infragraph::output::OutputFormat;
use infragraph::sources::github::DEFAULT_BRANCH;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn Terraform state into a laid-out infrastructure graph")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a local state file (`-` reads stdin)
    Parse(ParseArgs),
    /// Work with state files stored in a GitHub repository
    Github {
        #[command(subcommand)]
        command: GitHubCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum GitHubCommand {
    /// List directories containing state files
    Scan(ScanArgs),
    /// Fetch one state file and parse it
    Parse(GitHubParseArgs),
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,

    #[arg(long, env = "INFRAGRAPH_LAYOUT_CONFIG")]
    pub layout_config: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ParseArgs {
    pub location: String,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(clap::Args, Debug)]
pub struct RepoArgs {
    /// https://github.com/<owner>/<repo>
    pub url: String,

    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct GitHubParseArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Repository-relative path of the state file
    #[arg(long)]
    pub path: String,

    #[command(flatten)]
    pub render: RenderArgs,
}
