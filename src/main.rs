mod cli;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, GitHubCommand, RenderArgs};
use infragraph::config::load_layout_config;
use infragraph::output::{self, OutputFormat};
use infragraph::sources::{self, GitHubSource, StateSource};
use infragraph::{GitHubClient, ParseResponse};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Parse(args) => {
            let source = sources::get_source(&args.location)?;
            let response = parse_from(source.as_ref(), &args.render).await?;
            emit(&response, &args.render)?;
        }
        Command::Github { command } => match command {
            GitHubCommand::Scan(args) => {
                let repo = sources::github::parse_repo_url(&args.repo.url)?;
                let client = GitHubClient::new(args.repo.token)?;
                let scan = client
                    .scan_repo(&repo.owner, &repo.repo, &args.repo.branch)
                    .await?;
                tracing::info!(
                    repo = %repo,
                    branch = %scan.default_branch,
                    projects = scan.projects.len(),
                    "scan complete"
                );
                println!("{}", output::render_scan(&scan, args.format, false)?);
            }
            GitHubCommand::Parse(args) => {
                let source = GitHubSource::from_url(
                    &args.repo.url,
                    args.repo.branch,
                    args.path,
                    args.repo.token,
                )?;
                let response = parse_from(&source, &args.render).await?;
                emit(&response, &args.render)?;
            }
        },
    }

    Ok(())
}

async fn parse_from(source: &dyn StateSource, render: &RenderArgs) -> Result<ParseResponse> {
    let config = load_layout_config(render.layout_config.as_deref())?;
    let text = source.fetch().await?;
    let response = infragraph::parse_state(&text, &config)?;
    tracing::info!(
        source = source.name(),
        location = %source.location(),
        nodes = response.nodes.len(),
        edges = response.edges.len(),
        warnings = response.warnings.len(),
        "parse complete"
    );
    Ok(response)
}

fn emit(response: &ParseResponse, render: &RenderArgs) -> Result<()> {
    if render.format != OutputFormat::Json {
        for warning in &response.warnings {
            eprintln!("warning: {}", warning);
        }
    }
    println!("{}", output::render(response, render.format, render.compact)?);
    Ok(())
}
