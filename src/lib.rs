//! InfraGraph - Terraform state to infrastructure diagram
//!
//! A library for turning Terraform state into nested, laid-out graph nodes and labeled edges.

pub mod config;
pub mod graph;
pub mod output;
pub mod resource;
pub mod sources;
pub mod terraform;

mod error;

pub use error::InfragraphError;
pub use graph::{
    Edge, LayoutConfig, Node, NodeKind, ParseResponse, Position, Size, build_graph,
    build_graph_from_resources,
};
pub use resource::Resource;
pub use sources::github::{GitHubClient, GitHubError, ScanResult, StateProject};
pub use terraform::{Extraction, StateError};

/// Extracts resources from raw state text and builds the graph in one pass.
pub fn parse_state(text: &str, config: &LayoutConfig) -> Result<ParseResponse, StateError> {
    let extraction = terraform::parse_state(text)?;
    Ok(build_graph(extraction, config))
}
