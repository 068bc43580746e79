use tabled::settings::Style;
use tabled::{Table, Tabled};
use termtree::Tree;

use crate::error::InfragraphError;
use crate::graph::{Node, ParseResponse};
use crate::sources::github::ScanResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The full parse response as JSON
    #[default]
    Json,
    /// Node and edge tables
    Table,
    /// Containment tree
    Tree,
}

#[derive(Tabled)]
struct NodeRow {
    id: String,
    #[tabled(rename = "type")]
    kind: String,
    parent: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<&Node> for NodeRow {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind.to_string(),
            parent: node.parent.clone().unwrap_or_else(|| "-".to_string()),
            x: node.position.x,
            y: node.position.y,
            width: node.size.width,
            height: node.size.height,
        }
    }
}

#[derive(Tabled)]
struct EdgeRow {
    source: String,
    label: String,
    target: String,
}

#[derive(Tabled)]
struct ProjectRow {
    path: String,
    files: String,
}

pub fn render(
    response: &ParseResponse,
    format: OutputFormat,
    compact: bool,
) -> Result<String, InfragraphError> {
    match format {
        OutputFormat::Json => to_json(response, compact),
        OutputFormat::Table => Ok(render_tables(response)),
        OutputFormat::Tree => Ok(render_tree(response)),
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, InfragraphError> {
    let json = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    json.map_err(|e| InfragraphError::Output(e.to_string()))
}

pub fn render_tables(response: &ParseResponse) -> String {
    let mut nodes = Table::new(response.nodes.iter().map(NodeRow::from));
    nodes.with(Style::rounded());

    if response.edges.is_empty() {
        return format!("{}\n(no edges)", nodes);
    }

    let mut edges = Table::new(response.edges.iter().map(|e| EdgeRow {
        source: e.source.clone(),
        label: e.label.clone(),
        target: e.target.clone(),
    }));
    edges.with(Style::rounded());

    format!("{}\n{}", nodes, edges)
}

/// Containment forest, one tree per root node, roots in node order.
pub fn render_tree(response: &ParseResponse) -> String {
    response
        .nodes
        .iter()
        .filter(|n| n.parent.is_none())
        .map(|root| containment_tree(root, &response.nodes).to_string())
        .collect::<Vec<_>>()
        .join("")
}

fn node_label(node: &Node) -> String {
    if node.label == node.id {
        format!("{} [{}]", node.id, node.kind)
    } else {
        format!("{} \"{}\" [{}]", node.id, node.label, node.kind)
    }
}

fn containment_tree(node: &Node, nodes: &[Node]) -> Tree<String> {
    let children = nodes
        .iter()
        .filter(|n| n.parent.as_deref() == Some(node.id.as_str()))
        .map(|child| containment_tree(child, nodes));
    Tree::new(node_label(node)).with_leaves(children)
}

pub fn render_scan(
    scan: &ScanResult,
    format: OutputFormat,
    compact: bool,
) -> Result<String, InfragraphError> {
    match format {
        OutputFormat::Json => to_json(scan, compact),
        OutputFormat::Table | OutputFormat::Tree => {
            if scan.projects.is_empty() {
                return Ok(format!("no state files found on branch {}", scan.default_branch));
            }
            let mut table = Table::new(scan.projects.iter().map(|p| ProjectRow {
                path: p.path.clone(),
                files: p.files.join(", "),
            }));
            table.with(Style::rounded());
            Ok(format!("branch: {}\n{}", scan.default_branch, table))
        }
    }
}
