use indexmap::IndexMap;

use super::types::{Edge, Node, ParseResponse};
use crate::resource::Resource;

/// Merges laid-out nodes and extracted edges into the final response.
///
/// Edges pointing at unknown nodes are dropped, as are edges that restate
/// containment (the source is already nested inside the target).
pub fn assemble(
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    resources: Vec<Resource>,
    warnings: Vec<String>,
) -> ParseResponse {
    let total = edges.len();
    let edges: Vec<Edge> = edges
        .into_iter()
        .filter(|edge| {
            let Some(source) = nodes.get(&edge.source) else {
                return false;
            };
            if !nodes.contains_key(&edge.target) {
                return false;
            }
            source.parent.as_deref() != Some(edge.target.as_str())
        })
        .collect();

    tracing::debug!(
        kept = edges.len(),
        pruned = total - edges.len(),
        "edges assembled"
    );

    ParseResponse {
        nodes: nodes.into_values().collect(),
        edges,
        resources,
        warnings,
    }
}
