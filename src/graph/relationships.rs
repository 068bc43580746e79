use std::collections::HashSet;

use serde_json::Value;

use super::resolver::IdResolver;
use super::types::Edge;
use crate::resource::Resource;

/// Attribute key → edge label, checked in this order for every resource.
pub const EDGE_ATTRS: &[(&str, &str)] = &[
    ("vpc_id", "in vpc"),
    ("subnet_id", "in subnet"),
    ("security_groups", "secured by"),
    ("vpc_security_group_ids", "secured by"),
    ("nat_gateway_id", "routes via"),
    ("internet_gateway_id", "routes via"),
    ("instance_id", "attached to"),
    ("allocation_id", "uses eip"),
    ("load_balancer_arn", "behind lb"),
];

pub const DEPENDS_ON: &str = "depends on";

/// Candidate references held by an attribute value: the string itself, or
/// every string element of a sequence. Anything else yields nothing.
pub fn reference_candidates(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Ordered edge list; the first label seen for a (source, target) pair wins.
#[derive(Debug, Default)]
pub struct EdgeSet {
    seen: HashSet<(String, String)>,
    edges: Vec<Edge>,
}

impl EdgeSet {
    pub fn add(&mut self, source: &str, target: &str, label: &str) -> bool {
        if !self.seen.insert((source.to_string(), target.to_string())) {
            return false;
        }
        self.edges.push(Edge::new(source, target, label));
        true
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}

pub fn extract_edges(resources: &[Resource], resolver: &IdResolver<'_>) -> Vec<Edge> {
    let mut edges = EdgeSet::default();

    for resource in resources {
        for (key, label) in EDGE_ATTRS {
            let Some(value) = resource.attribute(key) else {
                continue;
            };
            for raw in reference_candidates(value) {
                if let Some(target) = resolver.resolve(raw)
                    && target != resource.id
                {
                    edges.add(&resource.id, target, label);
                }
            }
        }

        for dependency in &resource.dependencies {
            if let Some(target) = resolver.resolve(dependency)
                && target != resource.id
            {
                edges.add(&resource.id, target, DEPENDS_ON);
            }
        }
    }

    tracing::debug!(edges = edges.len(), "relationships extracted");
    edges.into_edges()
}
