//! Resource graph pipeline: identifier resolution, relationship extraction,
//! containment, layout and assembly, run in that order over one resource list.

pub mod assemble;
pub mod containment;
pub mod layout;
pub mod relationships;
pub mod resolver;
pub mod types;

pub use containment::{CONTAINMENT_RULES, ContainmentForest, ContainmentRule};
pub use layout::LayoutConfig;
pub use relationships::EDGE_ATTRS;
pub use resolver::IdResolver;
pub use types::{Edge, Node, NodeKind, ParseResponse, Position, Size};

use crate::resource::Resource;
use crate::terraform::Extraction;

/// Builds the renderable graph for one extraction. Never fails: unresolved
/// references degrade to "no edge", "no parent" or "root-level node".
pub fn build_graph(extraction: Extraction, config: &LayoutConfig) -> ParseResponse {
    let Extraction {
        resources,
        warnings,
    } = extraction;

    let edges = {
        let resolver = IdResolver::new(&resources);
        relationships::extract_edges(&resources, &resolver)
    };
    let forest = ContainmentForest::resolve(&resources);
    let nodes = layout::layout(&resources, &forest, config);

    assemble::assemble(nodes, edges, resources, warnings)
}

/// Convenience for callers holding a bare resource list.
pub fn build_graph_from_resources(resources: Vec<Resource>, config: &LayoutConfig) -> ParseResponse {
    build_graph(
        Extraction {
            resources,
            warnings: Vec::new(),
        },
        config,
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;

    use crate::resource::Resource;

    pub fn resource(resource_type: &str, name: &str, attributes: serde_json::Value) -> Resource {
        Resource {
            id: format!("{resource_type}.{name}"),
            resource_type: resource_type.to_string(),
            name: name.to_string(),
            display_name: name.to_string(),
            attributes: attributes.as_object().cloned().unwrap_or_default(),
            dependencies: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_dependencies(mut resource: Resource, dependencies: &[&str]) -> Resource {
        resource.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        resource
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::resource;
    use super::*;

    #[test]
    fn test_every_resource_gets_one_node() {
        let resources = vec![
            resource("aws_vpc", "main", serde_json::json!({ "id": "vpc-1" })),
            resource("aws_subnet", "a", serde_json::json!({ "id": "subnet-a", "vpc_id": "vpc-1" })),
            resource("aws_instance", "web", serde_json::json!({ "subnet_id": "subnet-a" })),
            resource("aws_iam_role", "exec", serde_json::json!({})),
        ];
        let response = build_graph_from_resources(resources.clone(), &LayoutConfig::default());

        assert_eq!(response.nodes.len(), resources.len());
        assert_eq!(response.resources, resources);
        let generic = response
            .nodes
            .iter()
            .find(|n| n.id == "aws_iam_role.exec")
            .unwrap();
        assert_eq!(generic.kind, NodeKind::Generic);
    }

    #[test]
    fn test_empty_input() {
        let response = build_graph(Extraction::default(), &LayoutConfig::default());
        assert!(response.nodes.is_empty());
        assert!(response.edges.is_empty());
        assert!(response.resources.is_empty());
    }

    #[test]
    fn test_instance_edge_to_subnet_is_pruned() {
        let resources = vec![
            resource("aws_vpc", "main", serde_json::json!({ "id": "vpc-1" })),
            resource("aws_subnet", "a", serde_json::json!({ "id": "subnet-a", "vpc_id": "vpc-1" })),
            resource(
                "aws_instance",
                "web",
                serde_json::json!({ "id": "i-1", "subnet_id": "subnet-a", "vpc_id": "vpc-1" }),
            ),
        ];
        let response = build_graph_from_resources(resources, &LayoutConfig::default());

        // "in subnet" restates nesting; "in vpc" from the instance skips a level and stays.
        let edges: Vec<(&str, &str)> = response
            .edges
            .iter()
            .map(|e| (e.source.as_str(), e.label.as_str()))
            .collect();
        assert_eq!(edges, vec![("aws_instance.web", "in vpc")]);
    }

    #[test]
    fn test_colliding_ids_last_write_wins_in_first_slot() {
        let first = resource("aws_s3_bucket", "shared", serde_json::json!({}));
        let mut second = resource("aws_lambda_function", "fn", serde_json::json!({}));
        second.id = first.id.clone();
        let resources = vec![
            first,
            resource("aws_iam_role", "exec", serde_json::json!({})),
            second,
        ];
        let response = build_graph_from_resources(resources, &LayoutConfig::default());

        let ids: Vec<&str> = response.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["aws_s3_bucket.shared", "aws_iam_role.exec"]);
        let shared = &response.nodes[0];
        assert_eq!(shared.kind, NodeKind::Function);
        assert_eq!(shared.position, Position { x: 980.0, y: 260.0 });
        assert_eq!(response.resources.len(), 3);
    }
}
