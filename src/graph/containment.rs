use std::collections::HashMap;

use serde_json::Value;

use super::types::NodeKind;
use crate::resource::Resource;

/// One step of the parent cascade. The first rule producing a parent wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainmentRule {
    /// Single subnet reference, e.g. `subnet_id`.
    SubnetRef(&'static str),
    /// Subnet sequence, e.g. `subnet_ids`; the first element that resolves is used.
    SubnetList(&'static str),
    /// A subnet's own VPC reference.
    SubnetInVpc(&'static str),
    /// VPC reference on any other resource (gateways, security groups, ...).
    VpcRef(&'static str),
}

pub const CONTAINMENT_RULES: &[ContainmentRule] = &[
    ContainmentRule::SubnetRef("subnet_id"),
    ContainmentRule::SubnetList("subnet_ids"),
    ContainmentRule::SubnetInVpc("vpc_id"),
    ContainmentRule::VpcRef("vpc_id"),
];

/// Provider-id indexes of the resources that can act as containers.
#[derive(Debug, Default)]
struct ContainerIndex<'a> {
    vpcs: HashMap<&'a str, &'a str>,
    subnets: HashMap<&'a str, &'a str>,
}

impl<'a> ContainerIndex<'a> {
    fn new(resources: &'a [Resource]) -> Self {
        let mut index = Self::default();
        for resource in resources {
            let Some(provider_id) = resource.provider_id() else {
                continue;
            };
            match NodeKind::of(resource) {
                NodeKind::Vpc => {
                    index.vpcs.insert(provider_id, resource.id.as_str());
                }
                NodeKind::Subnet => {
                    index.subnets.insert(provider_id, resource.id.as_str());
                }
                _ => {}
            }
        }
        index
    }
}

impl ContainmentRule {
    fn apply<'a>(
        self,
        resource: &Resource,
        kind: NodeKind,
        index: &ContainerIndex<'a>,
    ) -> Option<&'a str> {
        match self {
            // A subnet's only eligible parent is a VPC.
            ContainmentRule::SubnetRef(key) if kind != NodeKind::Subnet => resource
                .attribute_str(key)
                .and_then(|id| index.subnets.get(id).copied()),
            ContainmentRule::SubnetList(key) if kind != NodeKind::Subnet => {
                match resource.attribute(key) {
                    Some(Value::Array(items)) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .find_map(|id| index.subnets.get(id).copied()),
                    _ => None,
                }
            }
            ContainmentRule::SubnetInVpc(key) if kind == NodeKind::Subnet => resource
                .attribute_str(key)
                .and_then(|id| index.vpcs.get(id).copied()),
            ContainmentRule::VpcRef(key) => resource
                .attribute_str(key)
                .and_then(|id| index.vpcs.get(id).copied()),
            _ => None,
        }
    }
}

/// `child id → parent id`, at most one entry per child. VPCs never appear as children.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContainmentForest {
    parent_of: HashMap<String, String>,
}

impl ContainmentForest {
    pub fn resolve(resources: &[Resource]) -> Self {
        Self::resolve_with(resources, CONTAINMENT_RULES)
    }

    pub fn resolve_with(resources: &[Resource], rules: &[ContainmentRule]) -> Self {
        let index = ContainerIndex::new(resources);
        let mut parent_of = HashMap::new();

        for resource in resources {
            let kind = NodeKind::of(resource);
            if kind == NodeKind::Vpc {
                continue;
            }
            let parent = rules
                .iter()
                .find_map(|rule| rule.apply(resource, kind, &index));
            if let Some(parent) = parent {
                parent_of.insert(resource.id.clone(), parent.to_string());
            }
        }

        tracing::debug!(nested = parent_of.len(), "containment resolved");
        Self { parent_of }
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parent_of.get(id).map(String::as_str)
    }

    pub fn is_root(&self, id: &str) -> bool {
        !self.parent_of.contains_key(id)
    }

    /// Direct children of `parent`, in input order.
    pub fn children<'r>(&self, parent: &str, resources: &'r [Resource]) -> Vec<&'r Resource> {
        resources
            .iter()
            .filter(|r| self.parent(&r.id) == Some(parent))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.parent_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_of.is_empty()
    }
}
