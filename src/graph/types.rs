use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// Visual category of a node, derived from the resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "vpcNode")]
    Vpc,
    #[serde(rename = "subnetNode")]
    Subnet,
    #[serde(rename = "igwNode")]
    InternetGateway,
    #[serde(rename = "natNode")]
    NatGateway,
    #[serde(rename = "routeTableNode")]
    RouteTable,
    #[serde(rename = "securityGroupNode")]
    SecurityGroup,
    #[serde(rename = "ec2Node")]
    Instance,
    #[serde(rename = "rdsNode")]
    Database,
    #[serde(rename = "lbNode")]
    LoadBalancer,
    #[serde(rename = "eipNode")]
    ElasticIp,
    #[serde(rename = "s3Node")]
    ObjectStorage,
    #[serde(rename = "lambdaNode")]
    Function,
    #[serde(rename = "genericNode")]
    Generic,
}

/// Resource type → node kind. Unlisted types fall back to [`NodeKind::Generic`].
pub const NODE_KINDS: &[(&str, NodeKind)] = &[
    ("aws_vpc", NodeKind::Vpc),
    ("aws_subnet", NodeKind::Subnet),
    ("aws_internet_gateway", NodeKind::InternetGateway),
    ("aws_nat_gateway", NodeKind::NatGateway),
    ("aws_route_table", NodeKind::RouteTable),
    ("aws_route_table_association", NodeKind::RouteTable),
    ("aws_security_group", NodeKind::SecurityGroup),
    ("aws_instance", NodeKind::Instance),
    ("aws_db_instance", NodeKind::Database),
    ("aws_lb", NodeKind::LoadBalancer),
    ("aws_alb", NodeKind::LoadBalancer),
    ("aws_eip", NodeKind::ElasticIp),
    ("aws_s3_bucket", NodeKind::ObjectStorage),
    ("aws_lambda_function", NodeKind::Function),
];

impl NodeKind {
    pub fn for_resource_type(resource_type: &str) -> Self {
        NODE_KINDS
            .iter()
            .find(|(t, _)| *t == resource_type)
            .map(|(_, kind)| *kind)
            .unwrap_or(NodeKind::Generic)
    }

    pub fn of(resource: &Resource) -> Self {
        Self::for_resource_type(&resource.resource_type)
    }

    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Vpc | NodeKind::Subnet)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Vpc => "vpcNode",
            NodeKind::Subnet => "subnetNode",
            NodeKind::InternetGateway => "igwNode",
            NodeKind::NatGateway => "natNode",
            NodeKind::RouteTable => "routeTableNode",
            NodeKind::SecurityGroup => "securityGroupNode",
            NodeKind::Instance => "ec2Node",
            NodeKind::Database => "rdsNode",
            NodeKind::LoadBalancer => "lbNode",
            NodeKind::ElasticIp => "eipNode",
            NodeKind::ObjectStorage => "s3Node",
            NodeKind::Function => "lambdaNode",
            NodeKind::Generic => "genericNode",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A laid-out visual element, one per resource.
///
/// `position` is relative to `parent` when set, absolute otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub label: String,
}

impl Edge {
    pub fn new(source: &str, target: &str, label: &str) -> Self {
        Self {
            id: edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            label: label.to_string(),
        }
    }
}

pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{}-{}", source, target)
}

/// The literal output of a parse: nodes, pruned edges, and pass-through input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub resources: Vec<Resource>,
    pub warnings: Vec<String>,
}
