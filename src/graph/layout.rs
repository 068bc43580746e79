use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::containment::ContainmentForest;
use super::types::{Node, NodeKind, Position, Size};
use crate::resource::Resource;

/// Grid and sizing constants, in layout units.
///
/// `Default` reproduces the reference layout; a partial JSON document
/// overrides only the fields it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub vpc_width: f64,
    pub vpc_min_height: f64,
    /// Vertical gap between consecutive top-level containers.
    pub vpc_gap: f64,
    /// Gap between the subnet grid and the VPC-direct children row.
    pub vpc_direct_gap: f64,
    pub vpc_bottom_margin: f64,

    pub subnet_width: f64,
    pub subnet_height: f64,
    pub subnet_pad_x: f64,
    pub subnet_pad_y: f64,
    pub subnet_col_gap: f64,
    pub subnet_row_gap: f64,
    pub subnet_columns: usize,

    pub resource_width: f64,
    pub resource_height: f64,
    pub resource_pad_x: f64,
    pub resource_pad_y: f64,
    pub resource_col_gap: f64,
    pub resource_row_gap: f64,
    pub resource_columns: usize,

    pub root_x: f64,
    pub root_row_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vpc_width: 900.0,
            vpc_min_height: 700.0,
            vpc_gap: 60.0,
            vpc_direct_gap: 40.0,
            vpc_bottom_margin: 40.0,

            subnet_width: 380.0,
            subnet_height: 280.0,
            subnet_pad_x: 30.0,
            subnet_pad_y: 100.0,
            subnet_col_gap: 420.0,
            subnet_row_gap: 320.0,
            subnet_columns: 2,

            resource_width: 200.0,
            resource_height: 90.0,
            resource_pad_x: 20.0,
            resource_pad_y: 60.0,
            resource_col_gap: 230.0,
            resource_row_gap: 120.0,
            resource_columns: 3,

            root_x: 980.0,
            root_row_gap: 130.0,
        }
    }
}

impl LayoutConfig {
    fn resource_size(&self) -> Size {
        Size {
            width: self.resource_width,
            height: self.resource_height,
        }
    }

    /// Root column x, pushed right of the VPC stack when `root_x` would
    /// overlap it.
    pub fn root_column_x(&self) -> f64 {
        self.root_x.max(self.vpc_width + self.vpc_gap)
    }

    fn subnet_size(&self) -> Size {
        Size {
            width: self.subnet_width,
            height: self.subnet_height,
        }
    }
}

/// (column, row) of the `index`-th cell in a grid `columns` wide.
fn grid_cell(index: usize, columns: usize) -> (f64, f64) {
    let columns = columns.max(1);
    ((index % columns) as f64, (index / columns) as f64)
}

fn rows(count: usize, columns: usize) -> usize {
    count.div_ceil(columns.max(1))
}

/// Vertical extent of a VPC's contents, measured before anything is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VpcExtent {
    pub subnets_bottom: f64,
    pub content_bottom: f64,
    pub height: f64,
}

pub fn measure_vpc(subnet_count: usize, direct_count: usize, config: &LayoutConfig) -> VpcExtent {
    let subnet_rows = rows(subnet_count, config.subnet_columns);
    let direct_rows = rows(direct_count, config.resource_columns);

    let subnets_bottom = if subnet_rows > 0 {
        config.subnet_pad_y
            + (subnet_rows - 1) as f64 * config.subnet_row_gap
            + config.subnet_height
    } else {
        config.subnet_pad_y
    };

    let content_bottom = if direct_rows > 0 {
        subnets_bottom
            + config.vpc_direct_gap
            + (direct_rows - 1) as f64 * config.resource_row_gap
            + config.resource_height
    } else {
        subnets_bottom
    };

    VpcExtent {
        subnets_bottom,
        content_bottom,
        height: config
            .vpc_min_height
            .max(content_bottom + config.vpc_bottom_margin),
    }
}

struct Placer<'r, 'c> {
    resources: &'r [Resource],
    forest: &'c ContainmentForest,
    config: &'c LayoutConfig,
    nodes: IndexMap<String, Node>,
}

impl<'r, 'c> Placer<'r, 'c> {
    fn place(
        &mut self,
        resource: &Resource,
        position: Position,
        parent: Option<&str>,
        size: Size,
    ) {
        // Colliding ids overwrite in place; the node list keeps first-seen order.
        self.nodes.insert(
            resource.id.clone(),
            Node {
                id: resource.id.clone(),
                kind: NodeKind::of(resource),
                label: resource.display_name.clone(),
                position,
                parent: parent.map(str::to_string),
                size,
            },
        );
    }

    fn place_vpc(&mut self, vpc: &Resource, offset_y: f64) -> f64 {
        let config = self.config;
        let children = self.forest.children(&vpc.id, self.resources);
        let (subnets, direct): (Vec<&Resource>, Vec<&Resource>) = children
            .into_iter()
            .partition(|r| NodeKind::of(r) == NodeKind::Subnet);

        let extent = measure_vpc(subnets.len(), direct.len(), config);

        self.place(
            vpc,
            Position { x: 0.0, y: offset_y },
            None,
            Size {
                width: config.vpc_width,
                height: extent.height,
            },
        );

        for (j, subnet) in subnets.iter().enumerate() {
            let (col, row) = grid_cell(j, config.subnet_columns);
            let position = Position {
                x: config.subnet_pad_x + col * config.subnet_col_gap,
                y: config.subnet_pad_y + row * config.subnet_row_gap,
            };
            self.place(subnet, position, Some(vpc.id.as_str()), config.subnet_size());
            self.place_subnet_children(subnet);
        }

        for (k, child) in direct.iter().enumerate() {
            if self.nodes.contains_key(&child.id) {
                continue;
            }
            let (col, row) = grid_cell(k, config.resource_columns);
            let position = Position {
                x: config.subnet_pad_x + col * config.resource_col_gap,
                y: extent.subnets_bottom + config.vpc_direct_gap + row * config.resource_row_gap,
            };
            self.place(child, position, Some(vpc.id.as_str()), config.resource_size());
        }

        extent.height
    }

    fn place_subnet_children(&mut self, subnet: &Resource) {
        let config = self.config;
        for (k, child) in self
            .forest
            .children(&subnet.id, self.resources)
            .into_iter()
            .enumerate()
        {
            let (col, row) = grid_cell(k, config.resource_columns);
            let position = Position {
                x: config.resource_pad_x + col * config.resource_col_gap,
                y: config.resource_pad_y + row * config.resource_row_gap,
            };
            self.place(child, position, Some(subnet.id.as_str()), config.resource_size());
        }
    }
}

/// Places every resource. Pure: identical input order gives identical output.
///
/// VPCs stack down the left edge, subnets without a VPC follow them, and
/// the remaining root-level resources form a single column right of the VPCs.
pub fn layout(
    resources: &[Resource],
    forest: &ContainmentForest,
    config: &LayoutConfig,
) -> IndexMap<String, Node> {
    let mut placer = Placer {
        resources,
        forest,
        config,
        nodes: IndexMap::with_capacity(resources.len()),
    };

    let mut offset_y = 0.0;
    for vpc in resources.iter().filter(|r| NodeKind::of(r) == NodeKind::Vpc) {
        let height = placer.place_vpc(vpc, offset_y);
        offset_y += height + config.vpc_gap;
    }

    let orphan_subnets = resources
        .iter()
        .filter(|r| NodeKind::of(r) == NodeKind::Subnet && forest.is_root(&r.id));
    for subnet in orphan_subnets {
        placer.place(
            subnet,
            Position { x: 0.0, y: offset_y },
            None,
            config.subnet_size(),
        );
        placer.place_subnet_children(subnet);
        offset_y += config.subnet_height + config.vpc_gap;
    }

    let roots = resources
        .iter()
        .filter(|r| !NodeKind::of(r).is_container() && forest.is_root(&r.id));
    for (i, resource) in roots.enumerate() {
        let position = Position {
            x: config.root_column_x(),
            y: i as f64 * config.root_row_gap,
        };
        placer.place(resource, position, None, config.resource_size());
    }

    tracing::debug!(nodes = placer.nodes.len(), "layout computed");
    placer.nodes
}
