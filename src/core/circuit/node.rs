use super::interface::{GroupInterface, GroupPortMap};
use crate::core::types::{GateType, NodeId, Port, PortId, PortKind, Position};
use serde::{Deserialize, Serialize};

/// A placed circuit element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<NodeId>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Variant data of a node, discriminated by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    Switch {
        state: bool,
        output_port_id: PortId,
    },
    Gate {
        gate_type: GateType,
        input_port_ids: Vec<PortId>,
        output_port_id: PortId,
    },
    Light {
        input_port_id: PortId,
    },
    Group(GroupData),
    /// Pass-through used only inside groups to anchor an exposed port
    Junction {
        input_port_id: PortId,
        output_port_id: PortId,
    },
}

/// Data carried by a group node.
///
/// The group's own ports are the exposed ports of its interface; `port_map` is the resolved
/// group-port to internal-port lookup used by the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupData {
    pub label: String,
    pub child_node_ids: Vec<NodeId>,
    #[serde(default)]
    pub collapsed: bool,
    pub interface: GroupInterface,
    pub port_map: GroupPortMap,
}

impl Node {
    pub fn new(id: NodeId, position: Position, width: f64, height: f64, kind: NodeKind) -> Self {
        Self {
            id,
            position,
            width,
            height,
            parent_group_id: None,
            kind,
        }
    }

    /// Name of the variant, as used in messages and payloads
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Switch { .. } => "switch",
            NodeKind::Gate { .. } => "gate",
            NodeKind::Light { .. } => "light",
            NodeKind::Group(_) => "group",
            NodeKind::Junction { .. } => "junction",
        }
    }

    /// Every port owned by this node, inputs first, each with its index within its kind
    pub fn ports(&self) -> Vec<Port> {
        let mut ports = Vec::new();
        for (index, id) in self.input_port_ids().into_iter().enumerate() {
            ports.push(self.port(id, PortKind::Input, index));
        }
        for (index, id) in self.output_port_ids().into_iter().enumerate() {
            ports.push(self.port(id, PortKind::Output, index));
        }
        ports
    }

    fn port(&self, id: &PortId, kind: PortKind, index: usize) -> Port {
        Port {
            id: id.clone(),
            node_id: self.id.clone(),
            kind,
            index,
        }
    }

    pub fn input_port_ids(&self) -> Vec<&PortId> {
        match &self.kind {
            NodeKind::Switch { .. } => Vec::new(),
            NodeKind::Gate { input_port_ids, .. } => input_port_ids.iter().collect(),
            NodeKind::Light { input_port_id } => vec![input_port_id],
            NodeKind::Group(group) => group.interface.inputs.iter().map(|p| &p.id).collect(),
            NodeKind::Junction { input_port_id, .. } => vec![input_port_id],
        }
    }

    pub fn output_port_ids(&self) -> Vec<&PortId> {
        match &self.kind {
            NodeKind::Switch { output_port_id, .. } => vec![output_port_id],
            NodeKind::Gate { output_port_id, .. } => vec![output_port_id],
            NodeKind::Light { .. } => Vec::new(),
            NodeKind::Group(group) => group.interface.outputs.iter().map(|p| &p.id).collect(),
            NodeKind::Junction { output_port_id, .. } => vec![output_port_id],
        }
    }

    pub fn owns_port(&self, port_id: &PortId) -> bool {
        self.input_port_ids().contains(&port_id) || self.output_port_ids().contains(&port_id)
    }

    pub fn as_group(&self) -> Option<&GroupData> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupData> {
        match &mut self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_junction(&self) -> bool {
        matches!(self.kind, NodeKind::Junction { .. })
    }

    /// Junction ports as `(input, output)`
    pub fn junction_ports(&self) -> Option<(&PortId, &PortId)> {
        match &self.kind {
            NodeKind::Junction {
                input_port_id,
                output_port_id,
            } => Some((input_port_id, output_port_id)),
            _ => None,
        }
    }

    /// Bottom-right corner of the node's box
    pub fn far_corner(&self) -> Position {
        Position::new(self.position.x + self.width, self.position.y + self.height)
    }
}
