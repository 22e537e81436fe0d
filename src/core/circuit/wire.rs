use crate::core::types::{NodeId, PortId, WireId};
use serde::{Deserialize, Serialize};

/// A directed edge from one output port to one input port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    pub id: WireId,
    pub source: PortId,
    pub source_node: NodeId,
    pub target: PortId,
    pub target_node: NodeId,
}

impl Wire {
    pub fn new(
        id: WireId,
        source_node: NodeId,
        source: PortId,
        target_node: NodeId,
        target: PortId,
    ) -> Self {
        Self {
            id,
            source,
            source_node,
            target,
            target_node,
        }
    }

    pub fn touches_node(&self, node: &NodeId) -> bool {
        &self.source_node == node || &self.target_node == node
    }

    pub fn touches_port(&self, port: &PortId) -> bool {
        &self.source == port || &self.target == port
    }

    /// `(source node, target node)` pair, ignoring ports and ids
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.source_node.clone(), self.target_node.clone())
    }
}
