use super::node::Node;
use super::wire::Wire;
use crate::core::types::{NodeId, PortId, PortKind};
use std::collections::HashMap;

/// Where a port lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub node_id: NodeId,
    pub kind: PortKind,
    pub index: usize,
}

/// Lookup tables kept in step with a circuit's nodes and wires.
///
/// Replaces linear scans of the node list when resolving ports, so `connect` and `simulate`
/// stay near-linear on large circuits.
#[derive(Debug, Clone, Default)]
pub(crate) struct CircuitIndex {
    nodes: HashMap<NodeId, usize>,
    ports: HashMap<PortId, PortEntry>,
    /// Target port -> position of its (first) driving wire
    incoming: HashMap<PortId, usize>,
    pub(crate) duplicate_nodes: Vec<NodeId>,
    pub(crate) duplicate_ports: Vec<PortId>,
}

impl CircuitIndex {
    pub(crate) fn build(nodes: &[Node], wires: &[Wire]) -> Self {
        let mut index = Self::default();
        for (position, node) in nodes.iter().enumerate() {
            if index.nodes.insert(node.id.clone(), position).is_some() {
                index.duplicate_nodes.push(node.id.clone());
            }
            for port in node.ports() {
                let entry = PortEntry {
                    node_id: node.id.clone(),
                    kind: port.kind,
                    index: port.index,
                };
                if index.ports.insert(port.id.clone(), entry).is_some() {
                    index.duplicate_ports.push(port.id);
                }
            }
        }
        for (position, wire) in wires.iter().enumerate() {
            index.record_wire(wire, position);
        }
        index
    }

    pub(crate) fn record_wire(&mut self, wire: &Wire, position: usize) {
        self.incoming.entry(wire.target.clone()).or_insert(position);
    }

    pub(crate) fn node_position(&self, id: &NodeId) -> Option<usize> {
        self.nodes.get(id).copied()
    }

    pub(crate) fn port(&self, id: &PortId) -> Option<&PortEntry> {
        self.ports.get(id)
    }

    pub(crate) fn incoming_position(&self, target: &PortId) -> Option<usize> {
        self.incoming.get(target).copied()
    }
}
