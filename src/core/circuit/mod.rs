//! Circuit data model: nodes, wires, group interfaces and the port index.

pub mod index;
pub mod interface;
pub mod node;
pub mod wire;

pub use index::PortEntry;
pub use interface::{ExposedPort, GroupInterface, GroupPortMap};
pub use node::{GroupData, Node, NodeKind};
pub use wire::Wire;

use crate::core::groups::interface_validator::{validate_group_interface, InterfaceValidationOptions};
use crate::core::types::{NodeId, Port, PortId, PortKind, WireId};
use index::CircuitIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Plain serialized form of a circuit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CircuitParts {
    pub nodes: Vec<Node>,
    pub wires: Vec<Wire>,
}

/// An immutable-by-convention circuit value.
///
/// Commands take `&Circuit` and return a new value, so an undo history is just a stack of
/// circuits. The port index is rebuilt whenever a value is assembled from parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CircuitParts", into = "CircuitParts")]
pub struct Circuit {
    nodes: Vec<Node>,
    wires: Vec<Wire>,
    index: CircuitIndex,
}

impl From<CircuitParts> for Circuit {
    fn from(parts: CircuitParts) -> Self {
        Circuit::new(parts.nodes, parts.wires)
    }
}

impl From<Circuit> for CircuitParts {
    fn from(circuit: Circuit) -> Self {
        let (nodes, wires) = circuit.into_parts();
        CircuitParts { nodes, wires }
    }
}

impl PartialEq for Circuit {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.wires == other.wires
    }
}

impl Circuit {
    pub fn new(nodes: Vec<Node>, wires: Vec<Wire>) -> Self {
        let index = CircuitIndex::build(&nodes, &wires);
        Self { nodes, wires, index }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Wire>) {
        (self.nodes, self.wires)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index
            .node_position(id)
            .and_then(|position| self.nodes.get(position))
    }

    pub fn has_node(&self, id: &NodeId) -> bool {
        self.index.node_position(id).is_some()
    }

    pub fn group(&self, id: &NodeId) -> Option<&GroupData> {
        self.node(id).and_then(Node::as_group)
    }

    pub fn wire(&self, id: &WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| &w.id == id)
    }

    /// Resolve a port id to the node that owns it
    pub fn port_entry(&self, id: &PortId) -> Option<&PortEntry> {
        self.index.port(id)
    }

    pub fn port(&self, id: &PortId) -> Option<Port> {
        self.index.port(id).map(|entry| Port {
            id: id.clone(),
            node_id: entry.node_id.clone(),
            kind: entry.kind,
            index: entry.index,
        })
    }

    pub fn port_kind(&self, id: &PortId) -> Option<PortKind> {
        self.index.port(id).map(|entry| entry.kind)
    }

    /// The unique wire driving an input port
    pub fn incoming_wire(&self, target: &PortId) -> Option<&Wire> {
        self.index
            .incoming_position(target)
            .and_then(|position| self.wires.get(position))
    }

    pub fn outgoing_wires<'a>(&'a self, source: &'a PortId) -> impl Iterator<Item = &'a Wire> + 'a {
        self.wires.iter().filter(move |w| &w.source == source)
    }

    pub fn wires_touching_node<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Wire> + 'a {
        self.wires.iter().filter(move |w| w.touches_node(node))
    }

    /// Whether any wire starts or ends at this port
    pub fn is_port_wired(&self, port: &PortId) -> bool {
        self.wires.iter().any(|w| w.touches_port(port))
    }

    /// Every node transitively contained in a group, breadth first
    pub fn descendants(&self, group_id: &NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(group_id.clone());
        let mut frontier = vec![group_id.clone()];
        while let Some(current) = frontier.pop() {
            let Some(group) = self.group(&current) else {
                continue;
            };
            for child in &group.child_node_ids {
                if seen.insert(child.clone()) && self.has_node(child) {
                    found.push(child.clone());
                    frontier.push(child.clone());
                }
            }
        }
        found
    }

    /// Append a wire, keeping the index current
    pub(crate) fn push_wire(&mut self, wire: Wire) {
        self.index.record_wire(&wire, self.wires.len());
        self.wires.push(wire);
    }

    /// Every violation of the circuit invariants, in a stable order
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for id in &self.index.duplicate_nodes {
            errors.push(format!("Duplicate node id '{}'", id));
        }
        for id in &self.index.duplicate_ports {
            errors.push(format!("Duplicate port id '{}'", id));
        }

        let mut wire_ids = HashSet::new();
        let mut driven = HashSet::new();
        for wire in &self.wires {
            if !wire_ids.insert(&wire.id) {
                errors.push(format!("Duplicate wire id '{}'", wire.id));
            }
            for (port, node, expected) in [
                (&wire.source, &wire.source_node, PortKind::Output),
                (&wire.target, &wire.target_node, PortKind::Input),
            ] {
                match self.port_entry(port) {
                    None => errors.push(format!("Wire '{}' references unknown port '{}'", wire.id, port)),
                    Some(entry) => {
                        if &entry.node_id != node {
                            errors.push(format!(
                                "Wire '{}' claims port '{}' on node '{}' but it belongs to '{}'",
                                wire.id, port, node, entry.node_id
                            ));
                        }
                        if entry.kind != expected {
                            errors.push(format!(
                                "Wire '{}' uses {} port '{}' where an {} port is required",
                                wire.id, entry.kind, port, expected
                            ));
                        }
                    }
                }
            }
            if wire.source_node == wire.target_node {
                errors.push(format!("Wire '{}' loops back onto node '{}'", wire.id, wire.source_node));
            }
            if !driven.insert(&wire.target) {
                errors.push(format!("Input port '{}' has more than one incoming wire", wire.target));
            }
        }

        for node in &self.nodes {
            if let Some(parent) = &node.parent_group_id {
                let listed = self
                    .group(parent)
                    .map(|g| g.child_node_ids.contains(&node.id))
                    .unwrap_or(false);
                if !listed {
                    errors.push(format!(
                        "Node '{}' names parent '{}' which does not list it as a child",
                        node.id, parent
                    ));
                }
            }
            let Some(group) = node.as_group() else {
                continue;
            };
            for child in &group.child_node_ids {
                match self.node(child) {
                    None => errors.push(format!("Group '{}' lists unknown child '{}'", node.id, child)),
                    Some(c) if c.parent_group_id.as_ref() != Some(&node.id) => errors.push(format!(
                        "Child '{}' of group '{}' does not point back at it",
                        child, node.id
                    )),
                    Some(_) => {}
                }
            }
            let options = InterfaceValidationOptions::scoped(self, &node.id);
            if let Err(e) = validate_group_interface(&group.interface, &options) {
                errors.extend(e.into_messages());
            }
            if group.port_map != GroupPortMap::from_interface(&group.interface) {
                errors.push(format!("Group '{}' has a port map out of step with its interface", node.id));
            }
        }

        errors
    }
}
