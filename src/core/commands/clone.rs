use crate::core::circuit::{
    Circuit, ExposedPort, GroupData, GroupInterface, GroupPortMap, Node, NodeKind, Wire,
};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::ids::{FreshIds, IdGenerator};
use crate::core::types::{NodeId, PortId, Position};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Result of a group clone
#[derive(Debug, Clone, PartialEq)]
pub struct ClonedGroup {
    pub circuit: Circuit,
    pub group_id: NodeId,
}

/// Old-to-new id tables for one clone operation
struct Remap {
    nodes: HashMap<NodeId, NodeId>,
    ports: HashMap<PortId, PortId>,
}

impl Remap {
    fn node(&self, id: &NodeId) -> NodeId {
        self.nodes.get(id).cloned().unwrap_or_else(|| id.clone())
    }

    fn port(&self, id: &PortId) -> PortId {
        self.ports.get(id).cloned().unwrap_or_else(|| id.clone())
    }

    fn exposed(&self, ports: &[ExposedPort]) -> Vec<ExposedPort> {
        ports
            .iter()
            .map(|p| ExposedPort::new(self.port(&p.id), p.kind, p.name.clone(), self.port(&p.maps_to_internal_port_id)))
            .collect()
    }

    fn kind(&self, kind: &NodeKind) -> NodeKind {
        match kind {
            NodeKind::Switch { state, output_port_id } => NodeKind::Switch {
                state: *state,
                output_port_id: self.port(output_port_id),
            },
            NodeKind::Gate {
                gate_type,
                input_port_ids,
                output_port_id,
            } => NodeKind::Gate {
                gate_type: *gate_type,
                input_port_ids: input_port_ids.iter().map(|p| self.port(p)).collect(),
                output_port_id: self.port(output_port_id),
            },
            NodeKind::Light { input_port_id } => NodeKind::Light {
                input_port_id: self.port(input_port_id),
            },
            NodeKind::Junction {
                input_port_id,
                output_port_id,
            } => NodeKind::Junction {
                input_port_id: self.port(input_port_id),
                output_port_id: self.port(output_port_id),
            },
            NodeKind::Group(group) => {
                let interface = GroupInterface::new(
                    self.exposed(&group.interface.inputs),
                    self.exposed(&group.interface.outputs),
                );
                NodeKind::Group(GroupData {
                    label: group.label.clone(),
                    child_node_ids: group.child_node_ids.iter().map(|c| self.node(c)).collect(),
                    collapsed: group.collapsed,
                    port_map: GroupPortMap::from_interface(&interface),
                    interface,
                })
            }
        }
    }

    fn node_copy(&self, node: &Node, offset: Position) -> Node {
        Node {
            id: self.node(&node.id),
            position: node.position.offset(offset),
            width: node.width,
            height: node.height,
            parent_group_id: node.parent_group_id.as_ref().map(|p| self.node(p)),
            kind: self.kind(&node.kind),
        }
    }
}

/// Deep-copy a group with fresh node, port and wire ids, shifted by `offset`.
///
/// Every transitive child and every wire running wholly inside the group is copied; wires on the
/// group's external ports are not. The copy sits next to the original in the same parent.
pub fn clone_group(
    circuit: &Circuit,
    ids: &mut dyn IdGenerator,
    group_id: &NodeId,
    offset: Position,
) -> CircuitResult<ClonedGroup> {
    let group_node = circuit
        .node(group_id)
        .filter(|n| n.as_group().is_some())
        .ok_or_else(|| CircuitError::single(format!("Group '{}' not found", group_id)))?;
    let descendants = circuit.descendants(group_id);
    if descendants.is_empty() {
        return Err(CircuitError::single(format!("Group '{}' has no children to clone", group_id)));
    }

    let mut fresh = FreshIds::new(circuit, ids);
    let ids: &mut dyn IdGenerator = &mut fresh;

    let mut remap = Remap {
        nodes: HashMap::new(),
        ports: HashMap::new(),
    };
    for id in std::iter::once(group_id).chain(descendants.iter()) {
        remap.nodes.insert(id.clone(), ids.node_id());
        if let Some(node) = circuit.node(id) {
            for port in node.ports() {
                remap.ports.insert(port.id, ids.port_id());
            }
        }
    }

    let mut copies: Vec<Node> = descendants
        .iter()
        .filter_map(|id| circuit.node(id))
        .map(|n| remap.node_copy(n, offset))
        .collect();
    let clone = remap.node_copy(group_node, offset);
    let clone_id = clone.id.clone();
    copies.push(clone);

    let inside: HashSet<&NodeId> = descendants.iter().collect();
    let mut wires: Vec<Wire> = circuit.wires().to_vec();
    let internal: Vec<Wire> = circuit
        .wires()
        .iter()
        .filter(|w| inside.contains(&w.source_node) && inside.contains(&w.target_node))
        .map(|w| {
            Wire::new(
                ids.wire_id(),
                remap.node(&w.source_node),
                remap.port(&w.source),
                remap.node(&w.target_node),
                remap.port(&w.target),
            )
        })
        .collect();
    let internal_count = internal.len();
    wires.extend(internal);

    let mut nodes: Vec<Node> = circuit.nodes().to_vec();
    if let Some(parent) = &group_node.parent_group_id {
        if let Some(outer) = nodes
            .iter_mut()
            .find(|n| &n.id == parent)
            .and_then(Node::as_group_mut)
        {
            let at = outer
                .child_node_ids
                .iter()
                .position(|c| c == group_id)
                .map_or(outer.child_node_ids.len(), |p| p + 1);
            outer.child_node_ids.insert(at, clone_id.clone());
        }
    }
    nodes.extend(copies);

    debug!(
        "Cloned group '{}' as '{}' ({} node(s), {} internal wire(s))",
        group_id,
        clone_id,
        descendants.len(),
        internal_count
    );
    Ok(ClonedGroup {
        circuit: Circuit::new(nodes, wires),
        group_id: clone_id,
    })
}
