use crate::core::circuit::{Circuit, Node, NodeKind};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::ids::{FreshIds, IdGenerator};
use crate::core::types::{GateType, NodeId, Position};
use log::debug;

pub const SWITCH_SIZE: (f64, f64) = (60.0, 40.0);
pub const GATE_SIZE: (f64, f64) = (80.0, 60.0);
pub const LIGHT_SIZE: (f64, f64) = (40.0, 40.0);
pub const JUNCTION_SIZE: (f64, f64) = (12.0, 12.0);

/// Element a palette can place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTemplate {
    Switch { state: bool },
    Gate { gate_type: GateType, input_count: usize },
    Light,
}

impl NodeTemplate {
    /// A gate with its type's usual input count
    pub fn gate(gate_type: GateType) -> Self {
        NodeTemplate::Gate {
            gate_type,
            input_count: gate_type.default_input_count(),
        }
    }

    /// Create the node with fresh node and port ids
    pub fn instantiate(&self, ids: &mut dyn IdGenerator, position: Position) -> Node {
        let id = ids.node_id();
        match *self {
            NodeTemplate::Switch { state } => {
                let kind = NodeKind::Switch {
                    state,
                    output_port_id: ids.port_id(),
                };
                Node::new(id, position, SWITCH_SIZE.0, SWITCH_SIZE.1, kind)
            }
            NodeTemplate::Gate { gate_type, input_count } => {
                let input_count = match gate_type {
                    GateType::Not => 1,
                    _ => input_count.max(1),
                };
                let kind = NodeKind::Gate {
                    gate_type,
                    input_port_ids: (0..input_count).map(|_| ids.port_id()).collect(),
                    output_port_id: ids.port_id(),
                };
                Node::new(id, position, GATE_SIZE.0, GATE_SIZE.1, kind)
            }
            NodeTemplate::Light => {
                let kind = NodeKind::Light {
                    input_port_id: ids.port_id(),
                };
                Node::new(id, position, LIGHT_SIZE.0, LIGHT_SIZE.1, kind)
            }
        }
    }
}

/// Result of placing a node
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub circuit: Circuit,
    pub node_id: NodeId,
}

/// Place a new top-level node
pub fn add_node(
    circuit: &Circuit,
    ids: &mut dyn IdGenerator,
    template: NodeTemplate,
    position: Position,
) -> Placed {
    let node = template.instantiate(&mut FreshIds::new(circuit, ids), position);
    let node_id = node.id.clone();
    debug!("Placed {} '{}'", node.type_name(), node_id);

    let (mut nodes, wires) = circuit.clone().into_parts();
    nodes.push(node);
    Placed {
        circuit: Circuit::new(nodes, wires),
        node_id,
    }
}

/// Set a switch's state
pub fn set_switch(circuit: &Circuit, node_id: &NodeId, state: bool) -> CircuitResult<Circuit> {
    let (mut nodes, wires) = circuit.clone().into_parts();
    let node = nodes
        .iter_mut()
        .find(|n| &n.id == node_id)
        .ok_or_else(|| CircuitError::single(format!("Switch '{}' not found", node_id)))?;
    let type_name = node.type_name();
    match &mut node.kind {
        NodeKind::Switch { state: current, .. } => *current = state,
        _ => {
            return Err(CircuitError::single(format!(
                "Node '{}' is a {}, not a switch",
                node_id, type_name
            )))
        }
    }
    Ok(Circuit::new(nodes, wires))
}

/// Flip a switch
pub fn toggle_switch(circuit: &Circuit, node_id: &NodeId) -> CircuitResult<Circuit> {
    let current = match circuit.node(node_id).map(|n| &n.kind) {
        Some(NodeKind::Switch { state, .. }) => *state,
        Some(_) => return Err(CircuitError::single(format!("Node '{}' is not a switch", node_id))),
        None => return Err(CircuitError::single(format!("Switch '{}' not found", node_id))),
    };
    set_switch(circuit, node_id, !current)
}
