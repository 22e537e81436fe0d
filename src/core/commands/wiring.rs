use crate::core::circuit::{Circuit, Wire};
use crate::core::connections::validate_wire;
use crate::core::errors::CircuitResult;
use crate::core::ids::{FreshIds, IdGenerator};
use crate::core::types::{NodeId, PortId, WireId};
use log::debug;

/// Endpoints of a wire to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub source_node: NodeId,
    pub source_port: PortId,
    pub target_node: NodeId,
    pub target_port: PortId,
}

impl ConnectRequest {
    pub fn new(
        source_node: impl Into<NodeId>,
        source_port: impl Into<PortId>,
        target_node: impl Into<NodeId>,
        target_port: impl Into<PortId>,
    ) -> Self {
        Self {
            source_node: source_node.into(),
            source_port: source_port.into(),
            target_node: target_node.into(),
            target_port: target_port.into(),
        }
    }
}

/// Validate and append a wire. The new wire is the last one in the returned circuit.
pub fn connect(circuit: &Circuit, ids: &mut dyn IdGenerator, request: &ConnectRequest) -> CircuitResult<Circuit> {
    let candidate = Wire::new(
        WireId::new(""),
        request.source_node.clone(),
        request.source_port.clone(),
        request.target_node.clone(),
        request.target_port.clone(),
    );
    let mut wire = validate_wire(circuit, &candidate)?;
    wire.id = FreshIds::new(circuit, ids).wire_id();

    debug!(
        "Connecting {}:{} -> {}:{} as '{}'",
        wire.source_node, wire.source, wire.target_node, wire.target, wire.id
    );
    let mut next = circuit.clone();
    next.push_wire(wire);
    Ok(next)
}

/// Remove one wire by id; unknown ids leave the circuit as it was
pub fn disconnect(circuit: &Circuit, wire_id: &WireId) -> Circuit {
    if circuit.wire(wire_id).is_none() {
        return circuit.clone();
    }
    let (nodes, mut wires) = circuit.clone().into_parts();
    wires.retain(|w| &w.id != wire_id);
    debug!("Disconnected wire '{}'", wire_id);
    Circuit::new(nodes, wires)
}
