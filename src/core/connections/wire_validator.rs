use crate::core::circuit::{Circuit, Wire};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::types::{NodeId, PortId, PortKind};

/// Centralized wire legality checks used by the command layer
pub struct WireValidator;

impl WireValidator {
    /// Validate that an endpoint node exists
    pub fn validate_node(circuit: &Circuit, node: &NodeId, role: &str) -> Result<(), String> {
        if circuit.has_node(node) {
            Ok(())
        } else {
            Err(format!("{} node '{}' not found", role, node))
        }
    }

    /// Validate that a port exists, belongs to `node` and has the expected direction.
    ///
    /// Returns every problem with the endpoint.
    pub fn validate_endpoint(
        circuit: &Circuit,
        node: &NodeId,
        port: &PortId,
        expected: PortKind,
        role: &str,
    ) -> Vec<String> {
        let mut errors = Vec::new();
        let Some(entry) = circuit.port_entry(port) else {
            errors.push(format!("{} port '{}' not found", role, port));
            return errors;
        };
        if &entry.node_id != node {
            errors.push(format!(
                "{} port '{}' belongs to node '{}', not '{}'",
                role, port, entry.node_id, node
            ));
        }
        if entry.kind != expected {
            errors.push(format!(
                "{} port '{}' is an {} port; expected an {} port",
                role, port, entry.kind, expected
            ));
        }
        errors
    }

    /// Check if an input port is already driven (prevents multiple drivers)
    pub fn check_input_port_collision(circuit: &Circuit, target: &PortId) -> Result<(), String> {
        match circuit.incoming_wire(target) {
            Some(existing) => Err(format!(
                "Input port '{}' is already connected by wire '{}'. Multiple drivers not allowed.",
                target, existing.id
            )),
            None => Ok(()),
        }
    }
}

/// Validate a candidate wire against a circuit, aggregating every violation
pub fn validate_wire(circuit: &Circuit, wire: &Wire) -> CircuitResult<Wire> {
    let mut errors = Vec::new();

    let source_known = WireValidator::validate_node(circuit, &wire.source_node, "Source")
        .map_err(|e| errors.push(e))
        .is_ok();
    let target_known = WireValidator::validate_node(circuit, &wire.target_node, "Target")
        .map_err(|e| errors.push(e))
        .is_ok();

    if source_known {
        errors.extend(WireValidator::validate_endpoint(
            circuit,
            &wire.source_node,
            &wire.source,
            PortKind::Output,
            "Source",
        ));
    }
    if target_known {
        errors.extend(WireValidator::validate_endpoint(
            circuit,
            &wire.target_node,
            &wire.target,
            PortKind::Input,
            "Target",
        ));
    }

    if wire.source_node == wire.target_node {
        errors.push(format!("Cannot connect node '{}' to itself", wire.source_node));
    }

    if let Err(e) = WireValidator::check_input_port_collision(circuit, &wire.target) {
        errors.push(e);
    }

    CircuitError::check(errors, wire.clone())
}
