use crate::core::circuit::{Circuit, ExposedPort, GroupInterface};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::types::{NodeId, PortKind};
use std::collections::HashSet;

/// What to check beyond the structural rules
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceValidationOptions<'a> {
    /// With `group_id`, enables the junction mapping checks
    pub circuit: Option<&'a Circuit>,
    pub group_id: Option<&'a NodeId>,
    pub require_at_least_one_port: bool,
}

impl<'a> InterfaceValidationOptions<'a> {
    /// Structural checks only
    pub fn structural() -> Self {
        Self::default()
    }

    /// Structural checks plus junction mapping checks against a group in `circuit`
    pub fn scoped(circuit: &'a Circuit, group_id: &'a NodeId) -> Self {
        Self {
            circuit: Some(circuit),
            group_id: Some(group_id),
            require_at_least_one_port: false,
        }
    }

    pub fn require_port(mut self) -> Self {
        self.require_at_least_one_port = true;
        self
    }
}

/// Validate a proposed group interface, collecting every violation.
///
/// Structural rules always apply: non-empty id, name and mapping, a kind matching the list the
/// port sits in, unique exposed ids and no internal port exposed twice. When a circuit and group
/// are supplied, each exposed input must map to the output port of a junction inside that group
/// and each exposed output to the input port of such a junction. Only the junction layer is
/// addressable from outside a group.
pub fn validate_group_interface(
    interface: &GroupInterface,
    options: &InterfaceValidationOptions<'_>,
) -> CircuitResult<()> {
    let mut errors = Vec::new();

    if options.require_at_least_one_port && interface.is_empty() {
        errors.push("Interface must expose at least one port".to_string());
    }

    let mut ids = HashSet::new();
    let mut mapped = HashSet::new();
    for (list, expected, ports) in [
        ("inputs", PortKind::Input, &interface.inputs),
        ("outputs", PortKind::Output, &interface.outputs),
    ] {
        for (position, port) in ports.iter().enumerate() {
            if port.id.is_empty() {
                errors.push(format!("Exposed port #{} in {} has an empty id", position + 1, list));
            } else if !ids.insert(&port.id) {
                errors.push(format!("Duplicate exposed port id '{}'", port.id));
            }
            if port.name.trim().is_empty() {
                errors.push(format!("Exposed port '{}' has an empty name", port.id));
            }
            if port.kind != expected {
                errors.push(format!(
                    "Exposed port '{}' is listed in {} but has kind {}",
                    port.id, list, port.kind
                ));
            }
            if port.maps_to_internal_port_id.is_empty() {
                errors.push(format!("Exposed port '{}' has an empty internal mapping", port.id));
            } else if !mapped.insert(&port.maps_to_internal_port_id) {
                errors.push(format!(
                    "Internal port '{}' is exposed more than once",
                    port.maps_to_internal_port_id
                ));
            }
        }
    }

    if let (Some(circuit), Some(group_id)) = (options.circuit, options.group_id) {
        if circuit.group(group_id).is_none() {
            errors.push(format!("Group '{}' not found", group_id));
        } else {
            for port in &interface.inputs {
                check_junction_mapping(circuit, group_id, port, PortKind::Output, &mut errors);
            }
            for port in &interface.outputs {
                check_junction_mapping(circuit, group_id, port, PortKind::Input, &mut errors);
            }
        }
    }

    CircuitError::check(errors, ())
}

fn check_junction_mapping(
    circuit: &Circuit,
    group_id: &NodeId,
    port: &ExposedPort,
    junction_side: PortKind,
    errors: &mut Vec<String>,
) {
    if port.maps_to_internal_port_id.is_empty() {
        return;
    }
    let direction = match port.kind {
        PortKind::Input => "input",
        PortKind::Output => "output",
    };
    let Some(entry) = circuit.port_entry(&port.maps_to_internal_port_id) else {
        errors.push(format!(
            "Exposed {} '{}' maps to unknown port '{}'",
            direction, port.name, port.maps_to_internal_port_id
        ));
        return;
    };
    let Some(owner) = circuit.node(&entry.node_id) else {
        return;
    };
    if !owner.is_junction() {
        errors.push(format!(
            "Exposed {} '{}' must map to a junction {} port, but '{}' belongs to {} '{}'",
            direction, port.name, junction_side, port.maps_to_internal_port_id, owner.type_name(), owner.id
        ));
        return;
    }
    if entry.kind != junction_side {
        errors.push(format!(
            "Exposed {} '{}' must map to the {} port of junction '{}', not its {} port",
            direction, port.name, junction_side, owner.id, entry.kind
        ));
    }
    if owner.parent_group_id.as_ref() != Some(group_id) {
        errors.push(format!(
            "Exposed {} '{}' maps to junction '{}' which is not a child of group '{}'",
            direction, port.name, owner.id, group_id
        ));
    }
}
