use crate::core::circuit::{Circuit, GroupInterface, GroupPortMap};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::groups::{validate_group_interface, InterfaceValidationOptions};
use crate::core::types::{NodeId, WireId};
use log::debug;

/// Result of replacing a group's interface
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceUpdate {
    pub circuit: Circuit,
    /// Every wire that touched the group before the update
    pub disconnected_wire_ids: Vec<WireId>,
}

/// Replace a group's interface wholesale.
///
/// The external port-id space changes, so every wire on the group is removed. On a validation
/// failure nothing changes.
pub fn update_group_interface(
    circuit: &Circuit,
    group_id: &NodeId,
    interface: &GroupInterface,
) -> CircuitResult<InterfaceUpdate> {
    if circuit.group(group_id).is_none() {
        return Err(CircuitError::single(format!("Group '{}' not found", group_id)));
    }
    let options = InterfaceValidationOptions::scoped(circuit, group_id).require_port();
    let mut errors = validate_group_interface(interface, &options)
        .err()
        .map(CircuitError::into_messages)
        .unwrap_or_default();
    for port in interface.exposed() {
        if let Some(entry) = circuit.port_entry(&port.id) {
            if &entry.node_id != group_id {
                errors.push(format!(
                    "Exposed port id '{}' is already used by node '{}'",
                    port.id, entry.node_id
                ));
            }
        }
    }
    if !errors.is_empty() {
        return Err(CircuitError::new(errors));
    }

    let (mut nodes, mut wires) = circuit.clone().into_parts();
    let disconnected_wire_ids: Vec<WireId> = wires
        .iter()
        .filter(|w| w.touches_node(group_id))
        .map(|w| w.id.clone())
        .collect();
    wires.retain(|w| !w.touches_node(group_id));

    if let Some(group) = nodes
        .iter_mut()
        .find(|n| &n.id == group_id)
        .and_then(|n| n.as_group_mut())
    {
        group.interface = interface.clone();
        group.port_map = GroupPortMap::from_interface(interface);
    }

    debug!(
        "Updated interface of group '{}', {} wire(s) disconnected",
        group_id,
        disconnected_wire_ids.len()
    );
    Ok(InterfaceUpdate {
        circuit: Circuit::new(nodes, wires),
        disconnected_wire_ids,
    })
}
