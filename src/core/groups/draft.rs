use super::boundary::derive_boundary_ports;
use crate::core::circuit::{Circuit, ExposedPort, GroupInterface};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::ids::{FreshIds, IdGenerator};
use crate::core::types::{NodeId, PortKind};
use log::debug;

/// Propose a starting interface for grouping `node_ids`, from the current wiring.
///
/// Exposed ports get fresh ids and default names (`IN1`, `IN2`, ..., `OUT1`, ...). Each maps to
/// the internal port the boundary wire touches, which may belong to a node nested inside a
/// selected group. Group creation later moves the mapping onto junctions.
pub fn build_default_group_interface_draft(
    circuit: &Circuit,
    ids: &mut dyn IdGenerator,
    node_ids: &[NodeId],
) -> CircuitResult<GroupInterface> {
    check_selection(circuit, node_ids)?;
    let mut fresh = FreshIds::new(circuit, ids);
    let ids: &mut dyn IdGenerator = &mut fresh;

    let mut draft = GroupInterface::default();
    for boundary in derive_boundary_ports(circuit, node_ids) {
        match boundary.kind {
            PortKind::Input => {
                let name = format!("IN{}", draft.inputs.len() + 1);
                draft
                    .inputs
                    .push(ExposedPort::new(ids.port_id(), PortKind::Input, name, boundary.internal_port));
            }
            PortKind::Output => {
                let name = format!("OUT{}", draft.outputs.len() + 1);
                draft
                    .outputs
                    .push(ExposedPort::new(ids.port_id(), PortKind::Output, name, boundary.internal_port));
            }
        }
    }

    debug!(
        "Interface draft for {} node(s): {} input(s), {} output(s)",
        node_ids.len(),
        draft.inputs.len(),
        draft.outputs.len()
    );
    Ok(draft)
}

/// Reject an empty selection or one naming unknown nodes
pub(crate) fn check_selection(circuit: &Circuit, node_ids: &[NodeId]) -> CircuitResult<()> {
    if node_ids.is_empty() {
        return Err(CircuitError::single("Selection is empty"));
    }
    let errors = node_ids
        .iter()
        .filter(|id| !circuit.has_node(id))
        .map(|id| format!("Node '{}' not found", id))
        .collect();
    CircuitError::check(errors, ())
}
