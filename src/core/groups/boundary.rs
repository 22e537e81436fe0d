use crate::core::circuit::Circuit;
use crate::core::types::{NodeId, PortId, PortKind};
use std::collections::HashSet;

/// A port the selection has to expose
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BoundaryPort {
    pub kind: PortKind,
    /// Port of a selected node the exposed port stands for
    pub internal_port: PortId,
}

/// Every node inside a selection: the selected nodes plus everything nested in selected groups
pub(crate) fn selection_scope(circuit: &Circuit, node_ids: &[NodeId]) -> HashSet<NodeId> {
    let mut inside: HashSet<NodeId> = node_ids.iter().cloned().collect();
    for id in node_ids {
        inside.extend(circuit.descendants(id));
    }
    inside
}

/// Derive the ports a selection must expose to keep its current wiring.
///
/// One scan of the wires: an incoming boundary wire yields one input per distinct outside
/// source port (first occurrence wins, so fan-out into the selection shares a port), an
/// outgoing boundary wire yields one output per distinct inside source port. Afterwards every
/// port of a selected node with no wire at all is exposed as well, so an unwired subcircuit can
/// still be grouped as a template.
pub(crate) fn derive_boundary_ports(circuit: &Circuit, node_ids: &[NodeId]) -> Vec<BoundaryPort> {
    let inside = selection_scope(circuit, node_ids);
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut seen_outside_sources = HashSet::new();
    let mut seen_inside_sources = HashSet::new();

    for wire in circuit.wires() {
        let source_inside = inside.contains(&wire.source_node);
        let target_inside = inside.contains(&wire.target_node);
        match (source_inside, target_inside) {
            (false, true) => {
                if seen_outside_sources.insert(&wire.source) {
                    inputs.push(BoundaryPort {
                        kind: PortKind::Input,
                        internal_port: wire.target.clone(),
                    });
                }
            }
            (true, false) => {
                if seen_inside_sources.insert(&wire.source) {
                    outputs.push(BoundaryPort {
                        kind: PortKind::Output,
                        internal_port: wire.source.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    for id in node_ids {
        let Some(node) = circuit.node(id) else {
            continue;
        };
        for port in node.ports() {
            if circuit.is_port_wired(&port.id) {
                continue;
            }
            let exposed = BoundaryPort {
                kind: port.kind,
                internal_port: port.id,
            };
            match exposed.kind {
                PortKind::Input => inputs.push(exposed),
                PortKind::Output => outputs.push(exposed),
            }
        }
    }

    inputs.extend(outputs);
    inputs
}
