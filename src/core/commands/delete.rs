use crate::core::circuit::{Circuit, GroupPortMap, Node};
use crate::core::types::{NodeId, PortId, WireId};
use log::debug;
use std::collections::HashSet;

/// Nodes and wires picked for deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub node_ids: Vec<NodeId>,
    pub wire_ids: Vec<WireId>,
}

impl Selection {
    pub fn nodes(node_ids: Vec<NodeId>) -> Self {
        Self {
            node_ids,
            wire_ids: Vec::new(),
        }
    }

    pub fn wires(wire_ids: Vec<WireId>) -> Self {
        Self {
            node_ids: Vec::new(),
            wire_ids,
        }
    }
}

/// What a deletion actually removed, in circuit order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletedItems {
    pub node_ids: Vec<NodeId>,
    pub wire_ids: Vec<WireId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deletion {
    pub circuit: Circuit,
    pub deleted: DeletedItems,
}

/// Delete a selection together with everything that cannot outlive it.
///
/// Selected groups take their transitive children with them, and every wire incident to a
/// removed node goes too. Unknown ids are ignored. A surviving group whose junction was removed
/// loses the exposed port anchored there, along with the wires on that port.
pub fn delete_selection(circuit: &Circuit, selection: &Selection) -> Deletion {
    let mut doomed: HashSet<NodeId> = HashSet::new();
    for id in &selection.node_ids {
        if circuit.has_node(id) {
            doomed.insert(id.clone());
            doomed.extend(circuit.descendants(id));
        }
    }

    let owned_by_doomed = |port: &PortId| {
        circuit
            .port_entry(port)
            .map_or(false, |entry| doomed.contains(&entry.node_id))
    };
    let mut pruned_ports: HashSet<PortId> = HashSet::new();
    for node in circuit.nodes() {
        if doomed.contains(&node.id) {
            continue;
        }
        if let Some(group) = node.as_group() {
            pruned_ports.extend(
                group
                    .interface
                    .exposed()
                    .filter(|p| owned_by_doomed(&p.maps_to_internal_port_id))
                    .map(|p| p.id.clone()),
            );
        }
    }

    let picked: HashSet<&WireId> = selection.wire_ids.iter().collect();
    let (kept_wires, removed_wires): (Vec<_>, Vec<_>) = circuit.wires().iter().cloned().partition(|w| {
        !(picked.contains(&w.id)
            || doomed.contains(&w.source_node)
            || doomed.contains(&w.target_node)
            || pruned_ports.contains(&w.source)
            || pruned_ports.contains(&w.target))
    });

    let mut deleted_nodes = Vec::new();
    let mut nodes: Vec<Node> = Vec::with_capacity(circuit.nodes().len());
    for node in circuit.nodes() {
        if doomed.contains(&node.id) {
            deleted_nodes.push(node.id.clone());
            continue;
        }
        let mut node = node.clone();
        if let Some(group) = node.as_group_mut() {
            group.child_node_ids.retain(|c| !doomed.contains(c));
            group.interface.inputs.retain(|p| !pruned_ports.contains(&p.id));
            group.interface.outputs.retain(|p| !pruned_ports.contains(&p.id));
            group.port_map = GroupPortMap::from_interface(&group.interface);
        }
        nodes.push(node);
    }

    let deleted = DeletedItems {
        node_ids: deleted_nodes,
        wire_ids: removed_wires.into_iter().map(|w| w.id).collect(),
    };
    debug!(
        "Deleted {} node(s) and {} wire(s)",
        deleted.node_ids.len(),
        deleted.wire_ids.len()
    );
    Deletion {
        circuit: Circuit::new(nodes, kept_wires),
        deleted,
    }
}
