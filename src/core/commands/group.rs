use super::palette::JUNCTION_SIZE;
use crate::core::circuit::{
    Circuit, ExposedPort, GroupData, GroupInterface, GroupPortMap, Node, NodeKind, Wire,
};
use crate::core::errors::{CircuitError, CircuitResult};
use crate::core::groups::boundary::selection_scope;
use crate::core::groups::{validate_group_interface, InterfaceValidationOptions};
use crate::core::ids::{FreshIds, IdGenerator};
use crate::core::types::{NodeId, PortId, PortKind, Position};
use log::{debug, warn};
use std::collections::HashSet;

/// Space between a group's border and its outermost children
pub const GROUP_PADDING: f64 = 20.0;
/// Vertical and horizontal gap around generated junctions
pub const JUNCTION_GAP: f64 = 8.0;

/// Parameters of a group creation
#[derive(Debug, Clone, PartialEq)]
pub struct CreateGroupRequest {
    pub node_ids: Vec<NodeId>,
    pub label: String,
    pub collapsed: bool,
    /// Exposed ports mapping onto ports of the selected nodes, usually from
    /// [`build_default_group_interface_draft`](crate::core::groups::build_default_group_interface_draft)
    pub interface_draft: GroupInterface,
}

impl CreateGroupRequest {
    pub fn new(node_ids: Vec<NodeId>, label: impl Into<String>, interface_draft: GroupInterface) -> Self {
        Self {
            node_ids,
            label: label.into(),
            collapsed: false,
            interface_draft,
        }
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }
}

/// Result of a group creation
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedGroup {
    pub circuit: Circuit,
    pub group_id: NodeId,
}

/// An exposed port together with the junction generated for it
struct Route<'a> {
    exposed: &'a ExposedPort,
    junction: Node,
    /// Input routes: internal ports fed by the junction
    targets: Vec<(NodeId, PortId)>,
    /// Input routes: outside port driving the group port
    external_source: Option<PortId>,
}

impl Route<'_> {
    fn junction_ports(&self) -> (PortId, PortId) {
        match &self.junction.kind {
            NodeKind::Junction {
                input_port_id,
                output_port_id,
            } => (input_port_id.clone(), output_port_id.clone()),
            _ => unreachable!("routes always carry a junction"),
        }
    }
}

fn junction(ids: &mut dyn IdGenerator, group_id: &NodeId, position: Position) -> Node {
    let kind = NodeKind::Junction {
        input_port_id: ids.port_id(),
        output_port_id: ids.port_id(),
    };
    let mut node = Node::new(ids.node_id(), position, JUNCTION_SIZE.0, JUNCTION_SIZE.1, kind);
    node.parent_group_id = Some(group_id.clone());
    node
}

/// Smallest box holding every node, as `(top-left, bottom-right)`
pub(crate) fn bounding_box<'a>(nodes: impl Iterator<Item = &'a Node>) -> Option<(Position, Position)> {
    nodes.fold(None, |acc, node| {
        let far = node.far_corner();
        Some(match acc {
            None => (node.position, far),
            Some((min, max)) => (
                Position::new(min.x.min(node.position.x), min.y.min(node.position.y)),
                Position::new(max.x.max(far.x), max.y.max(far.y)),
            ),
        })
    })
}

fn dedup_ids(ids: &[NodeId]) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}

/// Check the request before anything is allocated
fn check_request(circuit: &Circuit, request: &CreateGroupRequest, selected: &[NodeId]) -> CircuitResult<()> {
    let mut errors = Vec::new();
    if selected.is_empty() {
        errors.push("Cannot create a group from an empty selection".to_string());
    }
    for id in selected {
        if !circuit.has_node(id) {
            errors.push(format!("Node '{}' not found", id));
        }
    }
    if request.interface_draft.is_empty() {
        errors.push("Interface draft exposes no ports".to_string());
    }
    if let Err(e) = validate_group_interface(&request.interface_draft, &InterfaceValidationOptions::structural()) {
        errors.extend(e.into_messages());
    }
    if !errors.is_empty() {
        return Err(CircuitError::new(errors));
    }

    let parents: HashSet<Option<&NodeId>> = selected
        .iter()
        .filter_map(|id| circuit.node(id))
        .map(|n| n.parent_group_id.as_ref())
        .collect();
    if parents.len() > 1 {
        errors.push("Selected nodes belong to different groups".to_string());
    }
    for node in selected.iter().filter_map(|id| circuit.node(id)).filter(|n| n.is_junction()) {
        let Some(parent) = node.parent_group_id.as_ref() else {
            continue;
        };
        let anchored = circuit
            .group(parent)
            .map_or(false, |g| g.interface.exposed().any(|p| node.owns_port(&p.maps_to_internal_port_id)));
        if anchored {
            errors.push(format!(
                "Junction '{}' anchors an exposed port of group '{}' and cannot be moved into a new group",
                node.id, parent
            ));
        }
    }

    // mappings may reach into groups nested in the selection
    let inside = selection_scope(circuit, selected);
    for port in request.interface_draft.exposed() {
        if circuit.port_entry(&port.id).is_some() {
            errors.push(format!("Exposed port id '{}' is already used by another port", port.id));
        }
        let Some(entry) = circuit.port_entry(&port.maps_to_internal_port_id) else {
            errors.push(format!(
                "Exposed port '{}' maps to unknown port '{}'",
                port.name, port.maps_to_internal_port_id
            ));
            continue;
        };
        if !inside.contains(&entry.node_id) {
            errors.push(format!(
                "Exposed port '{}' maps to port '{}' outside the selection",
                port.name, port.maps_to_internal_port_id
            ));
        }
        if entry.kind != port.kind {
            errors.push(format!(
                "Exposed {} '{}' maps to {} port '{}'",
                port.kind, port.name, entry.kind, port.maps_to_internal_port_id
            ));
        }
        if port.kind == PortKind::Input {
            if let Some(driver) = circuit.incoming_wire(&port.maps_to_internal_port_id) {
                if inside.contains(&driver.source_node) {
                    errors.push(format!(
                        "Exposed input '{}' maps to port '{}' which is already driven from inside the selection",
                        port.name, port.maps_to_internal_port_id
                    ));
                }
            }
        }
    }
    CircuitError::check(errors, ())
}

/// Wrap the selected nodes in a new group node.
///
/// One junction is generated per exposed port and the interface is remapped onto it: exposed
/// inputs onto the junction's output, exposed outputs onto its input. Wires crossing the
/// selection boundary are redirected to the group's external ports, with fan-out from one
/// outside source sharing a single external wire.
pub fn create_group(
    circuit: &Circuit,
    ids: &mut dyn IdGenerator,
    request: &CreateGroupRequest,
) -> CircuitResult<CreatedGroup> {
    let selected = dedup_ids(&request.node_ids);
    check_request(circuit, request, &selected)?;
    let mut fresh = FreshIds::new(circuit, ids);
    let ids: &mut dyn IdGenerator = &mut fresh;

    let group_id = ids.node_id();
    let inside = selection_scope(circuit, &selected);
    let parent = circuit
        .node(&selected[0])
        .and_then(|n| n.parent_group_id.clone());
    let (min, max) = bounding_box(selected.iter().filter_map(|id| circuit.node(id)))
        .unwrap_or_default();

    let step = JUNCTION_SIZE.1 + JUNCTION_GAP;
    let mut inputs: Vec<Route> = Vec::new();
    for (i, exposed) in request.interface_draft.inputs.iter().enumerate() {
        let position = Position::new(min.x - JUNCTION_SIZE.0 - JUNCTION_GAP, min.y + i as f64 * step);
        let owner = owner_of(circuit, &exposed.maps_to_internal_port_id);
        inputs.push(Route {
            exposed,
            junction: junction(ids, &group_id, position),
            targets: vec![(owner, exposed.maps_to_internal_port_id.clone())],
            external_source: None,
        });
    }
    let mut outputs: Vec<Route> = Vec::new();
    for (i, exposed) in request.interface_draft.outputs.iter().enumerate() {
        let position = Position::new(max.x + JUNCTION_GAP, min.y + i as f64 * step);
        outputs.push(Route {
            exposed,
            junction: junction(ids, &group_id, position),
            targets: Vec::new(),
            external_source: None,
        });
    }

    let mut errors = Vec::new();
    let mut wires = Vec::with_capacity(circuit.wires().len());
    for wire in circuit.wires() {
        let source_inside = inside.contains(&wire.source_node);
        let target_inside = inside.contains(&wire.target_node);
        match (source_inside, target_inside) {
            (false, true) => {
                let found = inputs
                    .iter()
                    .position(|r| r.exposed.maps_to_internal_port_id == wire.target)
                    .or_else(|| {
                        inputs.iter().position(|r| {
                            circuit
                                .incoming_wire(&r.exposed.maps_to_internal_port_id)
                                .map_or(false, |driver| driver.source == wire.source)
                        })
                    });
                let Some(i) = found else {
                    errors.push(format!(
                        "Wire '{}' into port '{}' is not covered by any exposed input",
                        wire.id, wire.target
                    ));
                    continue;
                };
                let route = &mut inputs[i];
                let target = (wire.target_node.clone(), wire.target.clone());
                if !route.targets.contains(&target) {
                    route.targets.push(target);
                }
                match route.external_source.clone() {
                    None => {
                        route.external_source = Some(wire.source.clone());
                        wires.push(Wire::new(
                            wire.id.clone(),
                            wire.source_node.clone(),
                            wire.source.clone(),
                            group_id.clone(),
                            route.exposed.id.clone(),
                        ));
                    }
                    Some(existing) if existing != wire.source => errors.push(format!(
                        "Exposed input '{}' would be driven by both '{}' and '{}'",
                        route.exposed.name, existing, wire.source
                    )),
                    Some(_) => debug!("Collapsed fan-out wire '{}' into group port '{}'", wire.id, route.exposed.id),
                }
            }
            (true, false) => {
                let Some(route) = outputs
                    .iter()
                    .find(|r| r.exposed.maps_to_internal_port_id == wire.source)
                else {
                    errors.push(format!(
                        "Wire '{}' from port '{}' is not covered by any exposed output",
                        wire.id, wire.source
                    ));
                    continue;
                };
                wires.push(Wire::new(
                    wire.id.clone(),
                    group_id.clone(),
                    route.exposed.id.clone(),
                    wire.target_node.clone(),
                    wire.target.clone(),
                ));
            }
            _ => wires.push(wire.clone()),
        }
    }
    if !errors.is_empty() {
        return Err(CircuitError::new(errors));
    }

    let mut interface = GroupInterface::default();
    for route in &inputs {
        let (_, junction_out) = route.junction_ports();
        for (node, port) in &route.targets {
            wires.push(Wire::new(
                ids.wire_id(),
                route.junction.id.clone(),
                junction_out.clone(),
                node.clone(),
                port.clone(),
            ));
        }
        interface.inputs.push(remapped(route.exposed, junction_out));
    }
    for route in &outputs {
        let (junction_in, _) = route.junction_ports();
        let owner = owner_of(circuit, &route.exposed.maps_to_internal_port_id);
        wires.push(Wire::new(
            ids.wire_id(),
            owner,
            route.exposed.maps_to_internal_port_id.clone(),
            route.junction.id.clone(),
            junction_in.clone(),
        ));
        interface.outputs.push(remapped(route.exposed, junction_in));
    }

    let junctions: Vec<Node> = inputs
        .into_iter()
        .chain(outputs)
        .map(|r| r.junction)
        .collect();
    let mut child_node_ids = selected.clone();
    child_node_ids.extend(junctions.iter().map(|j| j.id.clone()));

    let (min, max) = bounding_box(
        selected
            .iter()
            .filter_map(|id| circuit.node(id))
            .chain(junctions.iter()),
    )
    .unwrap_or_default();
    let port_map = GroupPortMap::from_interface(&interface);
    let mut group_node = Node::new(
        group_id.clone(),
        Position::new(min.x - GROUP_PADDING, min.y - GROUP_PADDING),
        (max.x - min.x) + 2.0 * GROUP_PADDING,
        (max.y - min.y) + 2.0 * GROUP_PADDING,
        NodeKind::Group(GroupData {
            label: request.label.clone(),
            child_node_ids,
            collapsed: request.collapsed,
            interface,
            port_map,
        }),
    );
    group_node.parent_group_id = parent.clone();

    let selected_set: HashSet<&NodeId> = selected.iter().collect();
    let mut nodes: Vec<Node> = circuit.nodes().to_vec();
    for node in nodes.iter_mut() {
        if selected_set.contains(&node.id) {
            node.parent_group_id = Some(group_id.clone());
        }
        if Some(&node.id) == parent.as_ref() {
            if let Some(outer) = node.as_group_mut() {
                replace_children(&mut outer.child_node_ids, &selected_set, &[group_id.clone()]);
            }
        }
    }
    nodes.extend(junctions);
    nodes.push(group_node);

    debug!(
        "Created group '{}' ({}) over {} node(s)",
        group_id,
        request.label,
        selected.len()
    );
    Ok(CreatedGroup {
        circuit: Circuit::new(nodes, wires),
        group_id,
    })
}

fn owner_of(circuit: &Circuit, port: &PortId) -> NodeId {
    circuit
        .port_entry(port)
        .map(|entry| entry.node_id.clone())
        .unwrap_or_else(|| NodeId::new(""))
}

fn remapped(exposed: &ExposedPort, internal: PortId) -> ExposedPort {
    ExposedPort::new(exposed.id.clone(), exposed.kind, exposed.name.clone(), internal)
}

/// Replace the ids in `removed` with `added`, at the position of the first removed id
pub(crate) fn replace_children(children: &mut Vec<NodeId>, removed: &HashSet<&NodeId>, added: &[NodeId]) {
    let at = children
        .iter()
        .position(|c| removed.contains(c))
        .unwrap_or(children.len());
    children.retain(|c| !removed.contains(c));
    for (offset, id) in added.iter().enumerate() {
        children.insert(at + offset, id.clone());
    }
}

/// Dissolve a group: its children move to the group's parent and wires through the group
/// reconnect straight to the nodes behind its junctions.
///
/// An unknown id or a node that is not a group is reported as an error instead of being
/// ignored, so a stale selection is visible to the caller. The input circuit is never
/// modified, so treating the error as a no-op leaves the document exactly as it was.
pub fn ungroup(circuit: &Circuit, group_id: &NodeId) -> CircuitResult<Circuit> {
    let group_node = circuit
        .node(group_id)
        .ok_or_else(|| CircuitError::single(format!("Group '{}' not found", group_id)))?;
    let group = group_node
        .as_group()
        .ok_or_else(|| CircuitError::single(format!("Node '{}' is not a group", group_id)))?;
    let parent = group_node.parent_group_id.clone();

    let children: Vec<&Node> = group
        .child_node_ids
        .iter()
        .filter_map(|id| circuit.node(id))
        .collect();
    let junctions: Vec<&Node> = children.iter().copied().filter(|n| n.is_junction()).collect();

    // Reattach wires on the group's ports to the junction counterpart behind each port.
    let mut driven: HashSet<PortId> = circuit
        .wires()
        .iter()
        .filter(|w| &w.target_node != group_id)
        .map(|w| w.target.clone())
        .collect();
    let mut wires = Vec::with_capacity(circuit.wires().len());
    for wire in circuit.wires() {
        if &wire.target_node == group_id {
            match resolve_inner(circuit, group.port_map.inputs.get(&wire.target), PortKind::Input) {
                Some((node, port)) if driven.insert(port.clone()) => {
                    let mut w = wire.clone();
                    w.target_node = node;
                    w.target = port;
                    wires.push(w);
                }
                _ => warn!("Dropping wire '{}': group input '{}' has no free internal port", wire.id, wire.target),
            }
        } else if &wire.source_node == group_id {
            match resolve_inner(circuit, group.port_map.outputs.get(&wire.source), PortKind::Output) {
                Some((node, port)) => {
                    let mut w = wire.clone();
                    w.source_node = node;
                    w.source = port;
                    wires.push(w);
                }
                None => warn!("Dropping wire '{}': group output '{}' is unmapped", wire.id, wire.source),
            }
        } else {
            wires.push(wire.clone());
        }
    }

    for junction in &junctions {
        let Some((junction_in, junction_out)) = junction.junction_ports() else {
            continue;
        };
        let driver = wires.iter().find(|w| &w.target == junction_in).cloned();
        let fed: Vec<Wire> = wires
            .iter()
            .filter(|w| &w.source == junction_out)
            .cloned()
            .collect();
        wires.retain(|w| !w.touches_node(&junction.id));
        let Some(driver) = driver else {
            continue;
        };
        for out in fed {
            if driver.source_node == out.target_node {
                warn!("Skipping wire '{}': it would loop node '{}' onto itself", out.id, out.target_node);
                continue;
            }
            wires.push(Wire::new(
                out.id,
                driver.source_node.clone(),
                driver.source.clone(),
                out.target_node,
                out.target,
            ));
        }
    }

    let junction_ids: HashSet<&NodeId> = junctions.iter().map(|j| &j.id).collect();
    let survivors: Vec<NodeId> = children
        .iter()
        .filter(|c| !c.is_junction())
        .map(|c| c.id.clone())
        .collect();
    let survivor_set: HashSet<&NodeId> = survivors.iter().collect();
    let removed_group: HashSet<&NodeId> = [group_id].into_iter().collect();

    let mut nodes = Vec::with_capacity(circuit.nodes().len());
    for node in circuit.nodes() {
        if &node.id == group_id || junction_ids.contains(&node.id) {
            continue;
        }
        let mut node = node.clone();
        if survivor_set.contains(&node.id) {
            node.parent_group_id = parent.clone();
        }
        if Some(&node.id) == parent.as_ref() {
            if let Some(outer) = node.as_group_mut() {
                replace_children(&mut outer.child_node_ids, &removed_group, &survivors);
            }
        }
        nodes.push(node);
    }

    debug!(
        "Ungrouped '{}': {} child node(s) released, {} junction(s) dissolved",
        group_id,
        survivors.len(),
        junctions.len()
    );
    Ok(Circuit::new(nodes, wires))
}

/// Internal endpoint behind a group port.
///
/// For a group input (`side == Input`) the mapped junction output resolves to that junction's
/// input; for a group output the mapped junction input resolves to the junction's output.
/// A mapping that points straight at a port of the right direction is used as is.
fn resolve_inner(circuit: &Circuit, mapped: Option<&PortId>, side: PortKind) -> Option<(NodeId, PortId)> {
    let mapped = mapped?;
    let entry = circuit.port_entry(mapped)?;
    let owner = circuit.node(&entry.node_id)?;
    if let Some((junction_in, junction_out)) = owner.junction_ports() {
        return match (side, entry.kind) {
            (PortKind::Input, PortKind::Output) => Some((owner.id.clone(), junction_in.clone())),
            (PortKind::Output, PortKind::Input) => Some((owner.id.clone(), junction_out.clone())),
            _ => Some((owner.id.clone(), mapped.clone())),
        };
    }
    (entry.kind == side).then(|| (owner.id.clone(), mapped.clone()))
}
