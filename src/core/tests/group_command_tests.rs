#[cfg(test)]
mod tests {
    use super::super::{and_bench, Bench};
    use crate::core::circuit::Circuit;
    use crate::core::commands::{clone_group, connect, create_group, ungroup, ConnectRequest, CreateGroupRequest};
    use crate::core::execution::simulate;
    use crate::core::groups::build_default_group_interface_draft;
    use crate::core::types::{GateType, NodeId, PortId, Position};
    use std::collections::BTreeSet;

    /// Group `nodes` with the default draft and return the group id
    fn group(bench: &mut Bench, nodes: &[NodeId], label: &str) -> NodeId {
        let draft = build_default_group_interface_draft(&bench.circuit, &mut bench.ids, nodes).unwrap();
        let request = CreateGroupRequest::new(nodes.to_vec(), label, draft);
        let created = create_group(&bench.circuit, &mut bench.ids, &request).unwrap();
        bench.circuit = created.circuit;
        created.group_id
    }

    fn pairs(circuit: &Circuit) -> BTreeSet<(PortId, PortId)> {
        circuit
            .wires()
            .iter()
            .map(|w| (w.source.clone(), w.target.clone()))
            .collect()
    }

    fn exposed(circuit: &Circuit, group_id: &NodeId, name: &str) -> PortId {
        circuit
            .group(group_id)
            .and_then(|g| g.interface.find_by_name(name))
            .map(|p| p.id.clone())
            .expect("exposed port exists")
    }

    #[test]
    fn test_create_group_builds_junction_layer() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(true, true);
        let group_id = group(&mut bench, &[and.clone()], "AND box");
        let circuit = &bench.circuit;

        let data = circuit.group(&group_id).unwrap();
        assert_eq!(data.label, "AND box");
        assert_eq!(data.interface.inputs.len(), 2);
        assert_eq!(data.interface.outputs.len(), 1);
        assert_eq!(data.child_node_ids[0], and);
        assert_eq!(data.child_node_ids.len(), 4, "gate plus one junction per exposed port");

        for port in data.interface.exposed() {
            let entry = circuit.port_entry(&port.maps_to_internal_port_id).unwrap();
            let owner = circuit.node(&entry.node_id).unwrap();
            assert!(owner.is_junction(), "'{}' should be anchored on a junction", port.name);
            assert_eq!(owner.parent_group_id.as_ref(), Some(&group_id));
        }
        assert_eq!(circuit.node(&and).unwrap().parent_group_id.as_ref(), Some(&group_id));
        assert_eq!(circuit.nodes().len(), 8);
        assert_eq!(circuit.wires().len(), 6);
        assert!(circuit.integrity_violations().is_empty(), "{:?}", circuit.integrity_violations());
    }

    #[test]
    fn test_group_box_encloses_children() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(false, false);
        let group_id = group(&mut bench, &[and.clone()], "g");
        let circuit = &bench.circuit;
        let node = circuit.node(&group_id).unwrap();

        for child in &circuit.group(&group_id).unwrap().child_node_ids {
            let child = circuit.node(child).unwrap();
            assert!(child.position.x >= node.position.x);
            assert!(child.position.y >= node.position.y);
            assert!(child.far_corner().x <= node.far_corner().x);
            assert!(child.far_corner().y <= node.far_corner().y);
        }
    }

    #[test]
    fn test_grouped_circuit_simulates_like_original() {
        for (a, b) in [(false, false), (true, false), (false, true), (true, true)] {
            let (mut bench, _sa, _sb, and, light) = and_bench(a, b);
            let flat = simulate(&bench.circuit);
            group(&mut bench, &[and], "AND");
            let grouped = simulate(&bench.circuit);

            assert!(grouped.converged);
            assert_eq!(grouped.light(&light), flat.light(&light), "inputs ({}, {})", a, b);
            assert_eq!(grouped.light(&light), Some(a && b));
        }
    }

    #[test]
    fn test_group_then_ungroup_restores_connectivity() {
        let (mut bench, ..) = and_bench(true, false);
        let original = bench.circuit.clone();
        let and = original.nodes()[2].id.clone();

        let group_id = group(&mut bench, &[and], "AND");
        let restored = ungroup(&bench.circuit, &group_id).unwrap();

        assert_eq!(restored.nodes(), original.nodes());
        assert_eq!(pairs(&restored), pairs(&original));
        assert!(restored.integrity_violations().is_empty());
    }

    #[test]
    fn test_fan_out_into_group_shares_one_external_wire() {
        let mut bench = Bench::new();
        let switch = bench.switch(false, 0.0, 0.0);
        let g1 = bench.gate(GateType::Not, 100.0, 0.0);
        let g2 = bench.gate(GateType::Not, 100.0, 80.0);
        let l1 = bench.light(200.0, 0.0);
        let l2 = bench.light(200.0, 80.0);
        let first = bench.wire(&switch, &g1, 0);
        bench.wire(&switch, &g2, 0);
        bench.wire(&g1, &l1, 0);
        bench.wire(&g2, &l2, 0);
        let original = bench.circuit.clone();

        let group_id = group(&mut bench, &[g1.clone(), g2.clone()], "pair");
        let circuit = &bench.circuit;
        let data = circuit.group(&group_id).unwrap();
        assert_eq!(data.interface.inputs.len(), 1);
        assert_eq!(data.interface.outputs.len(), 2);

        let into_group: Vec<_> = circuit.wires().iter().filter(|w| w.target_node == group_id).collect();
        assert_eq!(into_group.len(), 1);
        assert_eq!(into_group[0].id, first, "the first crossing wire keeps its id");

        let result = simulate(circuit);
        assert_eq!(result.light(&l1), Some(true));
        assert_eq!(result.light(&l2), Some(true));

        let restored = ungroup(circuit, &group_id).unwrap();
        assert_eq!(pairs(&restored), pairs(&original));
    }

    #[test]
    fn test_draft_must_cover_boundary_wires() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(true, true);
        let mut draft = build_default_group_interface_draft(&bench.circuit, &mut bench.ids, &[and.clone()]).unwrap();
        draft.inputs.truncate(1);

        let request = CreateGroupRequest::new(vec![and], "partial", draft);
        let err = create_group(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("not covered by any exposed input"), "{:?}", err.messages());
    }

    #[test]
    fn test_create_group_rejects_bad_requests() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(true, true);
        let draft = build_default_group_interface_draft(&bench.circuit, &mut bench.ids, &[and.clone()]).unwrap();

        let empty = CreateGroupRequest::new(Vec::new(), "none", draft.clone());
        let err = create_group(&bench.circuit, &mut bench.ids, &empty).unwrap_err();
        assert!(err.mentions("empty selection"));

        let ghost = CreateGroupRequest::new(vec![NodeId::new("ghost")], "ghost", draft);
        let err = create_group(&bench.circuit, &mut bench.ids, &ghost).unwrap_err();
        assert!(err.mentions("Node 'ghost' not found"));

        let no_ports = CreateGroupRequest::new(vec![and], "bare", Default::default());
        let err = create_group(&bench.circuit, &mut bench.ids, &no_ports).unwrap_err();
        assert!(err.mentions("exposes no ports"));
    }

    #[test]
    fn test_selection_must_share_parent() {
        let mut bench = Bench::new();
        let inner = bench.gate(GateType::Not, 0.0, 0.0);
        let outer = bench.gate(GateType::Not, 200.0, 0.0);
        group(&mut bench, &[inner.clone()], "inner");

        let nodes = vec![inner, outer];
        let draft = build_default_group_interface_draft(&bench.circuit, &mut bench.ids, &nodes).unwrap();
        let request = CreateGroupRequest::new(nodes, "mixed", draft);
        let err = create_group(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("different groups"));
    }

    #[test]
    fn test_nested_groups_simulate_and_ungroup_into_parent() {
        let (mut bench, _sa, _sb, and, light) = and_bench(true, true);
        let inner = group(&mut bench, &[and.clone()], "inner");
        let outer = group(&mut bench, &[inner.clone()], "outer");

        assert_eq!(bench.circuit.node(&inner).unwrap().parent_group_id.as_ref(), Some(&outer));
        assert!(bench.circuit.descendants(&outer).contains(&and));
        assert!(bench.circuit.integrity_violations().is_empty(), "{:?}", bench.circuit.integrity_violations());
        assert_eq!(simulate(&bench.circuit).light(&light), Some(true));

        let flattened = ungroup(&bench.circuit, &inner).unwrap();
        assert_eq!(flattened.node(&and).unwrap().parent_group_id.as_ref(), Some(&outer));
        assert!(flattened.group(&outer).unwrap().child_node_ids.contains(&and));
        assert!(!flattened.has_node(&inner));
        assert!(flattened.integrity_violations().is_empty(), "{:?}", flattened.integrity_violations());
        assert_eq!(simulate(&flattened).light(&light), Some(true));
    }

    #[test]
    fn test_ungroup_rejects_non_groups() {
        let (bench, _sa, _sb, and, _light) = and_bench(false, false);

        let err = ungroup(&bench.circuit, &NodeId::new("ghost")).unwrap_err();
        assert_eq!(err.messages(), ["Group 'ghost' not found".to_string()]);

        let err = ungroup(&bench.circuit, &and).unwrap_err();
        assert!(err.mentions("is not a group"));
    }

    #[test]
    fn test_clone_group_copies_with_fresh_ids() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(true, true);
        let group_id = group(&mut bench, &[and], "AND");
        let before = bench.circuit.clone();

        let cloned = clone_group(&before, &mut bench.ids, &group_id, Position::new(0.0, 200.0)).unwrap();
        let circuit = &cloned.circuit;

        assert_ne!(cloned.group_id, group_id);
        assert_eq!(circuit.nodes().len(), before.nodes().len() + 5);
        assert_eq!(circuit.wires().len(), before.wires().len() + 3, "only internal wires are copied");
        assert!(circuit.integrity_violations().is_empty(), "{:?}", circuit.integrity_violations());

        let original = before.node(&group_id).unwrap();
        let copy = circuit.node(&cloned.group_id).unwrap();
        assert_eq!(copy.position, original.position.offset(Position::new(0.0, 200.0)));
        assert_eq!(copy.as_group().unwrap().label, "AND");

        let copied_children = circuit.descendants(&cloned.group_id);
        assert_eq!(copied_children.len(), 4);
        for child in &copied_children {
            assert!(!before.has_node(child), "child '{}' reuses an existing id", child);
        }
        assert!(!circuit.wires().iter().any(|w| w.touches_node(&cloned.group_id)));
    }

    #[test]
    fn test_clone_group_requires_a_group() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(true, true);
        let err = clone_group(&bench.circuit, &mut bench.ids, &and, Position::default()).unwrap_err();
        assert!(err.mentions("not found"));
    }

    #[test]
    fn test_group_input_keeps_outside_driver() {
        let (mut bench, sa, _sb, and, _light) = and_bench(false, false);
        let group_id = group(&mut bench, &[and], "AND");
        let in1 = exposed(&bench.circuit, &group_id, "IN1");

        // IN1 is already driven by sa
        let driver = bench.circuit.incoming_wire(&in1).unwrap();
        assert_eq!(driver.source_node, sa);
    }

    #[test]
    fn test_anchoring_junction_cannot_leave_its_group() {
        let (mut bench, _sa, _sb, and, _light) = and_bench(true, true);
        let outer = group(&mut bench, &[and.clone()], "outer");
        let data = bench.circuit.group(&outer).unwrap();
        let anchor = &data.interface.find_by_name("IN1").unwrap().maps_to_internal_port_id;
        let junction = bench.circuit.port_entry(anchor).unwrap().node_id.clone();
        let before = bench.circuit.clone();

        let nodes = vec![and, junction.clone()];
        let draft = build_default_group_interface_draft(&bench.circuit, &mut bench.ids, &nodes).unwrap();
        let request = CreateGroupRequest::new(nodes, "steal", draft);
        let err = create_group(&bench.circuit, &mut bench.ids, &request).unwrap_err();

        let expected = format!(
            "Junction '{}' anchors an exposed port of group '{}' and cannot be moved into a new group",
            junction, outer
        );
        assert!(err.messages().contains(&expected), "{:?}", err.messages());
        assert_eq!(bench.circuit, before);
    }

    #[test]
    fn test_draft_may_map_into_nested_group() {
        let mut bench = Bench::new();
        let switch = bench.switch(true, 0.0, 0.0);
        let or = bench.gate(GateType::Or, 120.0, 0.0);
        let light = bench.light(300.0, 0.0);

        // inner exposes only the first OR input
        let mut draft = build_default_group_interface_draft(&bench.circuit, &mut bench.ids, &[or.clone()]).unwrap();
        draft.inputs.truncate(1);
        let created = create_group(&bench.circuit, &mut bench.ids, &CreateGroupRequest::new(vec![or.clone()], "inner", draft)).unwrap();
        bench.circuit = created.circuit;
        let inner = created.group_id;

        // the second input is driven straight across the group boundary
        bench.wire(&switch, &or, 1);
        let out1 = exposed(&bench.circuit, &inner, "OUT1");
        let request = ConnectRequest::new(inner.clone(), out1, light.clone(), bench.input(&light, 0));
        bench.circuit = connect(&bench.circuit, &mut bench.ids, &request).unwrap();
        let crossing = (bench.output(&switch), bench.input(&or, 1));

        let outer = group(&mut bench, &[inner], "outer");
        let circuit = &bench.circuit;
        let mapped = exposed(circuit, &outer, "IN1");
        assert_eq!(circuit.incoming_wire(&mapped).unwrap().source_node, switch);
        assert!(circuit.integrity_violations().is_empty(), "{:?}", circuit.integrity_violations());
        assert_eq!(simulate(circuit).light(&light), Some(true));

        let restored = ungroup(circuit, &outer).unwrap();
        assert!(pairs(&restored).contains(&crossing));
        assert!(restored.integrity_violations().is_empty(), "{:?}", restored.integrity_violations());
    }
}
