#[cfg(test)]
mod tests {
    use super::super::Bench;
    use crate::core::circuit::Wire;
    use crate::core::commands::{connect, disconnect, ConnectRequest};
    use crate::core::connections::{validate_wire, WireValidator};
    use crate::core::types::{GateType, NodeId, PortId, PortKind, WireId};

    fn candidate(request: &ConnectRequest) -> Wire {
        Wire::new(
            WireId::new("candidate"),
            request.source_node.clone(),
            request.source_port.clone(),
            request.target_node.clone(),
            request.target_port.clone(),
        )
    }

    #[test]
    fn test_valid_wire_is_accepted() {
        let mut bench = Bench::new();
        let switch = bench.switch(true, 0.0, 0.0);
        let not = bench.gate(GateType::Not, 100.0, 0.0);

        let request = bench.request(&switch, &not, 0);
        let wire = validate_wire(&bench.circuit, &candidate(&request)).expect("legal wire");
        assert_eq!(wire.target, bench.input(&not, 0));
    }

    #[test]
    fn test_connect_appends_wire_with_fresh_id() {
        let mut bench = Bench::new();
        let switch = bench.switch(true, 0.0, 0.0);
        let light = bench.light(100.0, 0.0);
        let before = bench.circuit.clone();

        let id = bench.wire(&switch, &light, 0);

        assert_eq!(before.wires().len(), 0, "input circuit must not be mutated");
        assert_eq!(bench.circuit.wires().len(), 1);
        assert!(!id.is_empty());
        assert_eq!(bench.circuit.incoming_wire(&bench.input(&light, 0)).map(|w| &w.id), Some(&id));
    }

    #[test]
    fn test_wrong_direction_is_rejected() {
        let mut bench = Bench::new();
        let a = bench.gate(GateType::And, 0.0, 0.0);
        let b = bench.gate(GateType::And, 100.0, 0.0);

        // input -> output is backwards
        let request = ConnectRequest::new(a.clone(), bench.input(&a, 0), b.clone(), bench.output(&b));
        let err = connect(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("Source port"));
        assert!(err.mentions("Target port"));
        assert_eq!(err.messages().len(), 2, "both endpoints are reported: {:?}", err.messages());
    }

    #[test]
    fn test_self_loop_is_rejected() {
        let mut bench = Bench::new();
        let gate = bench.gate(GateType::Or, 0.0, 0.0);
        let request = bench.request(&gate, &gate, 0);

        let err = connect(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("to itself"));
    }

    #[test]
    fn test_second_driver_is_rejected() {
        let mut bench = Bench::new();
        let s1 = bench.switch(false, 0.0, 0.0);
        let s2 = bench.switch(false, 0.0, 50.0);
        let light = bench.light(100.0, 0.0);
        bench.wire(&s1, &light, 0);

        let request = bench.request(&s2, &light, 0);
        let err = connect(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("Multiple drivers not allowed"));
    }

    #[test]
    fn test_fan_out_is_allowed() {
        let mut bench = Bench::new();
        let switch = bench.switch(true, 0.0, 0.0);
        let l1 = bench.light(100.0, 0.0);
        let l2 = bench.light(100.0, 60.0);
        bench.wire(&switch, &l1, 0);
        bench.wire(&switch, &l2, 0);
        assert_eq!(bench.circuit.outgoing_wires(&bench.output(&switch)).count(), 2);
    }

    #[test]
    fn test_all_violations_are_aggregated() {
        let mut bench = Bench::new();
        let light = bench.light(0.0, 0.0);

        let request = ConnectRequest::new(
            NodeId::new("ghost"),
            PortId::new("nowhere"),
            light.clone(),
            PortId::new("missing"),
        );
        let err = connect(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("Source node 'ghost' not found"));
        assert!(err.mentions("Target port 'missing' not found"));
    }

    #[test]
    fn test_port_must_belong_to_declared_node() {
        let mut bench = Bench::new();
        let s1 = bench.switch(false, 0.0, 0.0);
        let s2 = bench.switch(false, 0.0, 50.0);
        let light = bench.light(100.0, 0.0);

        let request = ConnectRequest::new(s1.clone(), bench.output(&s2), light.clone(), bench.input(&light, 0));
        let err = connect(&bench.circuit, &mut bench.ids, &request).unwrap_err();
        assert!(err.mentions("belongs to node"));
    }

    #[test]
    fn test_endpoint_validation_reports_kind() {
        let mut bench = Bench::new();
        let light = bench.light(0.0, 0.0);
        let errors = WireValidator::validate_endpoint(
            &bench.circuit,
            &light,
            &bench.input(&light, 0),
            PortKind::Output,
            "Source",
        );
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("is an input port"));
    }

    #[test]
    fn test_disconnect_removes_wire_and_ignores_unknown() {
        let mut bench = Bench::new();
        let switch = bench.switch(true, 0.0, 0.0);
        let light = bench.light(100.0, 0.0);
        let id = bench.wire(&switch, &light, 0);

        let untouched = disconnect(&bench.circuit, &WireId::new("nope"));
        assert_eq!(untouched, bench.circuit);

        let after = disconnect(&bench.circuit, &id);
        assert!(after.wires().is_empty());
        assert!(after.incoming_wire(&bench.input(&light, 0)).is_none());
        assert_eq!(bench.circuit.wires().len(), 1);
    }
}
