mod group_command_tests;
mod wire_validator_tests;

use crate::core::circuit::{Circuit, NodeKind};
use crate::core::commands::{add_node, connect, ConnectRequest, NodeTemplate};
use crate::core::ids::SequentialIds;
use crate::core::types::{GateType, NodeId, PortId, Position, WireId};

/// Test bench that places nodes and wires them with predictable ids
pub(crate) struct Bench {
    pub circuit: Circuit,
    pub ids: SequentialIds,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            circuit: Circuit::empty(),
            ids: SequentialIds::new(),
        }
    }

    fn place(&mut self, template: NodeTemplate, x: f64, y: f64) -> NodeId {
        let placed = add_node(&self.circuit, &mut self.ids, template, Position::new(x, y));
        self.circuit = placed.circuit;
        placed.node_id
    }

    pub fn switch(&mut self, state: bool, x: f64, y: f64) -> NodeId {
        self.place(NodeTemplate::Switch { state }, x, y)
    }

    pub fn gate(&mut self, gate_type: GateType, x: f64, y: f64) -> NodeId {
        self.place(NodeTemplate::gate(gate_type), x, y)
    }

    pub fn light(&mut self, x: f64, y: f64) -> NodeId {
        self.place(NodeTemplate::Light, x, y)
    }

    pub fn output(&self, node: &NodeId) -> PortId {
        let node = self.circuit.node(node).expect("node exists");
        node.output_port_ids()[0].clone()
    }

    pub fn input(&self, node: &NodeId, index: usize) -> PortId {
        let node = self.circuit.node(node).expect("node exists");
        node.input_port_ids()[index].clone()
    }

    pub fn request(&self, from: &NodeId, to: &NodeId, index: usize) -> ConnectRequest {
        ConnectRequest::new(from.clone(), self.output(from), to.clone(), self.input(to, index))
    }

    /// Wire `from`'s output into input `index` of `to`
    pub fn wire(&mut self, from: &NodeId, to: &NodeId, index: usize) -> WireId {
        let request = self.request(from, to, index);
        self.circuit = connect(&self.circuit, &mut self.ids, &request).expect("wire is legal");
        self.circuit.wires().last().expect("wire was added").id.clone()
    }

    pub fn switch_state(&self, node: &NodeId) -> Option<bool> {
        match self.circuit.node(node).map(|n| &n.kind) {
            Some(NodeKind::Switch { state, .. }) => Some(*state),
            _ => None,
        }
    }
}

/// Two switches into an AND gate driving a light: `(a, b, gate, light)`
pub(crate) fn and_bench(a: bool, b: bool) -> (Bench, NodeId, NodeId, NodeId, NodeId) {
    let mut bench = Bench::new();
    let sa = bench.switch(a, 0.0, 0.0);
    let sb = bench.switch(b, 0.0, 60.0);
    let and = bench.gate(GateType::And, 120.0, 30.0);
    let light = bench.light(240.0, 30.0);
    bench.wire(&sa, &and, 0);
    bench.wire(&sb, &and, 1);
    bench.wire(&and, &light, 0);
    (bench, sa, sb, and, light)
}
