use super::config::{ConcurrencyMode, SimulationConfig};
use crate::core::circuit::{Circuit, NodeKind};
use crate::core::types::{GateType, NodeId, PortId, PortKind};
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Signal state produced by a simulation run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Value of every output port
    pub outputs: BTreeMap<PortId, bool>,
    /// Displayed state of every light
    pub lights: BTreeMap<NodeId, bool>,
    /// Rounds executed
    pub iterations: usize,
    pub converged: bool,
    /// Non-fatal diagnostics, e.g. a convergence failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl SimulationResult {
    pub fn light(&self, node: &NodeId) -> Option<bool> {
        self.lights.get(node).copied()
    }

    pub fn output(&self, port: &PortId) -> Option<bool> {
        self.outputs.get(port).copied()
    }
}

/// A gate with its inputs resolved to the output ports driving them
struct GateSlot<'a> {
    gate_type: GateType,
    output: &'a PortId,
    drivers: Vec<Option<&'a PortId>>,
}

impl GateSlot<'_> {
    fn evaluate(&self, values: &HashMap<&PortId, bool>) -> bool {
        let inputs: Vec<bool> = self.drivers.iter().map(|d| read(values, *d)).collect();
        self.gate_type.evaluate(&inputs)
    }
}

/// A port whose value is copied from another output port each round (junctions, group outputs)
struct MirrorSlot<'a> {
    output: &'a PortId,
    driver: Option<&'a PortId>,
}

fn read(values: &HashMap<&PortId, bool>, driver: Option<&PortId>) -> bool {
    driver
        .and_then(|port| values.get(port).copied())
        .unwrap_or(false)
}

/// Fixed-point evaluator over one circuit value.
///
/// Every input port is resolved once, up front, to the output port that drives it; rounds then
/// only read and write output values. Unconnected inputs read `false`.
pub struct SimulationEngine<'a> {
    circuit: &'a Circuit,
    config: &'a SimulationConfig,
    gates: Vec<GateSlot<'a>>,
    junctions: Vec<MirrorSlot<'a>>,
    group_outputs: Vec<MirrorSlot<'a>>,
    values: HashMap<&'a PortId, bool>,
}

impl<'a> SimulationEngine<'a> {
    /// Index the circuit and seed switch outputs
    pub fn new(circuit: &'a Circuit, config: &'a SimulationConfig) -> Self {
        let driver_of = |port: &'a PortId| circuit.incoming_wire(port).map(|w| &w.source);

        let mut engine = Self {
            circuit,
            config,
            gates: Vec::new(),
            junctions: Vec::new(),
            group_outputs: Vec::new(),
            values: HashMap::new(),
        };

        for node in circuit.nodes() {
            match &node.kind {
                NodeKind::Switch { state, output_port_id } => {
                    engine.values.insert(output_port_id, *state);
                }
                NodeKind::Gate {
                    gate_type,
                    input_port_ids,
                    output_port_id,
                } => {
                    engine.values.insert(output_port_id, false);
                    engine.gates.push(GateSlot {
                        gate_type: *gate_type,
                        output: output_port_id,
                        drivers: input_port_ids.iter().map(driver_of).collect(),
                    });
                }
                NodeKind::Junction {
                    input_port_id,
                    output_port_id,
                } => {
                    // A junction behind a group input is fed through the group port.
                    let via_group = node
                        .parent_group_id
                        .as_ref()
                        .and_then(|parent| circuit.group(parent))
                        .and_then(|group| group.port_map.input_for_internal(output_port_id));
                    let driver = driver_of(input_port_id).or_else(|| via_group.and_then(driver_of));
                    engine.values.insert(output_port_id, false);
                    engine.junctions.push(MirrorSlot {
                        output: output_port_id,
                        driver,
                    });
                }
                NodeKind::Group(group) => {
                    for (group_port, internal) in &group.port_map.outputs {
                        let driver = match circuit.port_kind(internal) {
                            Some(PortKind::Input) => driver_of(internal),
                            Some(PortKind::Output) => Some(internal),
                            None => None,
                        };
                        engine.values.insert(group_port, false);
                        engine.group_outputs.push(MirrorSlot {
                            output: group_port,
                            driver,
                        });
                    }
                }
                NodeKind::Light { .. } => {}
            }
        }
        engine
    }

    fn write(&mut self, port: &'a PortId, value: bool) -> bool {
        self.values.insert(port, value) != Some(value)
    }

    /// Run one propagation round, returning whether any value changed
    fn round(&mut self) -> bool {
        let mut changed = false;

        match self.config.concurrency_mode {
            ConcurrencyMode::Sequential => {
                for i in 0..self.gates.len() {
                    let value = self.gates[i].evaluate(&self.values);
                    changed |= self.write(self.gates[i].output, value);
                }
            }
            ConcurrencyMode::Rayon => {
                let values = &self.values;
                let results: Vec<(&'a PortId, bool)> = self
                    .gates
                    .par_iter()
                    .map(|gate| (gate.output, gate.evaluate(values)))
                    .collect();
                for (port, value) in results {
                    changed |= self.write(port, value);
                }
            }
        }

        for i in 0..self.junctions.len() {
            let value = read(&self.values, self.junctions[i].driver);
            changed |= self.write(self.junctions[i].output, value);
        }
        for i in 0..self.group_outputs.len() {
            let value = read(&self.values, self.group_outputs[i].driver);
            changed |= self.write(self.group_outputs[i].output, value);
        }

        changed
    }

    /// Iterate to a fixed point or the round cap, then resolve lights
    pub fn run(mut self) -> SimulationResult {
        let evaluable = self.gates.len() + self.junctions.len() + self.group_outputs.len();
        let cap = self.config.round_cap(evaluable);

        let mut iterations = 0;
        let mut converged = false;
        while iterations < cap {
            iterations += 1;
            debug!("=== Propagation round {} ===", iterations);
            if !self.round() {
                converged = true;
                break;
            }
        }

        let mut errors = Vec::new();
        if !converged {
            warn!("Simulation did not converge within {} rounds", cap);
            errors.push(format!("Simulation did not converge within {} rounds", cap));
        }

        let circuit = self.circuit;
        let lights = circuit
            .nodes()
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Light { input_port_id } => {
                    let driver = circuit.incoming_wire(input_port_id).map(|w| &w.source);
                    Some((node.id.clone(), read(&self.values, driver)))
                }
                _ => None,
            })
            .collect();
        let outputs = self
            .values
            .into_iter()
            .map(|(port, value)| (port.clone(), value))
            .collect();

        SimulationResult {
            outputs,
            lights,
            iterations,
            converged,
            errors,
        }
    }
}

/// Simulate with the default configuration
pub fn simulate(circuit: &Circuit) -> SimulationResult {
    simulate_with_config(circuit, &SimulationConfig::default())
}

/// Simulate a circuit value. Never fails: non-convergence is reported inside the result.
pub fn simulate_with_config(circuit: &Circuit, config: &SimulationConfig) -> SimulationResult {
    SimulationEngine::new(circuit, config).run()
}
