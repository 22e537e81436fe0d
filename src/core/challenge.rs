use super::circuit::Circuit;
use super::execution::{simulate_with_config, SimulationConfig};
use super::types::{NodeId, PortId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Expected signal values for a challenge
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChallengeTarget {
    #[serde(default)]
    pub lights: BTreeMap<NodeId, bool>,
    #[serde(default)]
    pub outputs: BTreeMap<PortId, bool>,
}

/// Outcome of checking a circuit against a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeReport {
    pub success: bool,
    /// One line per mismatch, plus one if the simulation did not converge
    pub details: Vec<String>,
}

/// Run one simulation and compare it with the expected values
pub fn evaluate_challenge(circuit: &Circuit, target: &ChallengeTarget) -> ChallengeReport {
    evaluate_challenge_with_config(circuit, target, &SimulationConfig::default())
}

pub fn evaluate_challenge_with_config(
    circuit: &Circuit,
    target: &ChallengeTarget,
    config: &SimulationConfig,
) -> ChallengeReport {
    let result = simulate_with_config(circuit, config);
    let mut details = Vec::new();

    if !result.converged {
        details.push(format!(
            "Simulation did not converge after {} rounds",
            result.iterations
        ));
    }
    for (light, expected) in &target.lights {
        match result.light(light) {
            Some(actual) if actual == *expected => {}
            Some(actual) => details.push(format!(
                "Light '{}': expected {}, got {}",
                light,
                on_off(*expected),
                on_off(actual)
            )),
            None => details.push(format!("Light '{}' not found", light)),
        }
    }
    for (port, expected) in &target.outputs {
        match result.output(port) {
            Some(actual) if actual == *expected => {}
            Some(actual) => details.push(format!(
                "Output '{}': expected {}, got {}",
                port, expected, actual
            )),
            None => details.push(format!("Output port '{}' not found", port)),
        }
    }

    ChallengeReport {
        success: details.is_empty(),
        details,
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
