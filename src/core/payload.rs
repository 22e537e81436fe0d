//! Import and export of circuits as versioned JSON payloads.
//!
//! Only schema version `1.2` is accepted; older payloads are rejected rather than migrated.

use super::circuit::Circuit;
use super::errors::PayloadError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema version stamped on every export
pub const SCHEMA_VERSION: &str = "1.2";

/// Serialized circuit with its schema version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitPayload {
    pub version: String,
    pub circuit: Circuit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl CircuitPayload {
    /// Wrap a circuit with the current schema version
    pub fn new(circuit: Circuit, metadata: Option<Value>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            circuit,
            metadata,
        }
    }
}

/// Serialize a circuit as a pretty-printed payload
pub fn export_circuit(circuit: &Circuit, metadata: Option<Value>) -> Result<String, PayloadError> {
    let payload = CircuitPayload::new(circuit.clone(), metadata);
    Ok(serde_json::to_string_pretty(&payload)?)
}

/// Parse and validate a payload.
///
/// Version and shape problems are collected together; a payload that passes them is then
/// deserialized and checked against the circuit invariants.
pub fn import_circuit(text: &str) -> Result<CircuitPayload, PayloadError> {
    let value: Value = serde_json::from_str(text)?;
    let errors = check_shape(&value);
    if !errors.is_empty() {
        return Err(PayloadError::Invalid(errors));
    }

    let payload: CircuitPayload = serde_json::from_value(value)?;
    let violations = payload.circuit.integrity_violations();
    if !violations.is_empty() {
        return Err(PayloadError::Invalid(violations));
    }

    debug!(
        "Imported circuit with {} node(s) and {} wire(s)",
        payload.circuit.nodes().len(),
        payload.circuit.wires().len()
    );
    Ok(payload)
}

/// Every version and shape violation of a raw payload
pub fn check_shape(value: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(root) = value.as_object() else {
        errors.push("Payload must be a JSON object".to_string());
        return errors;
    };

    match root.get("version") {
        None => errors.push("Missing 'version'".to_string()),
        Some(Value::String(v)) if v == SCHEMA_VERSION => {}
        Some(Value::String(v)) => errors.push(format!(
            "Unsupported schema version '{}'; expected '{}'",
            v, SCHEMA_VERSION
        )),
        Some(_) => errors.push("'version' must be a string".to_string()),
    }

    let Some(circuit) = root.get("circuit").and_then(Value::as_object) else {
        errors.push("'circuit' must be an object".to_string());
        return errors;
    };
    if !circuit.get("nodes").map_or(false, Value::is_array) {
        errors.push("'circuit.nodes' must be an array".to_string());
    }
    match circuit.get("wires").and_then(Value::as_array) {
        None => errors.push("'circuit.wires' must be an array".to_string()),
        Some(wires) => {
            for (i, wire) in wires.iter().enumerate() {
                for field in ["source", "target"] {
                    let present = wire
                        .get(field)
                        .and_then(Value::as_str)
                        .map_or(false, |s| !s.is_empty());
                    if !present {
                        errors.push(format!("Wire #{} has no {}", i + 1, field));
                    }
                }
            }
        }
    }

    errors
}
