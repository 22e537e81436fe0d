use crate::core::types::{PortId, PortKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One port a group exposes to the outside
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExposedPort {
    /// Id of the group's external port
    pub id: PortId,
    pub kind: PortKind,
    pub name: String,
    /// Internal port the exposed port is anchored to
    pub maps_to_internal_port_id: PortId,
}

impl ExposedPort {
    pub fn new(id: PortId, kind: PortKind, name: impl Into<String>, maps_to: PortId) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            maps_to_internal_port_id: maps_to,
        }
    }
}

/// The external interface of a group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupInterface {
    #[serde(default)]
    pub inputs: Vec<ExposedPort>,
    #[serde(default)]
    pub outputs: Vec<ExposedPort>,
}

impl GroupInterface {
    pub fn new(inputs: Vec<ExposedPort>, outputs: Vec<ExposedPort>) -> Self {
        Self { inputs, outputs }
    }

    pub fn port_count(&self) -> usize {
        self.inputs.len() + self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.port_count() == 0
    }

    /// All exposed ports, inputs first
    pub fn exposed(&self) -> impl Iterator<Item = &ExposedPort> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn find(&self, id: &PortId) -> Option<&ExposedPort> {
        self.exposed().find(|p| &p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ExposedPort> {
        self.exposed().find(|p| p.name == name)
    }
}

/// Resolved group-port to internal-port lookup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupPortMap {
    #[serde(default)]
    pub inputs: BTreeMap<PortId, PortId>,
    #[serde(default)]
    pub outputs: BTreeMap<PortId, PortId>,
}

impl GroupPortMap {
    pub fn from_interface(interface: &GroupInterface) -> Self {
        let collect = |ports: &[ExposedPort]| {
            ports
                .iter()
                .map(|p| (p.id.clone(), p.maps_to_internal_port_id.clone()))
                .collect()
        };
        Self {
            inputs: collect(&interface.inputs),
            outputs: collect(&interface.outputs),
        }
    }

    /// Internal port behind a group port of either direction
    pub fn internal_port(&self, group_port: &PortId) -> Option<&PortId> {
        self.inputs
            .get(group_port)
            .or_else(|| self.outputs.get(group_port))
    }

    /// Group input port whose internal side is `internal`
    pub fn input_for_internal(&self, internal: &PortId) -> Option<&PortId> {
        self.inputs
            .iter()
            .find(|(_, mapped)| *mapped == internal)
            .map(|(group_port, _)| group_port)
    }
}
