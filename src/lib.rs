#[macro_use]
mod macros;

pub mod core;

// Re-export commonly used types
pub use crate::core::circuit::{
    Circuit, ExposedPort, GroupData, GroupInterface, GroupPortMap, Node, NodeKind, Wire,
};
pub use crate::core::commands::{
    add_node, clone_group, connect, create_group, delete_selection, disconnect, set_switch,
    toggle_switch, ungroup, update_group_interface, ConnectRequest, CreateGroupRequest,
    NodeTemplate, Selection,
};
pub use crate::core::connections::validate_wire;
pub use crate::core::errors::{CircuitError, CircuitResult, PayloadError};
pub use crate::core::execution::{simulate, simulate_with_config, SimulationConfig, SimulationResult};
pub use crate::core::groups::{
    build_default_group_interface_draft, validate_group_interface, InterfaceValidationOptions,
};
pub use crate::core::ids::{IdGenerator, SequentialIds, UuidIds};
pub use crate::core::types::{GateType, NodeId, Port, PortId, PortKind, Position, WireId};
