//! Pure circuit commands.
//!
//! Every command borrows the input circuit and returns a new value, so the input is never
//! mutated and an undo history can keep whole circuits. Commands that allocate ids take an
//! explicit [`IdGenerator`](crate::core::ids::IdGenerator).

pub mod clone;
pub mod delete;
pub mod group;
pub mod interface;
pub mod palette;
pub mod wiring;

pub use clone::{clone_group, ClonedGroup};
pub use delete::{delete_selection, DeletedItems, Deletion, Selection};
pub use group::{create_group, ungroup, CreateGroupRequest, CreatedGroup};
pub use interface::{update_group_interface, InterfaceUpdate};
pub use palette::{add_node, set_switch, toggle_switch, NodeTemplate, Placed};
pub use wiring::{connect, disconnect, ConnectRequest};
