pub mod wire_validator;

pub use wire_validator::{validate_wire, WireValidator};
