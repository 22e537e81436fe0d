pub(crate) mod boundary;
pub mod draft;
pub mod interface_validator;

pub use draft::build_default_group_interface_draft;
pub use interface_validator::{validate_group_interface, InterfaceValidationOptions};
