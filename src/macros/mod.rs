//! logicgraph declarative macros
//!
//! This module provides macros that remove boilerplate from the data model.

#[macro_use]
mod id_macros;
