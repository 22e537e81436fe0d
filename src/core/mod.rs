pub mod challenge;
pub mod circuit;
pub mod commands;
pub mod connections;
pub mod errors;
pub mod execution;
pub mod groups;
pub mod ids;
pub mod payload;
pub mod types;

#[cfg(test)]
mod tests;
