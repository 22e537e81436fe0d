pub mod config;
pub mod simulation_engine;

pub use config::{ConcurrencyMode, SimulationConfig, DEFAULT_MAX_ROUNDS};
pub use simulation_engine::{simulate, simulate_with_config, SimulationEngine, SimulationResult};
