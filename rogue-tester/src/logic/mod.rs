//! Headless simulation logic for the tester binary.

pub mod policy;
pub mod reports;
pub mod simulation;

pub use policy::{PlayerPolicy, StrategyId};
pub use simulation::{RunEnding, RunRecord, SimulationConfig, run_simulation, verify_determinism};
