//! Login suite scenarios and the runner that executes them

pub mod runner;
pub mod scenarios;

pub use runner::{run_scenario, run_suite, RunOptions, ScenarioResult, SuiteSummary};
pub use scenarios::{ScenarioContext, ScenarioId};
