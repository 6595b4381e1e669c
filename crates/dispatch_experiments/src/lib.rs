//! Parallel experimentation framework for dispatch parameter sweeps.
//!
//! This crate runs many dispatch simulations in parallel with varying vehicle
//! pools, rider populations and solicitation timeouts, extracts per-run
//! metrics, and scores runs so the trade-off between a short timeout (more
//! unmatched riders) and a long one (slower resolution) can be compared.
//!
//! # Quick Start
//!
//! ```no_run
//! use dispatch_experiments::{
//!     find_best_result_index, run_parallel_experiments, ParameterSpace, ServiceWeights,
//! };
//!
//! let space = ParameterSpace::grid()
//!     .solicitation_timeout_ms(vec![50, 100, 250, 500])
//!     .num_vehicles(vec![5, 10, 20])
//!     .num_riders(vec![200]);
//!
//! let parameter_sets = space.generate();
//! let results = run_parallel_experiments(parameter_sets, None).unwrap();
//!
//! let weights = ServiceWeights::default();
//! let best_idx = find_best_result_index(&results, &weights).unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: Parameter variation framework (grid search, random sampling)
//! - [`runner`]: Parallel simulation execution using rayon
//! - [`metrics`]: Metrics extraction from simulation reports
//! - [`scoring`]: Weighted service score across a sweep
//! - [`export`]: Result export to CSV/JSON
//!
//! Every run executes on a paused current-thread tokio runtime, so sleeps
//! advance virtual time instantly and a seeded run is reproducible.

pub mod export;
pub mod metrics;
pub mod parameter_spaces;
pub mod parameters;
pub mod runner;
pub mod scoring;

pub use export::{export_to_csv, export_to_json, find_best_parameters, find_best_result_index};
pub use metrics::SimulationResult;
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::run_parallel_experiments;
pub use scoring::{calculate_service_scores, ServiceWeights};
