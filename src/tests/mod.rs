//! Unit and router tests for mediatree.
//!
//! - **tree_tests**: directory walking, counting and fail-soft behaviour
//! - **api_tests**: the media tree endpoints through the full router
//! - **health_api_tests**: liveness, readiness, metrics and version endpoints
//! - **config_tests**: configuration loading and validation
//! - **error_tests**: error display and HTTP mapping
//!
//! Run a single group with e.g. `cargo test tree_tests`.

pub mod health_api_tests;
