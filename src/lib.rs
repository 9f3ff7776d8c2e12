//! # mediatree
//!
//! Walks a configured media root directory and serves a JSON description of
//! its directory tree, with aggregate file and directory counts, to
//! media-browsing clients.
//!
//! ## Core Components
//!
//! - [`tree`]: the directory tree builder
//! - [`routes`]: HTTP handlers and the router
//! - [`config`]: layered configuration (embedded defaults, file, environment)
//! - [`error`]: application errors and their JSON responses
//! - [`metrics`]: walk counters
//! - [`middleware`]: security headers
//! - [`state`]: shared application state
//! - [`types`]: tree data model and walk options

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;
