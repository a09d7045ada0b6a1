#![forbid(unsafe_code)]
//! cohort-core library.
//!
//! The follow-graph substrate and everything needed to produce one from
//! collected user records.
//!
//! # Conventions
//!
//! - **Errors**: Library modules return typed `thiserror` errors; glue code
//!   such as config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod build;
pub mod config;
pub mod error;
pub mod graph;
pub mod records;

pub use graph::{Edge, FollowGraph};
pub use records::{RecordError, UserRecord};
