//! Core types and services for Burrow, a cluster connectivity probe.
//!
//! Burrow validates connectivity to a PostgreSQL-compatible cluster that is
//! reachable only through a pre-established SSH or SSM tunnel. This crate
//! provides the pieces the binary strings together:
//!
//! - **error**: failure taxonomy with per-category remediation hints
//! - **models**: connection configuration and the introspection result
//! - **services**: the single scoped connection and the one fixed query
//! - **logging**: structured logging setup

pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{BurrowError, BurrowResult};
pub use models::{ConnectionConfig, ConnectionInfo, SslMode};
pub use services::{ClusterClient, QueryService};
