//! Data models for a probe run.

pub mod connection;
pub mod query;

pub use connection::{ConnectionConfig, SslMode};
pub use query::ConnectionInfo;
