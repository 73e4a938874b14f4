//! Result model for the introspection query.

/// Session metadata reported by the cluster for the probe connection.
///
/// Produced by the single introspection query and consumed by the report;
/// nothing outlives the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Name of the currently connected database.
    pub database: String,
    /// Name of the currently authenticated user.
    pub user: String,
    /// Server version string.
    pub server_version: String,
}
