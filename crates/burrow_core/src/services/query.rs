//! Session introspection for the probe run.

use crate::error::{BurrowError, BurrowResult};
use crate::models::ConnectionInfo;
use crate::services::connection::ClusterClient;

/// The fixed, parameterless statement the probe issues. Reads only session
/// and catalog functions; returns exactly one row on a healthy server.
const CONNECTION_INFO_QUERY: &str = "SELECT \
     current_database() AS database, \
     current_user AS user, \
     version() AS server_version";

/// Service wrapping the single introspection query.
pub struct QueryService;

impl QueryService {
    /// Fetch the session metadata for the open connection.
    ///
    /// # Errors
    /// A zero-row response (which a healthy server never produces) and any
    /// database-level error during execution or column decoding report as
    /// query failures.
    pub async fn connection_info(client: &ClusterClient) -> BurrowResult<ConnectionInfo> {
        tracing::debug!("Executing connection info query");

        let row = client
            .query_opt(CONNECTION_INFO_QUERY)
            .await?
            .ok_or_else(|| BurrowError::query("connection info query returned no rows"))?;

        Ok(ConnectionInfo {
            database: get_column(&row, "database")?,
            user: get_column(&row, "user")?,
            server_version: get_column(&row, "server_version")?,
        })
    }
}

/// Read a text column by name, mapping decode failures onto the query
/// error category.
fn get_column(row: &tokio_postgres::Row, name: &str) -> BurrowResult<String> {
    row.try_get(name)
        .map_err(|e| BurrowError::query(format!("failed to read column '{name}': {e}")))
}
