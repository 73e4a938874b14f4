//! Error types for the Burrow probe.
//!
//! Every failure a run can hit maps onto one of six categories, each with
//! its own remediation hints. All categories are terminal: the probe never
//! retries, and the binary turns any of these into a non-zero exit.

use thiserror::Error;

/// Unified error type for all probe operations.
#[derive(Debug, Error)]
pub enum BurrowError {
    /// One or more required environment variables are absent or empty.
    #[error("Missing configuration: {}", .missing.join(", "))]
    MissingConfiguration {
        /// Names of the variables that were not set.
        missing: Vec<String>,
    },

    /// The cluster hostname failed format validation.
    #[error("Invalid hostname: {value}")]
    InvalidHostname {
        /// The offending value.
        value: String,
    },

    /// The SSL mode is not one of the accepted values.
    #[error("Invalid SSL mode: {value}")]
    InvalidSslMode {
        /// The offending value.
        value: String,
    },

    /// Establishing the connection over the tunnel did not succeed.
    ///
    /// Timeouts, refused sockets, rejected credentials, and TLS handshake
    /// failures all land here; only the message distinguishes them.
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The introspection query failed or returned no usable data.
    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// PostgreSQL error code (e.g. "42501"), when the server reported one.
        code: Option<String>,
        /// Additional detail from the server.
        detail: Option<String>,
        /// Server-provided hint.
        hint: Option<String>,
    },

    /// Anything not classified above.
    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

/// Type alias for Result with BurrowError.
pub type BurrowResult<T> = Result<T, BurrowError>;

/// Remediation hints for connection failures, in the order they are printed.
const CONNECTION_HINTS: [&str; 3] = [
    "Ensure the SSH or SSM tunnel is active",
    "Verify the tunnel is forwarding to the expected loopback address and port 5432",
    "Check that the auth token is valid and not expired",
];

/// One line per required environment variable, shown when any is missing.
const REQUIRED_VARIABLE_HINTS: [&str; 4] = [
    "HOSTNAME: cluster private DNS endpoint, used as the TLS identity",
    "PGHOSTADDR: tunnel localhost address (typically 127.0.0.1)",
    "PGPASSWORD: pre-generated auth token used as the connection password",
    "PGSSLMODE: one of require, prefer, allow, disable",
];

impl BurrowError {
    /// Create a missing-configuration error naming the absent variables.
    pub fn missing_configuration(missing: Vec<String>) -> Self {
        Self::MissingConfiguration { missing }
    }

    /// Create an invalid-hostname error carrying the offending value.
    pub fn invalid_hostname(value: impl Into<String>) -> Self {
        Self::InvalidHostname { value: value.into() }
    }

    /// Create an invalid-SSL-mode error carrying the offending value.
    pub fn invalid_ssl_mode(value: impl Into<String>) -> Self {
        Self::InvalidSslMode { value: value.into() }
    }

    /// Create a connection error from a message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Create a connection error preserving the underlying driver error.
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a query error from a message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query { message: message.into(), code: None, detail: None, hint: None }
    }

    /// Create an unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected { message: message.into() }
    }

    /// Get the category name used in the failure report.
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingConfiguration { .. }
            | Self::InvalidHostname { .. }
            | Self::InvalidSslMode { .. } => "Configuration",
            Self::Connection { .. } => "Connection",
            Self::Query { .. } => "Query",
            Self::Unexpected { .. } => "Unexpected",
        }
    }

    /// Get the remediation hints for this error, in print order.
    pub fn hints(&self) -> Vec<&str> {
        match self {
            Self::MissingConfiguration { .. } => REQUIRED_VARIABLE_HINTS.to_vec(),
            Self::InvalidHostname { .. } => {
                vec!["Hostname may contain only letters, digits, dots, and hyphens, up to 253 characters"]
            }
            Self::InvalidSslMode { .. } => {
                vec!["PGSSLMODE must be one of: require, prefer, allow, disable"]
            }
            Self::Connection { .. } => CONNECTION_HINTS.to_vec(),
            Self::Query { hint, .. } => hint.as_deref().into_iter().collect(),
            Self::Unexpected { .. } => Vec::new(),
        }
    }
}

/// Convert a driver error into a query failure, preserving PostgreSQL
/// error metadata when the server reported any.
///
/// Only the query path relies on this conversion; the connector classifies
/// its own failures as [`BurrowError::Connection`].
impl From<tokio_postgres::Error> for BurrowError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            BurrowError::Query {
                message: db_err.message().to_string(),
                code: Some(db_err.code().code().to_string()),
                detail: db_err.detail().map(String::from),
                hint: db_err.hint().map(String::from),
            }
        } else {
            BurrowError::Query {
                message: err.to_string(),
                code: None,
                detail: None,
                hint: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_names_every_variable() {
        let err = BurrowError::missing_configuration(vec![
            "HOSTNAME".to_string(),
            "PGPASSWORD".to_string(),
        ]);
        let message = err.to_string();
        assert_eq!(message, "Missing configuration: HOSTNAME, PGPASSWORD");
        assert_eq!(err.category(), "Configuration");
    }

    #[test]
    fn invalid_values_are_reported_verbatim() {
        let err = BurrowError::invalid_hostname("host name;drop");
        assert_eq!(err.to_string(), "Invalid hostname: host name;drop");

        let err = BurrowError::invalid_ssl_mode("verify-full");
        assert_eq!(err.to_string(), "Invalid SSL mode: verify-full");
    }

    #[test]
    fn connection_errors_carry_three_tunnel_hints() {
        let err = BurrowError::connection("connection refused");
        assert_eq!(err.category(), "Connection");

        let hints = err.hints();
        assert_eq!(hints.len(), 3);
        assert!(hints[0].contains("tunnel is active"));
        assert!(hints[1].contains("loopback"));
        assert!(hints[2].contains("token"));
    }

    #[test]
    fn missing_configuration_hints_cover_all_four_variables() {
        let err = BurrowError::missing_configuration(vec!["PGSSLMODE".to_string()]);
        let hints = err.hints();
        assert_eq!(hints.len(), 4);
        for name in ["HOSTNAME", "PGHOSTADDR", "PGPASSWORD", "PGSSLMODE"] {
            assert!(hints.iter().any(|h| h.starts_with(name)), "no hint for {name}");
        }
    }

    #[test]
    fn query_errors_pass_through_server_hints_only() {
        let bare = BurrowError::query("no rows");
        assert!(bare.hints().is_empty());

        let with_hint = BurrowError::Query {
            message: "permission denied".to_string(),
            code: Some("42501".to_string()),
            detail: None,
            hint: Some("Ask an administrator for access".to_string()),
        };
        assert_eq!(with_hint.hints(), vec!["Ask an administrator for access"]);
    }

    #[test]
    fn unexpected_errors_have_no_hints() {
        let err = BurrowError::unexpected("task join failed");
        assert_eq!(err.category(), "Unexpected");
        assert!(err.hints().is_empty());
    }
}
