//! Connection configuration for a single probe run.
//!
//! The probe is configured entirely through the process environment. Four
//! variables are required; everything else (port, database, user, timeout)
//! is fixed by the target cluster and not configurable.

use crate::error::{BurrowError, BurrowResult};
use std::time::Duration;

/// Environment variable holding the cluster's private DNS name (TLS identity).
pub const ENV_HOSTNAME: &str = "HOSTNAME";
/// Environment variable holding the local tunnel endpoint address.
pub const ENV_TUNNEL_ADDR: &str = "PGHOSTADDR";
/// Environment variable holding the pre-generated auth token.
pub const ENV_PASSWORD: &str = "PGPASSWORD";
/// Environment variable holding the SSL mode.
pub const ENV_SSL_MODE: &str = "PGSSLMODE";

/// All required variables, in the order they are reported when missing.
pub const REQUIRED_VARS: [&str; 4] = [ENV_HOSTNAME, ENV_TUNNEL_ADDR, ENV_PASSWORD, ENV_SSL_MODE];

/// The cluster listens on the standard PostgreSQL port.
pub const CLUSTER_PORT: u16 = 5432;
/// The probe always connects to the default database.
pub const CLUSTER_DATABASE: &str = "postgres";
/// The probe always authenticates as the cluster admin role.
pub const CLUSTER_USER: &str = "admin";
/// Connect timeout applied to the dial and handshake.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum hostname length, per the domain-name length convention.
const MAX_HOSTNAME_LEN: usize = 253;

/// SSL mode for the cluster connection.
///
/// Only the four values accepted by the interface contract; anything else
/// (including the libpq `verify-*` modes) is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslMode {
    /// No SSL.
    Disable,
    /// Try plaintext first, fall back to SSL.
    Allow,
    /// Use SSL if available.
    Prefer,
    /// Require SSL, accept any certificate.
    Require,
}

impl SslMode {
    /// Convert to the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::Allow => "allow",
            Self::Prefer => "prefer",
            Self::Require => "require",
        }
    }

    /// Parse from the environment value.
    pub fn parse(s: &str) -> BurrowResult<Self> {
        match s {
            "disable" => Ok(Self::Disable),
            "allow" => Ok(Self::Allow),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            other => Err(BurrowError::invalid_ssl_mode(other)),
        }
    }
}

/// Configuration for the single probe connection.
///
/// The hostname and the tunnel address are deliberately separate fields:
/// TLS negotiation presents `hostname` as the server name, while the socket
/// dials `tunnel_addr`. Constructed once, immutable for the run.
#[derive(Clone)]
pub struct ConnectionConfig {
    /// Cluster private DNS name, used as the TLS identity.
    pub hostname: String,
    /// Local tunnel endpoint the socket actually connects to.
    pub tunnel_addr: String,
    /// Server port, fixed at 5432.
    pub port: u16,
    /// Database name, fixed at "postgres".
    pub database: String,
    /// Login role, fixed at "admin".
    pub username: String,
    /// Auth token used as the connection password.
    pub password: String,
    /// SSL negotiation mode.
    pub ssl_mode: SslMode,
    /// Connect timeout, fixed at 30 seconds.
    pub connect_timeout: Duration,
}

impl ConnectionConfig {
    /// Load and validate the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `MissingConfiguration` naming every absent or empty variable,
    /// `InvalidHostname` for a malformed hostname, or `InvalidSslMode` for
    /// an SSL mode outside the accepted set. No connection is attempted on
    /// any of these paths.
    pub fn from_env() -> BurrowResult<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load the configuration through an arbitrary variable lookup.
    ///
    /// `from_env` binds this to the process environment; tests supply their
    /// own lookup so they never mutate global state.
    pub fn from_vars<F>(lookup: F) -> BurrowResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = Vec::with_capacity(REQUIRED_VARS.len());
        let mut missing = Vec::new();
        for name in REQUIRED_VARS {
            match lookup(name) {
                Some(value) if !value.is_empty() => values.push(value),
                _ => missing.push(name.to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(BurrowError::missing_configuration(missing));
        }

        let mut values = values.into_iter();
        let hostname = values.next().unwrap_or_default();
        let tunnel_addr = values.next().unwrap_or_default();
        let password = values.next().unwrap_or_default();
        let ssl_mode_value = values.next().unwrap_or_default();

        validate_hostname(&hostname)?;
        let ssl_mode = SslMode::parse(&ssl_mode_value)?;

        Ok(Self {
            hostname,
            tunnel_addr,
            port: CLUSTER_PORT,
            database: CLUSTER_DATABASE.to_string(),
            username: CLUSTER_USER.to_string(),
            password,
            ssl_mode,
            connect_timeout: CONNECT_TIMEOUT,
        })
    }

    /// Get the display connection string (without the password).
    pub fn display_url(&self) -> String {
        format!(
            "postgresql://{}@{}:{}/{}",
            self.username, self.tunnel_addr, self.port, self.database
        )
    }
}

// Passwords never appear in logs or debug output.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("hostname", &self.hostname)
            .field("tunnel_addr", &self.tunnel_addr)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ssl_mode", &self.ssl_mode)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Validate the hostname character set and length before it reaches the
/// driver, a log line, or a connection string.
fn validate_hostname(value: &str) -> BurrowResult<()> {
    if value.len() > MAX_HOSTNAME_LEN {
        return Err(BurrowError::invalid_hostname(value));
    }
    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-') {
        return Err(BurrowError::invalid_hostname(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BurrowError;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, String> {
        HashMap::from([
            (ENV_HOSTNAME, "db.internal.example".to_string()),
            (ENV_TUNNEL_ADDR, "127.0.0.1".to_string()),
            (ENV_PASSWORD, "token123".to_string()),
            (ENV_SSL_MODE, "require".to_string()),
        ])
    }

    fn load(vars: &HashMap<&'static str, String>) -> BurrowResult<ConnectionConfig> {
        ConnectionConfig::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn valid_environment_produces_fixed_parameters() {
        let config = load(&base_vars()).expect("config should load");

        assert_eq!(config.hostname, "db.internal.example");
        assert_eq!(config.tunnel_addr, "127.0.0.1");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "postgres");
        assert_eq!(config.username, "admin");
        assert_eq!(config.password, "token123");
        assert_eq!(config.ssl_mode, SslMode::Require);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn each_missing_variable_is_identified() {
        for name in REQUIRED_VARS {
            let mut vars = base_vars();
            vars.remove(name);

            match load(&vars) {
                Err(BurrowError::MissingConfiguration { missing }) => {
                    assert_eq!(missing, vec![name.to_string()]);
                }
                other => panic!("expected MissingConfiguration for {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn empty_values_count_as_missing() {
        let mut vars = base_vars();
        vars.insert(ENV_PASSWORD, String::new());

        match load(&vars) {
            Err(BurrowError::MissingConfiguration { missing }) => {
                assert_eq!(missing, vec![ENV_PASSWORD.to_string()]);
            }
            other => panic!("expected MissingConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn all_missing_variables_are_reported_together() {
        let result = ConnectionConfig::from_vars(|_| None);

        match result {
            Err(BurrowError::MissingConfiguration { missing }) => {
                assert_eq!(missing.len(), 4);
                assert_eq!(missing[0], ENV_HOSTNAME);
            }
            other => panic!("expected MissingConfiguration, got {other:?}"),
        }
    }

    #[test]
    fn hostname_with_unexpected_characters_is_rejected() {
        let mut vars = base_vars();
        vars.insert(ENV_HOSTNAME, "host name;drop".to_string());

        assert!(matches!(load(&vars), Err(BurrowError::InvalidHostname { .. })));
    }

    #[test]
    fn hostname_length_boundary_is_253() {
        let mut vars = base_vars();
        vars.insert(ENV_HOSTNAME, "a".repeat(253));
        assert!(load(&vars).is_ok());

        vars.insert(ENV_HOSTNAME, "a".repeat(254));
        assert!(matches!(load(&vars), Err(BurrowError::InvalidHostname { .. })));
    }

    #[test]
    fn ssl_mode_accepts_exactly_four_values() {
        for mode in ["require", "prefer", "allow", "disable"] {
            let mut vars = base_vars();
            vars.insert(ENV_SSL_MODE, mode.to_string());
            let config = load(&vars).expect("mode should be accepted");
            assert_eq!(config.ssl_mode.as_str(), mode);
        }

        let mut vars = base_vars();
        vars.insert(ENV_SSL_MODE, "verify-full".to_string());
        match load(&vars) {
            Err(BurrowError::InvalidSslMode { value }) => assert_eq!(value, "verify-full"),
            other => panic!("expected InvalidSslMode, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let config = load(&base_vars()).expect("config should load");
        let debug = format!("{config:?}");

        assert!(!debug.contains("token123"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn display_url_omits_the_password() {
        let config = load(&base_vars()).expect("config should load");

        assert_eq!(config.display_url(), "postgresql://admin@127.0.0.1:5432/postgres");
    }
}
