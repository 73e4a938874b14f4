//! Single cluster connection over the tunnel endpoint.
//!
//! The driver config carries both identities from the probe configuration:
//! `host` is the cluster DNS name used for TLS negotiation (SNI), while
//! `hostaddr` is the tunnel address the socket actually dials. The tunnel
//! itself is managed outside the process.

use crate::error::{BurrowError, BurrowResult};
use crate::models::{ConnectionConfig, SslMode};

use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::net::IpAddr;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tokio_postgres::NoTls;

/// An open connection to the cluster.
///
/// Holds the client half of the connection plus the spawned driver task.
/// Dropping the client shuts the connection down; [`ClusterClient::close`]
/// does so explicitly and waits for the driver to finish.
#[derive(Debug)]
pub struct ClusterClient {
    client: tokio_postgres::Client,
    driver: JoinHandle<()>,
}

impl ClusterClient {
    /// Open exactly one connection using the validated configuration.
    ///
    /// # Errors
    /// Every failure to establish the session (timeout, refused socket,
    /// rejected credentials, TLS negotiation) reports as a connection
    /// failure; the distinguishing detail lives in the message.
    pub async fn connect(config: &ConnectionConfig) -> BurrowResult<Self> {
        let tunnel_addr: IpAddr = config.tunnel_addr.parse().map_err(|_| {
            BurrowError::connection(format!(
                "tunnel address '{}' is not a usable IP address",
                config.tunnel_addr
            ))
        })?;

        let mut pg_config = tokio_postgres::Config::new();
        pg_config.host(&config.hostname);
        pg_config.hostaddr(tunnel_addr);
        pg_config.port(config.port);
        pg_config.dbname(&config.database);
        pg_config.user(&config.username);
        pg_config.password(&config.password);
        pg_config.application_name(concat!("burrow-", env!("CARGO_PKG_VERSION")));
        pg_config.connect_timeout(config.connect_timeout);
        pg_config.ssl_mode(match config.ssl_mode {
            SslMode::Disable => tokio_postgres::config::SslMode::Disable,
            SslMode::Allow | SslMode::Prefer => tokio_postgres::config::SslMode::Prefer,
            SslMode::Require => tokio_postgres::config::SslMode::Require,
        });

        tracing::debug!(
            url = %config.display_url(),
            ssl_mode = config.ssl_mode.as_str(),
            "Opening cluster connection"
        );

        let started = Instant::now();
        let (client, driver) = match config.ssl_mode {
            SslMode::Disable => {
                let (client, connection) =
                    pg_config.connect(NoTls).await.map_err(connect_error)?;
                (client, spawn_driver(connection))
            }
            SslMode::Allow | SslMode::Prefer | SslMode::Require => {
                // These modes negotiate TLS without certificate verification
                // (only the verify-* modes check certificates). The server
                // name still goes out in the handshake, so the cluster can
                // route the connection by SNI.
                let connector = TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .build()
                    .map_err(|e| {
                        BurrowError::connection_with_source(
                            format!("Failed to create TLS connector: {e}"),
                            e,
                        )
                    })?;
                let tls = MakeTlsConnector::new(connector);

                let (client, connection) =
                    pg_config.connect(tls).await.map_err(connect_error)?;
                (client, spawn_driver(connection))
            }
        };

        tracing::info!(
            host = %config.hostname,
            latency_ms = started.elapsed().as_millis() as u64,
            "Connection established"
        );

        Ok(Self { client, driver })
    }

    /// Execute a parameterless statement expected to return at most one row.
    pub async fn query_opt(&self, sql: &str) -> BurrowResult<Option<tokio_postgres::Row>> {
        self.client.query_opt(sql, &[]).await.map_err(BurrowError::from)
    }

    /// Close the connection and wait for the driver task to finish.
    pub async fn close(self) {
        drop(self.client);
        if let Err(e) = self.driver.await {
            tracing::debug!(error = %e, "Connection driver task did not shut down cleanly");
        }
    }
}

/// Run the driver half of the connection until the client is dropped.
fn spawn_driver<S, T>(connection: tokio_postgres::Connection<S, T>) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    T: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::debug!(error = %e, "Connection driver terminated with error");
        }
    })
}

fn connect_error(err: tokio_postgres::Error) -> BurrowError {
    let message = err.to_string();
    BurrowError::connection_with_source(message, err)
}
