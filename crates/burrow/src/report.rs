//! Output rendering: the success block and the categorized failure text.
//!
//! Pure string building, no I/O. The binary decides which stream each
//! rendering goes to.

use burrow_core::{BurrowError, ConnectionConfig, ConnectionInfo};

/// Render the connection information block printed on success.
///
/// The host line shows the tunnel endpoint annotated with the cluster
/// hostname it forwards to, so the reader sees both identities at once.
pub fn render_info(config: &ConnectionConfig, info: &ConnectionInfo) -> String {
    format!(
        "\nConnection Information:\n\
         ======================\n\
         Database: {}\n\
         User: {}\n\
         Host: {} (via tunnel to {})\n\
         Port: {}\n\
         SSL Status: SSL connection (required by cluster)\n\
         Server Version: {}\n",
        info.database,
        info.user,
        config.tunnel_addr,
        config.hostname,
        config.port,
        info.server_version,
    )
}

/// Render a failure as one categorized line followed by remediation hints.
pub fn render_failure(err: &BurrowError) -> String {
    let mut out = format!("{} Error: {}\n", err.category(), err);
    for hint in err.hints() {
        out.push_str("  hint: ");
        out.push_str(hint);
        out.push('\n');
    }
    out
}
