//! Connection establishment with a bounded connectivity probe.

use std::time::Duration;

use mysql_async::{Conn, Opts, OptsBuilder};
use tracing::debug;

use crate::config::DumpOptions;
use crate::error::{DumpError, Result};

/// Bound on the initial connectivity check.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Open a connection to the endpoint in `opts`, optionally bound to one
/// database.
///
/// The handshake doubles as the reachability probe: if it does not complete
/// within [`CONNECT_TIMEOUT`] the attempt is abandoned and reported as a
/// timeout error.
pub async fn open(opts: &DumpOptions, database: &str) -> Result<Conn> {
    opts.validate()?;

    let mut builder = OptsBuilder::default()
        .ip_or_hostname(&opts.host)
        .tcp_port(opts.port)
        .user(Some(opts.sanitized_user()))
        .pass(Some(&opts.password));
    if !database.is_empty() {
        builder = builder.db_name(Some(database));
    }

    let endpoint = format!("{}:{}/{}", opts.host, opts.port, database);
    let conn = match tokio::time::timeout(CONNECT_TIMEOUT, Conn::new(Opts::from(builder))).await {
        Ok(conn) => conn?,
        Err(_) => return Err(DumpError::ConnectTimeout(endpoint)),
    };

    debug!("connected to {}", endpoint);
    Ok(conn)
}
