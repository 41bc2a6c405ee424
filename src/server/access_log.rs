//! Access logging.

use std::net::SocketAddr;
use log::info;

use crate::server::response::StatusCode;

/// Log target used for access records.
pub const ACCESS_LOG_TARGET: &str = "access";

/// Emit one access record for a finished connection.
///
/// `None` as the status marks a connection that was aborted without a
/// response; `None` as the path marks a request that never parsed.
pub fn log_access(status: Option<StatusCode>, peer: SocketAddr, path: Option<&str>) {
    let status = status.map_or_else(|| "-".to_string(), |s| s.to_string());
    let path = path.unwrap_or("-");
    info!(target: ACCESS_LOG_TARGET, "{peer} {status} - {path}");
}
