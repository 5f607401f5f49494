use std::path::PathBuf;

use editlock_core::locking::{LockDescriptor, DEFAULT_SWEEP_INTERVAL_SECS};
use editlock_events::NodeId;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Identity of this node in the cluster.
    pub node_id: NodeId,
    /// Optional JSON file of lock descriptors, re-read on every reload.
    pub descriptors_path: Option<PathBuf>,
    /// Lock descriptors declared inline via `LOCK_TYPES`.
    pub lock_types: Vec<LockDescriptor>,
    /// Interval between expiration sweeps in seconds (default: `60`).
    pub sweep_interval_secs: u64,
    /// Base URLs of peer nodes that receive this node's lock events.
    pub peer_urls: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `5`                        |
    /// | `NODE_ID`                  | random UUID                |
    /// | `LOCK_DESCRIPTORS_PATH`    | unset                      |
    /// | `LOCK_TYPES`               | empty                      |
    /// | `LOCK_SWEEP_INTERVAL_SECS` | `60`                       |
    /// | `PEER_URLS`                | empty (single node)        |
    ///
    /// `LOCK_TYPES` is a comma-separated list of `name` or `name:timeout_secs`
    /// entries, e.g. `invoice:900,customer`. `PEER_URLS` is a comma-separated
    /// list of peer base URLs, e.g. `http://node-b:3000,http://node-c:3000`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let node_id = match std::env::var("NODE_ID") {
            Ok(raw) => NodeId(raw.parse().expect("NODE_ID must be a valid UUID")),
            Err(_) => NodeId::random(),
        };

        let descriptors_path = std::env::var("LOCK_DESCRIPTORS_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let lock_types = parse_lock_types(&std::env::var("LOCK_TYPES").unwrap_or_default())
            .unwrap_or_else(|e| panic!("Invalid LOCK_TYPES: {e}"));

        let sweep_interval_secs: u64 = std::env::var("LOCK_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
            .parse()
            .expect("LOCK_SWEEP_INTERVAL_SECS must be a valid u64");
        assert!(sweep_interval_secs > 0, "LOCK_SWEEP_INTERVAL_SECS must be positive");

        let peer_urls = parse_peer_urls(&std::env::var("PEER_URLS").unwrap_or_default());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            node_id,
            descriptors_path,
            lock_types,
            sweep_interval_secs,
            peer_urls,
        }
    }
}

/// Parse a `PEER_URLS` value into trimmed, non-empty base URLs.
pub fn parse_peer_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a `LOCK_TYPES` value into descriptors.
pub fn parse_lock_types(raw: &str) -> Result<Vec<LockDescriptor>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            None => Ok(LockDescriptor::new(entry, None)),
            Some((name, timeout)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(format!("missing type name in '{entry}'"));
                }
                let secs: u64 = timeout
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid timeout in '{entry}'"))?;
                Ok(LockDescriptor::new(name, Some(secs)))
            }
        })
        .collect()
}
