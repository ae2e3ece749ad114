//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration for the chat core.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CoreConfig {
    /// Node connection settings.
    pub node: NodeConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Node connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Websocket RPC endpoint.
    pub url: String,

    /// Largest accepted RPC frame in bytes.
    pub max_message_size: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "wss://rococo-contracts-rpc.polkadot.io:443".to_string(),
            max_message_size: 16 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
