//! Explorer configuration with TOML file support.

use crate::logging::LogFormat;
use crate::ExplorerError;
use cashscope_types::Network;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the explorer and its HTTP API.
///
/// Loaded from a TOML file via [`ExplorerConfig::from_toml_file`] or built
/// programmatically. Every field has a default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Which chain the token ids refer to; selects the CashAddress prefix.
    #[serde(default)]
    pub network: Network,

    /// Chaingraph GraphQL endpoint.
    #[serde(default = "default_chaingraph_url")]
    pub chaingraph_url: String,

    /// Gateway used to fetch `ipfs://` content.
    #[serde(default = "default_ipfs_gateway")]
    pub ipfs_gateway: String,

    /// Registry whose identities count as trusted.
    #[serde(default = "default_otr_registry_url")]
    pub otr_registry_url: String,

    /// Per-request timeout in seconds; unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter, e.g. "info" or "debug,cashscope_bcmr=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether `serve` starts the HTTP API.
    #[serde(default = "default_true")]
    pub enable_rpc: bool,

    #[serde(default = "default_rpc_bind")]
    pub rpc_bind: String,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Whether the HTTP API exposes `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,
}

fn default_chaingraph_url() -> String {
    "https://gql.chaingraph.pat.mn/v1/graphql".to_string()
}

fn default_ipfs_gateway() -> String {
    "https://w3s.link/ipfs/".to_string()
}

fn default_otr_registry_url() -> String {
    cashscope_otr::DEFAULT_OTR_REGISTRY_URL.to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_rpc_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7090
}

impl ExplorerConfig {
    pub fn from_toml_file(path: &str) -> Result<Self, ExplorerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ExplorerError::Config(format!("{path}: {e}")))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ExplorerError> {
        toml::from_str(s).map_err(|e| ExplorerError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ExplorerError> {
        toml::to_string_pretty(self).map_err(|e| ExplorerError::Config(e.to_string()))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_format(&self) -> Result<LogFormat, ExplorerError> {
        self.log_format.parse()
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            chaingraph_url: default_chaingraph_url(),
            ipfs_gateway: default_ipfs_gateway(),
            otr_registry_url: default_otr_registry_url(),
            request_timeout_secs: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_rpc: default_true(),
            rpc_bind: default_rpc_bind(),
            rpc_port: default_rpc_port(),
            enable_metrics: false,
        }
    }
}
