//! Configuration for the wallet client.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Result, WalletError};
use crate::rpc::{HttpTransport, Network, RpcGateway};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Network whose default node is used
    #[serde(default)]
    pub network: Network,

    /// Node URL overriding the network default
    pub host: Option<String>,

    /// Account store file
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Per-request timeout in seconds; no timeout when unset
    pub request_timeout_secs: Option<u64>,
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tz-wallet")
        .join("store.json")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            host: None,
            store_path: default_store_path(),
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            WalletError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: ClientConfig =
            toml::from_str(&content).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(host) = &self.host {
            if !(host.starts_with("http://") || host.starts_with("https://")) {
                return Err(WalletError::Config(format!(
                    "host must be an http(s) URL, got '{}'",
                    host
                )));
            }
        }

        if self.request_timeout_secs == Some(0) {
            return Err(WalletError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// The node URL in effect.
    pub fn node_host(&self) -> &str {
        self.host.as_deref().unwrap_or_else(|| self.network.host())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Build an HTTP gateway for the configured node.
    pub fn gateway(&self) -> Result<RpcGateway> {
        let transport = HttpTransport::new(self.request_timeout())?;
        Ok(RpcGateway::new(self.node_host(), Arc::new(transport)))
    }
}
