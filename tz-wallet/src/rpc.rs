//! Node RPC Gateway
//!
//! Every node call is a `POST` of a JSON body to `host + path`; reads send an
//! empty object. The HTTP layer sits behind [`RpcTransport`] so the gateway
//! can be driven by a scripted node in tests.
//!
//! The gateway does not retry and does not enforce timeouts. A request
//! timeout, when configured, belongs to the transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr, sync::Arc, time::Duration};
use tracing::debug;

use crate::error::{Result, WalletError};

/// Node error identifiers that mean the forge context went stale.
const STALE_MARKERS: &[&str] = &[
    "counter_in_the_past",
    "counter_in_the_future",
    "unknown_branch",
    "unknown_block",
    "outdated",
];

/// Known public networks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Alphanet,
    #[default]
    Zeronet,
}

impl Network {
    /// Default node host for this network.
    pub fn host(&self) -> &'static str {
        match self {
            Network::Alphanet => "https://teznode.catsigma.com",
            Network::Zeronet => "https://zeronet.catsigma.com",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Alphanet => write!(f, "alphanet"),
            Network::Zeronet => write!(f, "zeronet"),
        }
    }
}

impl FromStr for Network {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alphanet" => Ok(Network::Alphanet),
            "zeronet" => Ok(Network::Zeronet),
            other => Err(WalletError::Config(format!("unknown network: {}", other))),
        }
    }
}

/// Raw reply from a transport: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcResponse {
    pub status: u16,
    pub body: String,
}

impl RpcResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POST-JSON transport to a node.
///
/// Implementations report only transport failures (connection refused, TLS,
/// timeout) as errors; any HTTP reply, successful or not, is returned as an
/// [`RpcResponse`] for the gateway to classify.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post(&self, url: &str, body: &Value) -> Result<RpcResponse>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport, optionally bounding every request by `timeout`.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WalletError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, url: &str, body: &Value) -> Result<RpcResponse> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        Ok(RpcResponse { status, body })
    }
}

/// Issues node calls against a configurable host.
#[derive(Clone)]
pub struct RpcGateway {
    host: String,
    transport: Arc<dyn RpcTransport>,
}

impl RpcGateway {
    pub fn new(host: impl Into<String>, transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Gateway for a known network over HTTP.
    pub fn for_network(network: Network, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::new(
            network.host(),
            Arc::new(HttpTransport::new(timeout)?),
        ))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Point subsequent calls at another host.
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into().trim_end_matches('/').to_string();
    }

    /// POST `body` to `path` and return the parsed reply.
    pub async fn call(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.host, path);
        debug!("RPC POST {}", url);

        let response = self.transport.post(&url, body).await?;
        classify_response(path, response)
    }
}

impl fmt::Debug for RpcGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcGateway")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

fn classify_response(path: &str, response: RpcResponse) -> Result<Value> {
    let parsed = serde_json::from_str::<Value>(&response.body);

    if !response.is_success() {
        if let Ok(value) = &parsed {
            if let Some(err) = node_error(value) {
                return Err(err);
            }
        }
        let body = response.body.trim();
        return Err(WalletError::RemoteValidation(if body.is_empty() {
            format!("{} returned HTTP {}", path, response.status)
        } else {
            format!("{} returned HTTP {}: {}", path, response.status, body)
        }));
    }

    let value = parsed.map_err(|e| {
        WalletError::MalformedResponse(format!("{} returned invalid JSON: {}", path, e))
    })?;
    match node_error(&value) {
        Some(err) => Err(err),
        None => Ok(value),
    }
}

/// Recognise a node error payload: `{"error": ...}` or a list of
/// `{"kind", "id"}` error objects.
fn node_error(value: &Value) -> Option<WalletError> {
    let errors = match value {
        Value::Object(map) => map.get("error")?,
        Value::Array(items) if !items.is_empty() && items.iter().all(is_error_object) => value,
        _ => return None,
    };

    let message = describe_errors(errors);
    let mut ids = Vec::new();
    error_ids(errors, &mut ids);
    if ids
        .iter()
        .any(|id| STALE_MARKERS.iter().any(|marker| id.contains(marker)))
    {
        Some(WalletError::StaleContext(message))
    } else {
        Some(WalletError::RemoteValidation(message))
    }
}

fn is_error_object(value: &Value) -> bool {
    value.get("kind").is_some_and(Value::is_string) && value.get("id").is_some_and(Value::is_string)
}

/// Collect the `id` of every error object in `errors`.
fn error_ids<'a>(errors: &'a Value, ids: &mut Vec<&'a str>) {
    match errors {
        Value::Array(items) => items.iter().for_each(|item| error_ids(item, ids)),
        Value::Object(map) => {
            if let Some(id) = map.get("id").and_then(Value::as_str) {
                ids.push(id);
            }
        }
        _ => {}
    }
}

fn describe_errors(errors: &Value) -> String {
    match errors {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(describe_errors)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) => match (map.get("id").and_then(Value::as_str), map.get("msg")) {
            (Some(id), Some(Value::String(msg))) => format!("{}: {}", id, msg),
            (Some(id), _) => id.to_string(),
            _ => errors.to_string(),
        },
        other => other.to_string(),
    }
}
