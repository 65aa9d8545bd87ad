//! Hosted-API feature flag sources.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde_json::Value;
use tracing::warn;

/// Boxed future type for flag lookups.
pub type FlagFuture<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Storage key of the hosted-API flag.
pub const HOSTED_API_KEY: &str = "hosted_api_enabled";

/// Source of the "use the hosted API" flag, read on every request.
pub trait HostedApiFlag: Send + Sync {
    /// Whether requests should go to the hosted API.
    fn use_hosted_api(&self) -> FlagFuture<'_>;
}

/// Flag with a fixed value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticFlag(pub bool);

impl HostedApiFlag for StaticFlag {
    fn use_hosted_api(&self) -> FlagFuture<'_> {
        let enabled = self.0;
        Box::pin(async move { enabled })
    }
}

/// Flag read from a local JSON key/value file.
///
/// The file is re-read on every call so toggles take effect without a
/// restart. A missing or unreadable file counts as disabled.
#[derive(Clone, Debug)]
pub struct LocalFlagStore {
    path: PathBuf,
}

impl LocalFlagStore {
    /// Create a flag store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_flag(&self) -> Option<bool> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Failed to read flag store");
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Flag store is not valid JSON");
                return None;
            }
        };
        match value.get(HOSTED_API_KEY)? {
            Value::Bool(enabled) => Some(*enabled),
            Value::String(text) => Some(text == "true"),
            _ => Some(false),
        }
    }
}

impl HostedApiFlag for LocalFlagStore {
    fn use_hosted_api(&self) -> FlagFuture<'_> {
        Box::pin(async move { self.read_flag().await.unwrap_or(false) })
    }
}
