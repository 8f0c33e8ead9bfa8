//! Sources for the upstream API key.
//!
//! The key is resolved on every request, so a missing key surfaces as a
//! per-request failure instead of refusing to start.

use std::env;

pub trait CredentialProvider: Send + Sync {
    /// Name reported when the key is absent, e.g. `CLAUDE_API_KEY`.
    fn name(&self) -> &str;

    fn api_key(&self) -> Option<String>;
}

/// Reads the key from an environment variable. Empty values count as absent.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredential {
    fn name(&self) -> &str {
        &self.var
    }

    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|key| !key.is_empty())
    }
}

/// A fixed key, or a fixed absence of one.
#[derive(Debug, Clone)]
pub struct StaticCredential {
    name: String,
    key: Option<String>,
}

impl StaticCredential {
    pub fn new(name: impl Into<String>, key: Option<String>) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    pub fn present(key: impl Into<String>) -> Self {
        Self::new("CLAUDE_API_KEY", Some(key.into()))
    }

    pub fn missing() -> Self {
        Self::new("CLAUDE_API_KEY", None)
    }
}

impl CredentialProvider for StaticCredential {
    fn name(&self) -> &str {
        &self.name
    }

    fn api_key(&self) -> Option<String> {
        self.key.clone()
    }
}
