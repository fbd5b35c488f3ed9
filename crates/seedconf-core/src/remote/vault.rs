//! HashiCorp Vault KV version 2 backend

use super::{SecretBackend, SourceKind};
use crate::{Error, Result, Settings};
use reqwest::blocking::Client;
use serde_json::{Value, json};

/// Mount used when none is configured.
pub const DEFAULT_VAULT_MOUNT: &str = "secret";

const DEFAULT_VAULT_PORT: u16 = 8200;
const TOKEN_HEADER: &str = "X-Vault-Token";

/// Turn a bare host into a full vault address.
///
/// `10.0.0.5` becomes `http://10.0.0.5:8200`. Addresses that already carry a
/// scheme or a port keep them.
pub fn normalize_vault_address(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    let (scheme, rest) = match host.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("http", host),
    };
    let has_port = rest
        .rsplit_once(':')
        .is_some_and(|(_, port)| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()));
    if has_port {
        format!("{scheme}://{rest}")
    } else {
        format!("{scheme}://{rest}:{DEFAULT_VAULT_PORT}")
    }
}

/// Reads and writes secrets through the vault HTTP API.
pub struct VaultBackend {
    client: Client,
    address: String,
    token: String,
    mount: String,
}

impl VaultBackend {
    pub fn new(address: &str, token: &str, mount: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::remote(SourceKind::Vault, e.to_string()))?;

        Ok(Self {
            client,
            address: normalize_vault_address(address),
            token: token.to_string(),
            mount: mount.trim_matches('/').to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn data_url(&self, path: &str) -> String {
        format!(
            "{}/v1/{}/data/{}",
            self.address,
            self.mount,
            path.trim_start_matches('/')
        )
    }

    fn fail(message: impl Into<String>) -> Error {
        Error::remote(SourceKind::Vault, message)
    }
}

impl SecretBackend for VaultBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::Vault
    }

    fn read(&self, path: &str) -> Result<Settings> {
        let response = self
            .client
            .get(self.data_url(path))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .map_err(|e| Self::fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::fail(format!("GET {path} returned {status}")));
        }

        let body: Value = response.json().map_err(|e| Self::fail(e.to_string()))?;
        let data = &body["data"];

        let metadata = &data["metadata"];
        let deleted = metadata["destroyed"].as_bool().unwrap_or(false)
            || metadata["deletion_time"].as_str().is_some_and(|t| !t.is_empty());
        if deleted {
            return Err(Self::fail(format!("latest version of {path} is deleted")));
        }

        match &data["data"] {
            Value::Object(map) => Ok(map.clone().into_iter().collect()),
            _ => Err(Self::fail(format!("{path} has no secret data"))),
        }
    }

    fn write(&self, path: &str, data: &Settings) -> Result<()> {
        let response = self
            .client
            .post(self.data_url(path))
            .header(TOKEN_HEADER, &self.token)
            .json(&json!({ "data": data }))
            .send()
            .map_err(|e| Self::fail(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::fail(format!("POST {path} returned {status}")));
        }

        let version = response
            .json::<Value>()
            .ok()
            .and_then(|body| body["data"]["version"].as_u64());
        tracing::debug!(path, ?version, "Vault secret written");
        Ok(())
    }
}
