//! AWS Secrets Manager and Systems Manager Parameter Store backends
//!
//! The SDK is async only. Each call runs on a private current-thread runtime
//! so the rest of the crate stays blocking.

use super::{SecretBackend, SourceKind};
use crate::{Error, Result, Settings};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ssm::config::Credentials;
use serde_json::Value;

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Io)
}

/// Connection settings shared by both AWS backends.
///
/// Unset fields fall back to the SDK's default provider chains.
#[derive(Debug, Clone, Default)]
struct AwsConnection {
    region: Option<String>,
    endpoint_url: Option<String>,
    credentials: Option<Credentials>,
}

impl AwsConnection {
    async fn sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(url) = &self.endpoint_url {
            loader = loader.endpoint_url(url);
        }
        if let Some(credentials) = &self.credentials {
            loader = loader.credentials_provider(credentials.clone());
        }
        loader.load().await
    }
}

/// Parse a secret string holding a JSON object.
pub(crate) fn parse_secret_string(kind: SourceKind, raw: &str) -> Result<Settings> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| Error::remote(kind, format!("invalid JSON: {e}")))?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(Error::remote(kind, "secret is not a JSON object")),
    }
}

/// Reads JSON secrets from AWS Secrets Manager.
#[derive(Debug, Clone, Default)]
pub struct SecretsManagerBackend {
    connection: AwsConnection,
}

impl SecretsManagerBackend {
    pub fn new(region: Option<String>, endpoint_url: Option<String>) -> Self {
        Self {
            connection: AwsConnection {
                region,
                endpoint_url,
                credentials: None,
            },
        }
    }

    /// Use a fixed key pair instead of the default credential chain.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.connection.credentials = Some(credentials);
        self
    }
}

impl SecretBackend for SecretsManagerBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::SecretsManager
    }

    fn read(&self, name: &str) -> Result<Settings> {
        use aws_sdk_secretsmanager::error::DisplayErrorContext;

        let kind = self.kind();
        runtime()?.block_on(async {
            let config = self.connection.sdk_config().await;
            let client = aws_sdk_secretsmanager::Client::new(&config);

            let response = client
                .get_secret_value()
                .secret_id(name)
                .send()
                .await
                .map_err(|e| Error::remote(kind, DisplayErrorContext(&e).to_string()))?;

            let raw = response
                .secret_string()
                .ok_or_else(|| Error::remote(kind, format!("secret {name} has no string value")))?;
            parse_secret_string(kind, raw)
        })
    }
}

/// Reads a single decrypted parameter from SSM Parameter Store.
///
/// The result maps the parameter name to its value.
#[derive(Debug, Clone, Default)]
pub struct ParameterStoreBackend {
    connection: AwsConnection,
}

impl ParameterStoreBackend {
    pub fn new(region: Option<String>, endpoint_url: Option<String>) -> Self {
        Self {
            connection: AwsConnection {
                region,
                endpoint_url,
                credentials: None,
            },
        }
    }

    /// Use a fixed key pair instead of the default credential chain.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.connection.credentials = Some(credentials);
        self
    }
}

impl SecretBackend for ParameterStoreBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::ParameterStore
    }

    fn read(&self, name: &str) -> Result<Settings> {
        use aws_sdk_ssm::error::DisplayErrorContext;

        let kind = self.kind();
        runtime()?.block_on(async {
            let config = self.connection.sdk_config().await;
            let client = aws_sdk_ssm::Client::new(&config);

            let response = client
                .get_parameter()
                .name(name)
                .with_decryption(true)
                .send()
                .await
                .map_err(|e| Error::remote(kind, DisplayErrorContext(&e).to_string()))?;

            let value = response
                .parameter()
                .and_then(|p| p.value())
                .ok_or_else(|| Error::remote(kind, format!("parameter {name} has no value")))?;

            let mut settings = Settings::new();
            settings.insert(name.to_string(), Value::String(value.to_string()));
            Ok(settings)
        })
    }
}
