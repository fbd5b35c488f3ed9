//! Remote secret sources
//!
//! A [`RemoteSource`] pairs a [`SourceKind`] with a [`SecretBackend`] and the
//! kind-specific target (secret name, parameter name or vault path). Required
//! parameters are checked when the source is built, so configuration mistakes
//! surface before any network call.

mod aws;
mod memory;
mod vault;

pub use aws::{ParameterStoreBackend, SecretsManagerBackend};
pub use memory::MemoryBackend;
pub use vault::{DEFAULT_VAULT_MOUNT, VaultBackend, normalize_vault_address};

use crate::source::Source;
use crate::{Error, Result, Settings};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which remote backend a source talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    SecretsManager,
    ParameterStore,
    Vault,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecretsManager => "secrets_manager",
            Self::ParameterStore => "parameter_store",
            Self::Vault => "vault",
        }
    }

    /// Parameters that must be present and non-empty for this kind.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            Self::SecretsManager => &[keys::SECRET_NAME],
            Self::ParameterStore => &[keys::PARAMETER_NAME],
            Self::Vault => &[keys::VAULT_URL, keys::VAULT_TOKEN, keys::ENV_SECRET_PATH],
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "secrets_manager" | "aws_secrets_manager" => Ok(Self::SecretsManager),
            "parameter_store" | "aws_parameter_store" => Ok(Self::ParameterStore),
            "vault" => Ok(Self::Vault),
            _ => Err(Error::UnsupportedSource { kind: s.to_string() }),
        }
    }
}

/// Parameter names understood by [`RemoteParams`].
pub mod keys {
    pub const VAULT_URL: &str = "vault_url";
    pub const VAULT_TOKEN: &str = "vault_token";
    pub const VAULT_MOUNT: &str = "vault_mount";
    pub const ENV_SECRET_PATH: &str = "env_secret_path";
    pub const SECRET_NAME: &str = "secret_name";
    pub const PARAMETER_NAME: &str = "parameter_name";
    pub const REGION: &str = "region";
    pub const ENDPOINT_URL: &str = "endpoint_url";
}

/// Connection parameters for a remote source.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RemoteParams {
    values: BTreeMap<String, String>,
}

impl RemoteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    fn require(&self, kind: SourceKind, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::MissingParameter {
            kind: kind.to_string(),
            parameter: key.to_string(),
        })
    }

    /// Fail unless every parameter required by `kind` is present.
    pub fn validate(&self, kind: SourceKind) -> Result<()> {
        for key in kind.required_parameters() {
            self.require(kind, key)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RemoteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// Tokens must never reach log output
impl fmt::Debug for RemoteParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: BTreeMap<&str, &str> = self
            .values
            .iter()
            .map(|(k, v)| {
                let shown = if k == keys::VAULT_TOKEN { "***" } else { v.as_str() };
                (k.as_str(), shown)
            })
            .collect();
        f.debug_struct("RemoteParams").field("values", &redacted).finish()
    }
}

/// A remote store of secrets.
pub trait SecretBackend: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Read the mapping stored at `path`.
    fn read(&self, path: &str) -> Result<Settings>;

    /// Store `data` at `path` as a new secret version.
    fn write(&self, path: &str, data: &Settings) -> Result<()> {
        let _ = (path, data);
        Err(Error::RemoteWriteUnsupported {
            kind: self.kind().to_string(),
        })
    }
}

/// Loads settings from one remote secret.
pub struct RemoteSource {
    kind: SourceKind,
    target: String,
    backend: Box<dyn SecretBackend>,
}

impl RemoteSource {
    /// Build a source for `kind` from connection parameters.
    ///
    /// Fails with a configuration error if a required parameter is missing.
    /// No network call is made here.
    pub fn new(kind: SourceKind, params: &RemoteParams) -> Result<Self> {
        params.validate(kind)?;

        let region = params.get(keys::REGION).map(str::to_string);
        let endpoint_url = params.get(keys::ENDPOINT_URL).map(str::to_string);

        let (target, backend): (String, Box<dyn SecretBackend>) = match kind {
            SourceKind::SecretsManager => (
                params.require(kind, keys::SECRET_NAME)?.to_string(),
                Box::new(SecretsManagerBackend::new(region, endpoint_url)),
            ),
            SourceKind::ParameterStore => (
                qualify_parameter_name(params.require(kind, keys::PARAMETER_NAME)?),
                Box::new(ParameterStoreBackend::new(region, endpoint_url)),
            ),
            SourceKind::Vault => {
                let path = trim_path(params.require(kind, keys::ENV_SECRET_PATH)?);
                if path.is_empty() {
                    return Err(Error::MissingParameter {
                        kind: kind.to_string(),
                        parameter: keys::ENV_SECRET_PATH.to_string(),
                    });
                }
                let backend = VaultBackend::new(
                    params.require(kind, keys::VAULT_URL)?,
                    params.require(kind, keys::VAULT_TOKEN)?,
                    params.get(keys::VAULT_MOUNT).unwrap_or(DEFAULT_VAULT_MOUNT),
                )?;
                (path.to_string(), Box::new(backend))
            }
        };

        Ok(Self::with_backend(target, backend))
    }

    /// Build a source around an existing backend.
    pub fn with_backend(target: impl Into<String>, backend: Box<dyn SecretBackend>) -> Self {
        Self {
            kind: backend.kind(),
            target: target.into(),
            backend,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Secret name, parameter name or vault path this source reads.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Write `data` to the vault backend at `path` as a new secret version.
    pub fn store(&self, data: &Settings, path: &str) -> Result<()> {
        if self.kind != SourceKind::Vault {
            return Err(Error::RemoteWriteUnsupported {
                kind: self.kind.to_string(),
            });
        }
        let path = trim_path(path);
        tracing::info!(kind = %self.kind, path, keys = data.len(), "Storing secrets");
        self.backend.write(path, data)
    }
}

impl Source for RemoteSource {
    fn load(&self) -> Result<Settings> {
        tracing::debug!(kind = %self.kind, target = %self.target, "Reading remote secrets");
        match self.kind {
            // A missing or deleted vault secret only means fewer settings
            SourceKind::Vault => match self.backend.read(&self.target) {
                Ok(secrets) => Ok(secrets),
                Err(e) => {
                    tracing::warn!(
                        path = %self.target,
                        error = %e,
                        "Vault read failed, continuing without remote secrets"
                    );
                    Ok(Settings::new())
                }
            },
            SourceKind::SecretsManager | SourceKind::ParameterStore => {
                self.backend.read(&self.target)
            }
        }
    }

    fn describe(&self) -> &'static str {
        match self.kind {
            SourceKind::SecretsManager => "remote:secrets_manager",
            SourceKind::ParameterStore => "remote:parameter_store",
            SourceKind::Vault => "remote:vault",
        }
    }
}

impl fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSource")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// SSM only accepts hierarchical names in their fully qualified `/a/b` form.
fn qualify_parameter_name(name: &str) -> String {
    if name.contains('/') && !name.starts_with('/') {
        format!("/{name}")
    } else {
        name.to_string()
    }
}

fn trim_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("secrets_manager", SourceKind::SecretsManager)]
    #[case("aws_secrets_manager", SourceKind::SecretsManager)]
    #[case("parameter_store", SourceKind::ParameterStore)]
    #[case("aws_parameter_store", SourceKind::ParameterStore)]
    #[case("vault", SourceKind::Vault)]
    #[case(" Vault ", SourceKind::Vault)]
    fn parses_source_kinds(#[case] input: &str, #[case] expected: SourceKind) {
        assert_eq!(input.parse::<SourceKind>().unwrap(), expected);
    }

    #[test]
    fn unsupported_kind_is_configuration_error() {
        let err = "unsupported_source".parse::<SourceKind>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedSource { kind } if kind == "unsupported_source"));
    }

    #[rstest]
    #[case(SourceKind::Vault, "vault_url")]
    #[case(SourceKind::SecretsManager, "secret_name")]
    #[case(SourceKind::ParameterStore, "parameter_name")]
    fn missing_required_parameter_fails_fast(#[case] kind: SourceKind, #[case] parameter: &str) {
        let err = RemoteSource::new(kind, &RemoteParams::new()).unwrap_err();
        assert!(
            matches!(&err, Error::MissingParameter { parameter: p, .. } if p == parameter),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn blank_vault_path_is_rejected() {
        let params = RemoteParams::new()
            .with(keys::VAULT_URL, "http://127.0.0.1:8200")
            .with(keys::VAULT_TOKEN, "root")
            .with(keys::ENV_SECRET_PATH, "///");

        let err = RemoteSource::new(SourceKind::Vault, &params).unwrap_err();
        assert!(matches!(err, Error::MissingParameter { .. }));
    }

    #[test]
    fn vault_target_has_leading_slash_stripped() {
        let params = RemoteParams::new()
            .with(keys::VAULT_URL, "http://127.0.0.1:8200")
            .with(keys::VAULT_TOKEN, "root")
            .with(keys::ENV_SECRET_PATH, "/org/team/dev/secrets");

        let source = RemoteSource::new(SourceKind::Vault, &params).unwrap();
        assert_eq!(source.target(), "org/team/dev/secrets");
    }

    #[rstest]
    #[case("org/team/dev/secrets", "/org/team/dev/secrets")]
    #[case("/org/team/dev/secrets", "/org/team/dev/secrets")]
    #[case("db_password", "db_password")]
    fn parameter_names_are_fully_qualified(#[case] name: &str, #[case] expected: &str) {
        let params = RemoteParams::new().with(keys::PARAMETER_NAME, name);

        let source = RemoteSource::new(SourceKind::ParameterStore, &params).unwrap();

        assert_eq!(source.target(), expected);
    }

    #[test]
    fn debug_output_redacts_token() {
        let params = RemoteParams::new().with(keys::VAULT_TOKEN, "s.supersecret");
        let rendered = format!("{params:?}");
        assert!(!rendered.contains("supersecret"));
    }

    #[test]
    fn vault_read_failure_yields_empty_settings() {
        let backend = MemoryBackend::new(SourceKind::Vault).failing_reads();
        let source = RemoteSource::with_backend("org/team/dev/secrets", Box::new(backend));

        assert_eq!(source.load().unwrap(), Settings::new());
    }

    #[test]
    fn parameter_store_failure_is_propagated() {
        let backend = MemoryBackend::new(SourceKind::ParameterStore).failing_reads();
        let source = RemoteSource::with_backend("/org/team/dev", Box::new(backend));

        assert!(source.load().is_err());
    }

    #[test]
    fn store_writes_through_vault_backend() {
        let backend = MemoryBackend::new(SourceKind::Vault);
        let source = RemoteSource::with_backend("ignored", Box::new(backend.clone()));
        let data: Settings = [("api_key".to_string(), json!("abc"))].into_iter().collect();

        source.store(&data, "/org/team/dev/secrets").unwrap();

        assert_eq!(backend.secret("org/team/dev/secrets"), Some(data));
    }

    #[test]
    fn store_is_rejected_for_non_vault_kinds() {
        let backend = MemoryBackend::new(SourceKind::SecretsManager);
        let source = RemoteSource::with_backend("name", Box::new(backend.clone()));

        let err = source.store(&Settings::new(), "org/team/dev/secrets").unwrap_err();

        assert!(matches!(err, Error::RemoteWriteUnsupported { .. }));
        assert_eq!(backend.write_count(), 0);
    }
}
