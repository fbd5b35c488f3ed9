//! Initialization orchestrator
//!
//! Builds a fully resolved [`SettingsStore`] for one team and environment:
//!
//! 1. layered team settings (common section, then environment section)
//! 2. prefixed environment variables, when detection is on
//! 3. remote secrets: sync the cache, merge the cached entry, then merge the
//!    fresh remote read last
//!
//! Each step overrides the previous one key by key.

use crate::layering::LayeredSource;
use crate::layout::ProjectLayout;
use crate::remote::{RemoteParams, RemoteSource, SourceKind, keys};
use crate::source::{EnvSource, Source};
use crate::store::SettingsStore;
use crate::sync::{SecretSync, SyncDirection, read_cached};
use crate::team::{Environment, TeamKey};
use crate::{Error, Result};
use std::path::Path;

/// Store keys consulted when building remote connection parameters.
pub mod settings_keys {
    pub const VAULT_HOST: &str = "SEED_CONF_VAULT_HOST_IP";
    pub const VAULT_TOKEN: &str = "SEED_CONF_VAULT_KEY";
    pub const VAULT_MOUNT: &str = "SEED_CONF_VAULT_MOUNT";
    pub const AWS_REGION: &str = "SEED_CONF_AWS_REGION";
    pub const AWS_ENDPOINT_URL: &str = "SEED_CONF_AWS_ENDPOINT_URL";
}

/// What to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRequest {
    pub team_key: String,
    pub environment: String,
    /// Import prefixed process environment variables
    pub detect_env_vars: bool,
    /// Remote backend to synchronize with, if any
    pub remote_config_src_type: Option<SourceKind>,
    /// Push the local cache to the remote instead of pulling from it
    pub allow_remote_update: bool,
}

impl ConfigRequest {
    pub fn new(team_key: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            team_key: team_key.into(),
            environment: environment.into(),
            detect_env_vars: false,
            remote_config_src_type: None,
            allow_remote_update: false,
        }
    }

    pub fn detect_env_vars(mut self, detect: bool) -> Self {
        self.detect_env_vars = detect;
        self
    }

    pub fn remote(mut self, kind: SourceKind) -> Self {
        self.remote_config_src_type = Some(kind);
        self
    }

    pub fn allow_remote_update(mut self, allow: bool) -> Self {
        self.allow_remote_update = allow;
        self
    }
}

/// Runs the resolution pipeline inside one project.
#[derive(Debug, Clone)]
pub struct Initializer {
    layout: ProjectLayout,
    env: EnvSource,
}

impl Initializer {
    /// Initializer reading the process environment with the project's prefix.
    pub fn new(layout: ProjectLayout) -> Self {
        let env = EnvSource::with_prefix(layout.config().env_prefix.clone());
        Self { layout, env }
    }

    /// Replace the environment variable source.
    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Resolve `request` into a fresh store.
    ///
    /// The team settings file must exist; nothing is loaded otherwise.
    pub fn initialize(&self, request: &ConfigRequest) -> Result<SettingsStore> {
        let team = TeamKey::parse(&request.team_key)?;
        let environment = Environment::new(&request.environment)?;

        let settings_file = self.layout.settings_file(&team);
        if !settings_file.exists() {
            return Err(Error::SettingsNotFound {
                path: settings_file.to_native(),
            });
        }

        let store = SettingsStore::new();
        store.load(&LayeredSource::new(
            settings_file,
            environment.as_str(),
            self.layout.config().common_section.as_str(),
        ))?;

        if request.detect_env_vars {
            let before = store.len();
            store.load(&self.env)?;
            tracing::debug!(
                prefix = self.env.prefix(),
                added = store.len().saturating_sub(before),
                "Merged environment variables"
            );
        }

        if let Some(kind) = request.remote_config_src_type {
            self.load_remote(&store, kind, &team, &environment, request.allow_remote_update)?;
        }

        tracing::info!(
            team = %team,
            environment = %environment,
            keys = store.len(),
            "Configuration resolved"
        );
        Ok(store)
    }

    fn load_remote(
        &self,
        store: &SettingsStore,
        kind: SourceKind,
        team: &TeamKey,
        environment: &Environment,
        allow_remote_update: bool,
    ) -> Result<()> {
        let params = remote_params(store, kind, &team.remote_path(environment));
        let sync = SecretSync::new(RemoteSource::new(kind, &params)?);

        let cache_file = self.layout.secrets_file(team);
        let outcome = sync.reconcile(&cache_file, environment.as_str(), allow_remote_update)?;
        store.merge(read_cached(&cache_file, environment.as_str())?);

        // A pull already fetched the current remote state
        let fresh = match outcome.direction {
            SyncDirection::Pull => outcome.secrets,
            SyncDirection::Push => sync.remote().load()?,
        };
        tracing::debug!(%kind, keys = fresh.len(), "Merged remote secrets");
        store.merge(fresh);
        Ok(())
    }
}

/// Connection parameters for `kind`, drawn from already-resolved settings.
///
/// Missing values are left out so that [`RemoteSource::new`] reports them.
pub fn remote_params(store: &SettingsStore, kind: SourceKind, remote_path: &str) -> RemoteParams {
    let mut params = RemoteParams::new();
    let mut copy = |from: &str, to: &str| {
        if let Some(value) = store.get_str(from) {
            params.insert(to, value);
        }
    };

    match kind {
        SourceKind::Vault => {
            copy(settings_keys::VAULT_HOST, keys::VAULT_URL);
            copy(settings_keys::VAULT_TOKEN, keys::VAULT_TOKEN);
            copy(settings_keys::VAULT_MOUNT, keys::VAULT_MOUNT);
            params.insert(keys::ENV_SECRET_PATH, remote_path);
        }
        SourceKind::SecretsManager | SourceKind::ParameterStore => {
            copy(settings_keys::AWS_REGION, keys::REGION);
            copy(settings_keys::AWS_ENDPOINT_URL, keys::ENDPOINT_URL);
            let name_key = if kind == SourceKind::SecretsManager {
                keys::SECRET_NAME
            } else {
                keys::PARAMETER_NAME
            };
            params.insert(name_key, remote_path);
        }
    }
    params
}

/// Discover the project containing `start_dir` and resolve `request` in it.
pub fn initialize_config(start_dir: &Path, request: &ConfigRequest) -> Result<SettingsStore> {
    Initializer::new(ProjectLayout::discover(start_dir)?).initialize(request)
}
