//! Secret synchronization between the local cache file and a remote source
//!
//! Each resolution reconciles once, in one direction:
//! - **push** copies the cached entry for the environment to the remote
//! - **pull** replaces the cache file with the remote's current secrets
//!
//! There is no locking across resolutions beyond the atomic rename of the
//! cache file. Callers serialize access per team and environment.

pub mod cache;

use crate::remote::RemoteSource;
use crate::source::Source;
use crate::{Result, Settings};
use seedconf_fs::NormalizedPath;
use std::fmt;

/// Which way secrets flowed during a reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    Push,
    Pull,
}

impl SyncDirection {
    pub fn from_allow_remote_update(allow_remote_update: bool) -> Self {
        if allow_remote_update { Self::Push } else { Self::Pull }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => f.write_str("push"),
            Self::Pull => f.write_str("pull"),
        }
    }
}

/// Result of one reconcile.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub direction: SyncDirection,
    /// What was pushed or fetched; empty when a push had nothing to send
    pub secrets: Settings,
}

/// Reconciles a team's secrets cache with a remote source.
#[derive(Debug)]
pub struct SecretSync {
    remote: RemoteSource,
}

impl SecretSync {
    pub fn new(remote: RemoteSource) -> Self {
        Self { remote }
    }

    pub fn remote(&self) -> &RemoteSource {
        &self.remote
    }

    /// Run one sync for `environment` against `cache_file`.
    ///
    /// Pushes go to the remote source's own environment-scoped path. A pull
    /// rewrites the cache so it holds exactly one entry, for `environment`.
    pub fn reconcile(
        &self,
        cache_file: &NormalizedPath,
        environment: &str,
        allow_remote_update: bool,
    ) -> Result<SyncOutcome> {
        let direction = SyncDirection::from_allow_remote_update(allow_remote_update);
        tracing::info!(
            %direction,
            environment,
            kind = %self.remote.kind(),
            path = %self.remote.target(),
            "Synchronizing secrets"
        );

        let secrets = match direction {
            SyncDirection::Push => match cache::read_entry(cache_file, environment)? {
                Some(secrets) => {
                    self.remote.store(&secrets, self.remote.target())?;
                    secrets
                }
                None => {
                    tracing::info!(
                        cache = %cache_file,
                        environment,
                        "No cached secrets for environment, nothing to push"
                    );
                    Settings::new()
                }
            },
            SyncDirection::Pull => {
                let fetched = self.remote.load()?;
                cache::overwrite(cache_file, environment, &fetched)?;
                tracing::debug!(cache = %cache_file, keys = fetched.len(), "Secrets cache rewritten");
                fetched
            }
        };

        Ok(SyncOutcome { direction, secrets })
    }
}

/// Cached secrets for `environment`; empty when the file or entry is absent.
pub fn read_cached(cache_file: &NormalizedPath, environment: &str) -> Result<Settings> {
    Ok(cache::read_entry(cache_file, environment)?.unwrap_or_default())
}
