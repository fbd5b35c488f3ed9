use super::{SecretBackend, SourceKind};
use crate::{Error, Result, Settings};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
struct Inner {
    secrets: Mutex<BTreeMap<String, Settings>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

/// In-process secret store.
///
/// Clones share state, so a caller can keep a handle after boxing one into a
/// [`RemoteSource`](super::RemoteSource) and inspect what was read or written.
#[derive(Clone)]
pub struct MemoryBackend {
    kind: SourceKind,
    fail_reads: bool,
    inner: Arc<Inner>,
}

impl MemoryBackend {
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            fail_reads: false,
            inner: Arc::default(),
        }
    }

    /// Seed a secret at `path`.
    pub fn with_secret(self, path: impl Into<String>, data: Settings) -> Self {
        self.lock().insert(path.into(), data);
        self
    }

    /// Make every read fail as an unreachable backend would.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn secret(&self, path: &str) -> Option<Settings> {
        self.lock().get(path).cloned()
    }

    pub fn read_count(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Settings>> {
        self.inner
            .secrets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl SecretBackend for MemoryBackend {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn read(&self, path: &str) -> Result<Settings> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(Error::remote(self.kind, "backend unavailable"));
        }
        self.lock()
            .get(path)
            .cloned()
            .ok_or_else(|| Error::remote(self.kind, format!("no secret at {path}")))
    }

    fn write(&self, path: &str, data: &Settings) -> Result<()> {
        if self.kind != SourceKind::Vault {
            return Err(Error::RemoteWriteUnsupported {
                kind: self.kind.to_string(),
            });
        }
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.lock().insert(path.to_string(), data.clone());
        Ok(())
    }
}
