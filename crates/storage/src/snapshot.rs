// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store persisted as a JSON snapshot after every mutation.
//!
//! Writes go to a temporary file that is renamed over the snapshot. A
//! snapshot that cannot be parsed on open is moved aside to a rotated
//! `.bak` path and the store starts empty.

use crate::memory::MemoryJobStore;
use crate::store::{JobStore, StoreError};
use crate::table::JobTable;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nb_core::{BuildJob, BuildRequest, Clock, JobId, JobPatch, SystemClock};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current snapshot schema version
pub const CURRENT_SNAPSHOT_VERSION: u32 = 1;

const MAX_BAK_FILES: u32 = 3;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "v")]
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub table: JobTable,
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// Read the snapshot at `path`.
///
/// Missing file → empty table. Unparseable file → moved aside, empty table.
pub fn load_snapshot(path: &Path) -> Result<JobTable, SnapshotError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(JobTable::default()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_slice::<Snapshot>(&bytes) {
        Ok(snapshot) if snapshot.version > CURRENT_SNAPSHOT_VERSION => Err(SnapshotError::UnsupportedVersion {
            found: snapshot.version,
            supported: CURRENT_SNAPSHOT_VERSION,
        }),
        Ok(snapshot) => {
            tracing::info!(path = %path.display(), jobs = snapshot.table.len(), saved_at = %snapshot.saved_at, "loaded job snapshot");
            Ok(snapshot.table)
        }
        Err(e) => {
            let bak = rotate_bak_path(path);
            tracing::warn!(path = %path.display(), bak = %bak.display(), error = %e, "corrupt job snapshot, moving aside");
            fs::rename(path, &bak)?;
            Ok(JobTable::default())
        }
    }
}

fn write_snapshot(path: &Path, table: JobTable) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let snapshot = Snapshot { version: CURRENT_SNAPSHOT_VERSION, saved_at: Utc::now(), table };
    let json = serde_json::to_vec(&snapshot)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// [`MemoryJobStore`] semantics, persisted to `path`.
pub struct SnapshotJobStore<C: Clock = SystemClock> {
    path: PathBuf,
    inner: MemoryJobStore<C>,
    /// Serializes writers so the newest table is always written last.
    write_lock: Mutex<()>,
}

impl SnapshotJobStore<SystemClock> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SnapshotError> {
        Self::open_with_clock(path, SystemClock)
    }
}

impl<C: Clock> SnapshotJobStore<C> {
    pub fn open_with_clock(path: impl Into<PathBuf>, clock: C) -> Result<Self, SnapshotError> {
        let path = path.into();
        let table = load_snapshot(&path)?;
        Ok(Self { path, inner: MemoryJobStore::from_table(table, clock), write_lock: Mutex::new(()) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current table. Failures are logged; the in-memory state
    /// stays authoritative and the next mutation retries the write.
    fn persist(&self) {
        let _guard = self.write_lock.lock();
        if let Err(e) = write_snapshot(&self.path, self.inner.table()) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write job snapshot");
        }
    }
}

#[async_trait]
impl<C: Clock> JobStore for SnapshotJobStore<C> {
    async fn submit(&self, request: BuildRequest) -> Result<BuildJob, StoreError> {
        let job = self.inner.submit(request).await?;
        self.persist();
        Ok(job)
    }

    async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, StoreError> {
        let job = self.inner.claim_now(runner);
        if job.is_some() {
            self.persist();
        }
        Ok(job)
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, StoreError> {
        let job = self.inner.update_now(id, patch)?;
        self.persist();
        Ok(job)
    }

    async fn get(&self, id: &JobId) -> Result<Option<BuildJob>, StoreError> {
        self.inner.get(id).await
    }

    async fn list(&self) -> Result<Vec<BuildJob>, StoreError> {
        self.inner.list().await
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
