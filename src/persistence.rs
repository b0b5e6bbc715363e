//! Persistence adapter and snapshot codec.
//!
//! DESIGN
//! ======
//! The engine only knows an opaque async blob store ([`BlobStore`]). A
//! snapshot is the camera plus the bookmark list, JSON-encoded with every
//! decimal as a string so no digits are lost.
//!
//! Writes and reads that fail are returned to the caller; the engine keeps
//! running in memory. A blob that cannot be decoded, or decodes to an
//! invalid camera, is replaced as a whole by the default snapshot.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::bookmark::Bookmark;
use crate::camera::Camera;
use crate::config::CameraConfig;
use crate::error::PersistenceError;
use crate::precision::{Scalar, Vector2};

/// Key the engine snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "deepzoom-snapshot";

/// Opaque async blob storage.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `blob` under `key`, replacing any previous value.
    async fn save(&self, key: &str, blob: Vec<u8>) -> Result<(), PersistenceError>;

    /// Fetch the blob under `key`, `None` when nothing was stored.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError>;
}

/// Process-local store, mostly for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn save(&self, key: &str, blob: Vec<u8>) -> Result<(), PersistenceError> {
        self.blobs.lock().await.insert(key.to_owned(), blob);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }
}

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn save(&self, key: &str, blob: Vec<u8>) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, blob).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSnapshot {
    pub pos: Vector2,
    pub target_range: Scalar,
    pub range: Scalar,
}

/// Everything the navigation core persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub camera: CameraSnapshot,
    pub bookmarks: Vec<Bookmark>,
}

impl Snapshot {
    /// Capture the camera's current view and the bookmark list.
    #[must_use]
    pub fn capture(camera: &Camera, bookmarks: &[Bookmark]) -> Self {
        Self {
            camera: CameraSnapshot {
                pos: camera.pos.clone(),
                target_range: camera.target_range.clone(),
                range: camera.range.clone(),
            },
            bookmarks: bookmarks.to_vec(),
        }
    }

    /// Origin, default range, no bookmarks.
    #[must_use]
    pub fn fallback(bounds: &CameraConfig) -> Self {
        let range = bounds.clamp_range(&bounds.default_range);
        Self {
            camera: CameraSnapshot { pos: Vector2::zero(), target_range: range.clone(), range },
            bookmarks: Vec::new(),
        }
    }

    /// # Errors
    ///
    /// Returns [`PersistenceError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode a stored blob. Anything missing, unparseable, or with a
    /// non-positive range yields [`Snapshot::fallback`] in full.
    #[must_use]
    pub fn decode(blob: &[u8], bounds: &CameraConfig) -> Self {
        match serde_json::from_slice::<Self>(blob) {
            Ok(snapshot) if snapshot.camera.range.is_positive() && snapshot.camera.target_range.is_positive() => {
                snapshot
            }
            Ok(_) => {
                warn!("snapshot has a non-positive range; using defaults");
                Self::fallback(bounds)
            }
            Err(e) => {
                warn!(error = %e, "malformed snapshot; using defaults");
                Self::fallback(bounds)
            }
        }
    }

    /// Apply the camera part. The range is clamped into the camera bounds
    /// and the view is settled (pos at its target).
    pub fn restore_camera(&self, camera: &mut Camera) {
        camera.jump_to(self.camera.pos.clone(), &self.camera.range);
    }
}
