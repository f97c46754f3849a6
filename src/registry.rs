//! Media resource registry
//!
//! Maps local file bytes to short-lived playable references (`blob:` style
//! URLs) and tracks every reference until it is released. Handles are
//! exclusively owned: they are not `Clone`, so a handle sits in exactly one
//! playlist slot and is released from there.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

use crate::error::{PlayerError, Result};

/// URL scheme prefix for handles issued by the registry
pub const HANDLE_URL_PREFIX: &str = "blob:lumen/";

/// Where a file's bytes come from
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Bytes already in memory (drag-and-drop, tests)
    Memory(Bytes),
    /// A local file, read when the handle is acquired
    Path(PathBuf),
}

/// A raw file handed to the player by a file chooser or a drop target
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    pub source: FileSource,
}

impl FileDescriptor {
    /// Create a descriptor for in-memory bytes
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            byte_size: data.len() as u64,
            mime_type: mime_type.into(),
            last_modified: Utc::now(),
            source: FileSource::Memory(data),
        }
    }

    /// Create a descriptor for a file on disk.
    ///
    /// Size and modification time are taken from the file's metadata.
    pub fn from_path(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            name,
            byte_size: metadata.len(),
            mime_type: mime_type.into(),
            last_modified,
            source: FileSource::Path(path),
        })
    }

    /// Read the file's bytes
    pub fn read_bytes(&self) -> Result<Bytes> {
        match &self.source {
            FileSource::Memory(data) => Ok(data.clone()),
            FileSource::Path(path) => std::fs::read(path).map(Bytes::from).map_err(|e| {
                PlayerError::ResourceUnavailable(format!("{}: {}", path.display(), e))
            }),
        }
    }

    /// Read the file as UTF-8 text (lossy)
    pub fn read_text(&self) -> Result<String> {
        let data = self.read_bytes()?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    /// Check whether the MIME type marks this as audio-only media
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// An opaque, revocable reference to registered bytes
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    id: Uuid,
    url: String,
}

impl ResourceHandle {
    fn new() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            url: format!("{}{}", HANDLE_URL_PREFIX, id),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// URL usable as a media or track source
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Registered resource
#[derive(Debug, Clone)]
struct RegisteredResource {
    data: Bytes,
    label: String,
}

/// Registry statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryStats {
    pub acquired: usize,
    pub released: usize,
    pub live: usize,
}

/// Tracks live resource handles
#[derive(Debug, Default)]
pub struct MediaResourceRegistry {
    resources: DashMap<Uuid, RegisteredResource>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl MediaResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's bytes and hand out a new handle.
    ///
    /// Fails when the file cannot be read; nothing is registered then.
    pub fn acquire(&self, file: &FileDescriptor) -> Result<ResourceHandle> {
        let data = file.read_bytes()?;
        Ok(self.insert(data, file.name.clone()))
    }

    /// Register generated text (converted or fetched subtitles)
    pub fn acquire_text(&self, text: String, label: &str) -> ResourceHandle {
        self.insert(Bytes::from(text), label.to_string())
    }

    fn insert(&self, data: Bytes, label: String) -> ResourceHandle {
        let handle = ResourceHandle::new();
        tracing::debug!("Acquired {} for {:?} ({} bytes)", handle, label, data.len());
        self.resources
            .insert(handle.id, RegisteredResource { data, label });
        self.acquired.fetch_add(1, Ordering::Relaxed);
        handle
    }

    /// Release a handle.
    ///
    /// Returns false when the handle was already released; that is a no-op.
    pub fn release(&self, handle: &ResourceHandle) -> bool {
        match self.resources.remove(&handle.id) {
            Some((_, resource)) => {
                tracing::debug!("Released {} ({:?})", handle, resource.label);
                self.released.fetch_add(1, Ordering::Relaxed);
                true
            }
            None => {
                tracing::debug!("Ignoring release of already released {}", handle);
                false
            }
        }
    }

    /// Look up the bytes behind a handle URL
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        let id = url.strip_prefix(HANDLE_URL_PREFIX)?;
        let id = Uuid::parse_str(id).ok()?;
        self.resources.get(&id).map(|r| r.data.clone())
    }

    /// Check whether a handle is still live
    pub fn is_live(&self, handle: &ResourceHandle) -> bool {
        self.resources.contains_key(&handle.id)
    }

    /// Number of live handles
    pub fn live_count(&self) -> usize {
        self.resources.len()
    }

    /// Get registry statistics
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            acquired: self.acquired.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            live: self.resources.len(),
        }
    }
}
