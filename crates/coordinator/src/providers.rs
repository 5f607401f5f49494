//! Descriptor sources feeding the [`LockDescriptorRegistry`](crate::registry::LockDescriptorRegistry).

use std::path::{Path, PathBuf};

use editlock_core::error::CoreError;
use editlock_core::locking::LockDescriptor;

/// Supplies lock policies for some set of resource types.
///
/// Called each time the registry (re)builds its map, so implementations
/// that read external configuration pick up changes on reload.
pub trait DescriptorSource: Send + Sync {
    fn list_lock_descriptors(&self) -> Result<Vec<LockDescriptor>, CoreError>;
}

// ---------------------------------------------------------------------------
// StaticDescriptorProvider
// ---------------------------------------------------------------------------

/// A fixed, in-memory list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptorProvider {
    descriptors: Vec<LockDescriptor>,
}

impl StaticDescriptorProvider {
    pub fn new(descriptors: Vec<LockDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl DescriptorSource for StaticDescriptorProvider {
    fn list_lock_descriptors(&self) -> Result<Vec<LockDescriptor>, CoreError> {
        Ok(self.descriptors.clone())
    }
}

// ---------------------------------------------------------------------------
// FileDescriptorProvider
// ---------------------------------------------------------------------------

/// Reads a JSON array of descriptors from disk on every call.
///
/// ```json
/// [
///   { "name": "invoice", "timeout_secs": 900 },
///   { "name": "customer" }
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct FileDescriptorProvider {
    path: PathBuf,
}

impl FileDescriptorProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DescriptorSource for FileDescriptorProvider {
    fn list_lock_descriptors(&self) -> Result<Vec<LockDescriptor>, CoreError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            CoreError::Configuration(format!(
                "Failed to read lock descriptors from {}: {e}",
                self.path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            CoreError::Configuration(format!(
                "Invalid lock descriptor file {}: {e}",
                self.path.display()
            ))
        })
    }
}
