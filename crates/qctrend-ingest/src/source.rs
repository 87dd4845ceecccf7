//! Byte sources: the seam between the core and its storage backend.
//!
//! Result and configuration files may live on the local filesystem or in an
//! object-storage bucket. The core only ever needs "read bytes by path", so
//! that capability is the whole trait; the bucket-backed implementation
//! lives with the deployment glue, not here.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{IngestError, Result};

/// Read raw bytes by path (filesystem path or object key).
pub trait ByteSource {
    fn read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Local-filesystem byte source.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSource;

impl ByteSource for LocalSource {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(Path::new(path)).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                IngestError::NotFound {
                    path: path.to_string(),
                }
            } else {
                IngestError::Read {
                    path: path.to_string(),
                    source,
                }
            }
        })
    }
}

/// In-memory byte source keyed by path.
///
/// Stands in for a bucket backend in tests and exercises the same seam.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    objects: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.objects.insert(path.into(), bytes.into());
    }
}

impl ByteSource for MemorySource {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.objects
            .get(path)
            .cloned()
            .ok_or_else(|| IngestError::NotFound {
                path: path.to_string(),
            })
    }
}
