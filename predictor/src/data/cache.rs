use std::{collections::HashMap, fs, path::Path, sync::Arc, time::SystemTime};

use parking_lot::Mutex;

use super::{Table, loader};
use crate::{Result, configs::SourceConfig};

/// Identifies a version of a local file, a changed fingerprint means the cached table is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

impl Fingerprint {
    fn of(path: &Path) -> Option<Self> {
        let meta = fs::metadata(path).ok()?;
        Some(Self {
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

#[derive(Debug)]
struct Entry {
    table: Arc<Table>,
    fingerprint: Option<Fingerprint>,
}

/// Memoizes loaded tables by source.
///
/// Local files are reloaded when their length or modification time changes; other sources stay
/// cached until invalidated.
#[derive(Debug, Default)]
pub struct TableCache {
    entries: Mutex<HashMap<SourceConfig, Entry>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for `source`, loading it on a miss or when it went stale.
    ///
    /// The lock is held while loading so concurrent callers never load the same source twice.
    pub fn get_or_load(&self, source: &SourceConfig) -> Result<Arc<Table>> {
        let mut entries = self.entries.lock();
        let fingerprint = match source {
            SourceConfig::Local { path } => Fingerprint::of(path),
            _ => None,
        };

        if let Some(entry) = entries.get(source) {
            if entry.fingerprint == fingerprint {
                log::debug!("cache hit for {source}");
                return Ok(Arc::clone(&entry.table));
            }

            log::info!("{source} changed on disk, reloading");
        }

        let table = Arc::new(loader::load(source)?);
        entries.insert(
            source.clone(),
            Entry {
                table: Arc::clone(&table),
                fingerprint,
            },
        );

        Ok(table)
    }

    /// Drops the cached table for `source`, returning whether there was one.
    pub fn invalidate(&self, source: &SourceConfig) -> bool {
        self.entries.lock().remove(source).is_some()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
