// Process-wide cache of loaded season files.
//
// Source rows are immutable once loaded, so every caller shares one
// `Arc<Dataset>` per file. An entry is reloaded when the file's modification
// time changes (for example after a refresh rewrote it).

use crate::catalog::{Population, StatCatalog};
use crate::loader::{self, Dataset, LoadError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::debug;

#[derive(Debug)]
struct Entry {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    catalog: StatCatalog,
    entries: Mutex<HashMap<(PathBuf, Population), Entry>>,
}

impl DatasetCache {
    /// Datasets are loaded with the stat columns `catalog` lists.
    pub fn new(catalog: StatCatalog) -> Self {
        Self {
            catalog,
            entries: Mutex::default(),
        }
    }

    /// Return the cached dataset for `path`, loading it on first use or when
    /// the file changed on disk since it was cached.
    pub fn get_or_load(&self, path: &Path, population: Population) -> Result<Arc<Dataset>, LoadError> {
        let modified = modified_time(path)?;
        let key = (path.to_path_buf(), population);

        if let Some(entry) = self.lock().get(&key) {
            if entry.modified == modified {
                return Ok(Arc::clone(&entry.dataset));
            }
            debug!("{} changed on disk, reloading", path.display());
        }

        // Load outside the lock; concurrent first loads of the same file both
        // succeed and the last one wins.
        let dataset = Arc::new(loader::load_dataset(path, population, &self.catalog)?);
        self.lock().insert(
            key,
            Entry {
                modified,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    pub fn invalidate(&self, path: &Path) {
        self.lock().retain(|(p, _), _| p != path);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(PathBuf, Population), Entry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn modified_time(path: &Path) -> Result<Option<SystemTime>, LoadError> {
    let meta = std::fs::metadata(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(meta.modified().ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
