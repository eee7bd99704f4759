use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use super::error::Result;
use super::loader::load_file;
use super::model::MeasurementTable;

// ---------------------------------------------------------------------------
// Process-wide table cache
// ---------------------------------------------------------------------------

/// Tables loaded so far, keyed by canonical path. Lives until process exit.
static TABLES: OnceLock<Mutex<HashMap<PathBuf, Arc<MeasurementTable>>>> = OnceLock::new();

fn tables() -> &'static Mutex<HashMap<PathBuf, Arc<MeasurementTable>>> {
    TABLES.get_or_init(|| Mutex::new(HashMap::new()))
}

fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Load `path` once per process; later calls share the same table.
///
/// Failed loads are not cached, so a fixed file can be retried.
pub fn load_cached(path: &Path) -> Result<Arc<MeasurementTable>> {
    let key = cache_key(path);

    if let Some(table) = lock().get(&key) {
        log::debug!("Table cache hit for {}", key.display());
        return Ok(Arc::clone(table));
    }

    let table = Arc::new(load_file(path)?);
    lock().insert(key, Arc::clone(&table));
    Ok(table)
}

/// A poisoned lock only means another thread panicked mid-insert; the map
/// itself is still valid.
fn lock() -> std::sync::MutexGuard<'static, HashMap<PathBuf, Arc<MeasurementTable>>> {
    tables().lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
