//! Cache-instance operations: register, unregister, list.

use crate::adm::{AdmCommand, CommandChannel};
use crate::errors::{PcacheError, Result};
use crate::model::CacheInstance;
use crate::sysfs::{SysfsLayout, CACHE_MAX};

/// Register a new cache device at `path`.
///
/// Success is defined purely by the channel write succeeding: the cache has
/// no id yet, so there is nothing to diff afterwards.
pub fn start(layout: &SysfsLayout, path: &str, force: bool, format: bool) -> Result<()> {
    if path.is_empty() {
        return Err(PcacheError::InvalidArgument(
            "cache device path must not be empty".into(),
        ));
    }
    let cmd = AdmCommand::bare()
        .arg("path", path)
        .arg("force", u8::from(force))
        .arg("format", u8::from(format));
    CommandChannel::new(layout.register_path()).send(&cmd)
}

/// Unregister the cache instance `cache_id`.
pub fn stop(layout: &SysfsLayout, cache_id: u32) -> Result<()> {
    let cmd = AdmCommand::bare().arg("cache_dev_id", cache_id);
    CommandChannel::new(layout.unregister_path()).send(&cmd)
}

/// List every registered cache instance.
///
/// Instances are numbered densely from zero; probing stops at the first
/// missing id (a cache with no on-disk representation does not exist), with
/// a hard ceiling of [`CACHE_MAX`].
pub fn list(layout: &SysfsLayout) -> Result<Vec<CacheInstance>> {
    let mut caches = Vec::new();
    for id in 0..CACHE_MAX {
        match CacheInstance::load(layout, id) {
            Ok(cache) => caches.push(cache),
            Err(e) if e.is_not_found() => break,
            Err(e) => return Err(e),
        }
    }
    Ok(caches)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
