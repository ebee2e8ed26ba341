//! Host operations. Hosts are read-only from the admin side; the only
//! operation is listing them.

use crate::errors::Result;
use crate::model::{CacheInstance, Host};
use crate::sysfs::SysfsLayout;

/// List every host registered against cache `cache_id`.
pub fn list(layout: &SysfsLayout, cache_id: u32) -> Result<Vec<Host>> {
    let cache = CacheInstance::load(layout, cache_id)?;
    Ok(Host::load_all(layout, &cache))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
