//! Block-device records and their loader.

use serde::Serialize;

use crate::errors::Result;
use crate::sysfs::{self, EntityKind, SysfsLayout};

use super::cache::CacheInstance;
use super::ENTITY_PROBE_MAX;

/// One user-facing block device bound to a backing.
#[derive(Debug, Clone, Serialize)]
pub struct BlockDevice {
    pub blkdev_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_id: Option<u32>,
    pub backing_id: u32,
    /// Device node name derived from the kernel-assigned mapped id.
    pub dev_name: String,
    pub alive: bool,
}

impl BlockDevice {
    /// Load one block device of `cache`. Any missing required field aborts
    /// the load with `NotFound`.
    pub fn load(layout: &SysfsLayout, cache: &CacheInstance, blkdev_id: u32) -> Result<Self> {
        let kind = EntityKind::Blkdev;
        let cid = cache.cache_id;

        let backing_id =
            sysfs::parse_u32(&sysfs::read_attr(&layout.entity_attr(cid, kind, blkdev_id, "backing_id"))?)?;
        let mapped_id =
            sysfs::parse_u32(&sysfs::read_attr(&layout.entity_attr(cid, kind, blkdev_id, "mapped_id"))?)?;
        let alive =
            sysfs::parse_bool(&sysfs::read_attr(&layout.entity_attr(cid, kind, blkdev_id, "alive"))?);

        let host_id = match sysfs::read_attr(&layout.entity_attr(cid, kind, blkdev_id, "host_id")) {
            Ok(v) => Some(sysfs::parse_u32(&v)?),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        Ok(BlockDevice {
            blkdev_id,
            host_id,
            backing_id,
            dev_name: format!("/dev/pcache{}", mapped_id),
            alive,
        })
    }

    /// Load every block device of `cache`, skipping entries that fail to
    /// load so one partially-initialized device never hides its siblings.
    ///
    /// When the cache reports a device count, ids `0..count` are scanned and
    /// holes are tolerated. Without a count (single-host layout) the id
    /// space is probed until the first hole.
    pub fn load_all(layout: &SysfsLayout, cache: &CacheInstance) -> Vec<BlockDevice> {
        let mut devices = Vec::new();
        match cache.blkdev_num {
            Some(count) => {
                for id in 0..count {
                    if let Ok(dev) = BlockDevice::load(layout, cache, id) {
                        devices.push(dev);
                    }
                }
            }
            None => {
                for id in 0..ENTITY_PROBE_MAX {
                    match BlockDevice::load(layout, cache, id) {
                        Ok(dev) => devices.push(dev),
                        Err(e) if e.is_not_found() => break,
                        Err(_) => continue,
                    }
                }
            }
        }
        devices
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
