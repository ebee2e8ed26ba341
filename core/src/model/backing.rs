//! Backing records and their loader.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::{PcacheError, Result};
use crate::sysfs::{self, EntityKind, SysfsLayout};

use super::blkdev::BlockDevice;
use super::cache::CacheInstance;
use super::ENTITY_PROBE_MAX;

/// One backing store attached to a cache instance, together with the block
/// devices currently fronting it.
///
/// The owned-device list is a genuine collection keyed by id. Current
/// deployments bind at most one device per backing, but that is a validated
/// invariant of today's kernel, not a capacity ceiling of this model.
#[derive(Debug, Clone, Serialize)]
pub struct Backing {
    pub backing_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_id: Option<u32>,
    pub path: String,
    pub alive: bool,
    pub cache_segs: u32,
    pub cache_gc_percent: u32,
    pub cache_used_segs: u32,
    pub blkdevs: Vec<BlockDevice>,
}

impl Backing {
    /// Load one backing of `cache`, including its owned devices.
    ///
    /// Device loading is composed from a scan over every block device of the
    /// cache, filtered by `backing_id`; a single failed device load is
    /// skipped, never fatal to the backing itself.
    pub fn load(layout: &SysfsLayout, cache: &CacheInstance, backing_id: u32) -> Result<Self> {
        let kind = EntityKind::Backing;
        let cid = cache.cache_id;

        let path = sysfs::read_attr(&layout.entity_attr(cid, kind, backing_id, "path"))?
            .trim()
            .to_string();
        let alive =
            sysfs::parse_bool(&sysfs::read_attr(&layout.entity_attr(cid, kind, backing_id, "alive"))?);
        let cache_segs = sysfs::parse_u32(&sysfs::read_attr(
            &layout.entity_attr(cid, kind, backing_id, "cache_segs"),
        )?)?;
        let cache_gc_percent = sysfs::parse_u32(&sysfs::read_attr(
            &layout.entity_attr(cid, kind, backing_id, "cache_gc_percent"),
        )?)?;
        let cache_used_segs = sysfs::parse_u32(&sysfs::read_attr(
            &layout.entity_attr(cid, kind, backing_id, "cache_used_segs"),
        )?)?;

        let host_id = match sysfs::read_attr(&layout.entity_attr(cid, kind, backing_id, "host_id")) {
            Ok(v) => Some(sysfs::parse_u32(&v)?),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        let blkdevs = BlockDevice::load_all(layout, cache)
            .into_iter()
            .filter(|d| d.backing_id == backing_id)
            .collect();

        Ok(Backing {
            backing_id,
            host_id,
            path,
            alive,
            cache_segs,
            cache_gc_percent,
            cache_used_segs,
            blkdevs,
        })
    }

    /// Load every backing of `cache`, skipping entries that fail to load.
    /// Without a reported count the id space is probed until the first hole.
    pub fn load_all(layout: &SysfsLayout, cache: &CacheInstance) -> Vec<Backing> {
        let mut backings = Vec::new();
        match cache.backing_num {
            Some(count) => {
                for id in 0..count {
                    if let Ok(b) = Backing::load(layout, cache, id) {
                        backings.push(b);
                    }
                }
            }
            None => {
                for id in 0..ENTITY_PROBE_MAX {
                    match Backing::load(layout, cache, id) {
                        Ok(b) => backings.push(b),
                        Err(e) if e.is_not_found() => break,
                        Err(_) => continue,
                    }
                }
            }
        }
        backings
    }

    /// The ids of the currently owned devices, as a set. Snapshot diffing
    /// compares these across two loads.
    pub fn device_ids(&self) -> BTreeSet<u32> {
        self.blkdevs.iter().map(|d| d.blkdev_id).collect()
    }

    /// Check the well-formedness invariants reported by the kernel:
    /// used segments within capacity, GC threshold a percentage, and every
    /// owned device referencing this backing.
    pub fn validate(&self) -> Result<()> {
        if self.cache_gc_percent > 100 {
            return Err(PcacheError::InvalidArgument(format!(
                "backing {}: gc percent {} out of range",
                self.backing_id, self.cache_gc_percent
            )));
        }
        if self.cache_used_segs > self.cache_segs {
            return Err(PcacheError::InvalidArgument(format!(
                "backing {}: used segments {} exceed capacity {}",
                self.backing_id, self.cache_used_segs, self.cache_segs
            )));
        }
        if let Some(dev) = self.blkdevs.iter().find(|d| d.backing_id != self.backing_id) {
            return Err(PcacheError::InvalidArgument(format!(
                "backing {}: owned device {} references backing {}",
                self.backing_id, dev.blkdev_id, dev.backing_id
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{
        fixture_layout, single_host_info, write_backing, write_blkdev, write_cache,
        write_entity_attr,
    };

    fn cache_fixture(name: &str) -> (std::path::PathBuf, SysfsLayout, CacheInstance) {
        let (dir, layout) = fixture_layout(name);
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");
        let cache = CacheInstance::load(&layout, 0).unwrap();
        (dir, layout, cache)
    }

    #[test]
    fn load_populates_counters_and_devices() {
        let (dir, layout, cache) = cache_fixture("backing-load");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 256, 70, 100);
        write_blkdev(&layout, 0, 0, 0, 4, true);
        write_blkdev(&layout, 0, 1, 9, 5, true); // other backing, filtered out

        let backing = Backing::load(&layout, &cache, 0).unwrap();
        assert_eq!(backing.path, "/dev/sdb");
        assert!(backing.alive);
        assert_eq!(backing.cache_segs, 256);
        assert_eq!(backing.cache_gc_percent, 70);
        assert_eq!(backing.cache_used_segs, 100);
        assert_eq!(backing.blkdevs.len(), 1);
        assert_eq!(backing.blkdevs[0].dev_name, "/dev/pcache4");
        backing.validate().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn owned_devices_all_reference_this_backing() {
        let (dir, layout, cache) = cache_fixture("backing-consistency");
        write_backing(&layout, 0, 1, "/dev/sdc", true, 64, 80, 10);
        write_blkdev(&layout, 0, 0, 1, 0, true);
        write_blkdev(&layout, 0, 1, 1, 1, true);
        write_blkdev(&layout, 0, 2, 0, 2, true);

        let backing = Backing::load(&layout, &cache, 1).unwrap();
        assert_eq!(backing.blkdevs.len(), 2);
        assert!(backing.blkdevs.iter().all(|d| d.backing_id == 1));
        assert_eq!(backing.device_ids().into_iter().collect::<Vec<_>>(), vec![0, 1]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn broken_sibling_device_is_skipped() {
        let (dir, layout, cache) = cache_fixture("backing-broken-dev");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 0);
        write_blkdev(&layout, 0, 0, 0, 0, true);
        // Device 1 partially initialized: only backing_id exists. In probe
        // mode the missing mapped_id reads as a hole and stops the scan, so
        // device 0 still reports.
        write_entity_attr(&layout, 0, EntityKind::Blkdev, 1, "backing_id", "0");

        let backing = Backing::load(&layout, &cache, 0).unwrap();
        assert_eq!(backing.blkdevs.len(), 1);
        assert_eq!(backing.blkdevs[0].blkdev_id, 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_counter_aborts_load() {
        let (dir, layout, cache) = cache_fixture("backing-partial");
        write_entity_attr(&layout, 0, EntityKind::Backing, 0, "path", "/dev/sdb");
        write_entity_attr(&layout, 0, EntityKind::Backing, 0, "alive", "true");
        // cache_segs and friends missing.

        let err = Backing::load(&layout, &cache, 0).unwrap_err();
        assert!(err.is_not_found());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn validate_rejects_overcommitted_counters() {
        let (dir, layout, cache) = cache_fixture("backing-invalid");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 65);

        let backing = Backing::load(&layout, &cache, 0).unwrap();
        assert!(backing.validate().is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn validate_rejects_bad_gc_percent() {
        let (dir, layout, cache) = cache_fixture("backing-bad-gc");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 101, 0);

        let backing = Backing::load(&layout, &cache, 0).unwrap();
        assert!(backing.validate().is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_all_stops_at_hole_in_probe_mode() {
        let (dir, layout, cache) = cache_fixture("backing-probe");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 0);
        write_backing(&layout, 0, 1, "/dev/sdc", true, 64, 70, 0);
        write_backing(&layout, 0, 3, "/dev/sde", true, 64, 70, 0); // beyond the hole

        let backings = Backing::load_all(&layout, &cache);
        assert_eq!(backings.len(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_shape() {
        let (dir, layout, cache) = cache_fixture("backing-json");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 256, 70, 100);
        write_blkdev(&layout, 0, 0, 0, 4, true);

        let backing = Backing::load(&layout, &cache, 0).unwrap();
        let json = serde_json::to_value(&backing).unwrap();
        assert_eq!(json["backing_id"], 0);
        assert_eq!(json["path"], "/dev/sdb");
        assert_eq!(json["alive"], true);
        assert_eq!(json["blkdevs"][0]["dev_name"], "/dev/pcache4");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
