//! Cache-instance records and their loader.

use std::fs;

use serde::Serialize;

use crate::errors::{open_error, Result};
use crate::sysfs::{self, SysfsLayout};

use super::{hex16, hex8};

/// One registered cache instance, reconstructed from its `info` and `path`
/// attribute files.
///
/// The area-layout fields (`*_area_off`, `bytes_per_*`, `*_num`) are only
/// reported by the multi-tenant control-filesystem layout; single-host
/// layouts leave them `None`, and nested-entity discovery falls back to
/// probe-until-hole.
#[derive(Debug, Clone, Serialize)]
pub struct CacheInstance {
    pub cache_id: u32,
    #[serde(serialize_with = "hex16")]
    pub magic: u64,
    pub version: u32,
    #[serde(serialize_with = "hex8")]
    pub flags: u32,
    pub segment_num: u32,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_id: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_area_off: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_per_host_info: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_num: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_area_off: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_per_backing_info: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_num: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blkdev_area_off: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_per_blkdev_info: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blkdev_num: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_area_off: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes_per_segment: Option<u32>,
}

impl CacheInstance {
    /// Load one cache instance from the control filesystem.
    ///
    /// The `info` file is scanned as order-independent `key: value` lines;
    /// unknown keys are ignored for forward compatibility. The `path` file
    /// is read afterwards in a separate open — the two reads are not
    /// transactional with respect to each other, and a concurrent external
    /// mutation between them can interleave. That race is inherent to the
    /// filesystem-as-API control plane and is not papered over here.
    pub fn load(layout: &SysfsLayout, cache_id: u32) -> Result<Self> {
        let info_path = layout.cache_info(cache_id);
        let info = fs::read_to_string(&info_path).map_err(|e| open_error(&info_path, e))?;

        let mut cache = CacheInstance {
            cache_id,
            magic: 0,
            version: 0,
            flags: 0,
            segment_num: 0,
            path: String::new(),
            host_id: None,
            host_area_off: None,
            bytes_per_host_info: None,
            host_num: None,
            backing_area_off: None,
            bytes_per_backing_info: None,
            backing_num: None,
            blkdev_area_off: None,
            bytes_per_blkdev_info: None,
            blkdev_num: None,
            segment_area_off: None,
            bytes_per_segment: None,
        };
        cache.apply_info(&info)?;

        cache.path = sysfs::read_attr(&layout.cache_path_attr(cache_id))?
            .trim()
            .to_string();

        cache.host_id = match sysfs::read_attr(&layout.cache_host_id(cache_id)) {
            Ok(v) => Some(sysfs::parse_u32(&v)?),
            Err(e) if e.is_not_found() => None,
            Err(e) => return Err(e),
        };

        Ok(cache)
    }

    fn apply_info(&mut self, info: &str) -> Result<()> {
        for line in info.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "magic" => self.magic = sysfs::parse_u64(value)?,
                "version" => self.version = sysfs::parse_u32(value)?,
                "flags" => self.flags = sysfs::parse_u32(value)?,
                "segment_num" => self.segment_num = sysfs::parse_u32(value)?,
                "host_area_off" => self.host_area_off = Some(sysfs::parse_u64(value)?),
                "bytes_per_host_info" => {
                    self.bytes_per_host_info = Some(sysfs::parse_u32(value)?)
                }
                "host_num" => self.host_num = Some(sysfs::parse_u32(value)?),
                "backing_area_off" => self.backing_area_off = Some(sysfs::parse_u64(value)?),
                "bytes_per_backing_info" => {
                    self.bytes_per_backing_info = Some(sysfs::parse_u32(value)?)
                }
                "backing_num" => self.backing_num = Some(sysfs::parse_u32(value)?),
                "blkdev_area_off" => self.blkdev_area_off = Some(sysfs::parse_u64(value)?),
                "bytes_per_blkdev_info" => {
                    self.bytes_per_blkdev_info = Some(sysfs::parse_u32(value)?)
                }
                "blkdev_num" => self.blkdev_num = Some(sysfs::parse_u32(value)?),
                "segment_area_off" => self.segment_area_off = Some(sysfs::parse_u64(value)?),
                "bytes_per_segment" => self.bytes_per_segment = Some(sysfs::parse_u32(value)?),
                _ => {} // Unrecognized attribute, ignore.
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
