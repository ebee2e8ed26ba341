//! Host records and their loader. Multi-tenant layouts only: each host that
//! has registered against a cache instance appears exactly once.

use serde::Serialize;

use crate::errors::Result;
use crate::sysfs::{self, EntityKind, SysfsLayout};

use super::cache::CacheInstance;
use super::ENTITY_PROBE_MAX;

/// One participant registered against a cache instance.
#[derive(Debug, Clone, Serialize)]
pub struct Host {
    pub host_id: u32,
    pub hostname: String,
    pub alive: bool,
}

impl Host {
    pub fn load(layout: &SysfsLayout, cache: &CacheInstance, host_id: u32) -> Result<Self> {
        let kind = EntityKind::Host;
        let cid = cache.cache_id;

        let hostname = sysfs::read_attr(&layout.entity_attr(cid, kind, host_id, "hostname"))?
            .trim()
            .to_string();
        let alive =
            sysfs::parse_bool(&sysfs::read_attr(&layout.entity_attr(cid, kind, host_id, "alive"))?);

        Ok(Host {
            host_id,
            hostname,
            alive,
        })
    }

    /// Load every registered host, skipping broken entries; probe-until-hole
    /// when the cache does not report a host count.
    pub fn load_all(layout: &SysfsLayout, cache: &CacheInstance) -> Vec<Host> {
        let mut hosts = Vec::new();
        match cache.host_num {
            Some(count) => {
                for id in 0..count {
                    if let Ok(h) = Host::load(layout, cache, id) {
                        hosts.push(h);
                    }
                }
            }
            None => {
                for id in 0..ENTITY_PROBE_MAX {
                    match Host::load(layout, cache, id) {
                        Ok(h) => hosts.push(h),
                        Err(e) if e.is_not_found() => break,
                        Err(_) => continue,
                    }
                }
            }
        }
        hosts
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
