//! Control-filesystem path resolution.
//!
//! Pure, total mapping from entity coordinates to attribute paths. The layout
//! is rooted at a single base directory (`/sys/bus/pcache` in production,
//! a fixture directory in tests): one subtree per cache instance keyed by
//! numeric id, a subdirectory per entity kind, a subdirectory per entity
//! instance, one file per field. No I/O happens here.

use std::path::{Path, PathBuf};

/// Default production root of the pcache control filesystem.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/bus/pcache";

/// Hard ceiling on cache-instance probing.
pub const CACHE_MAX: u32 = 1024;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The entity kinds nested under a cache instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Host,
    Backing,
    Blkdev,
}

impl EntityKind {
    /// Singular name, used as the per-instance directory prefix
    /// (e.g. `backing3`).
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Host => "host",
            EntityKind::Backing => "backing",
            EntityKind::Blkdev => "blkdev",
        }
    }

    /// Name of the per-kind group directory under a cache instance.
    pub fn group_dir(&self) -> &'static str {
        match self {
            EntityKind::Host => "pcache_hosts",
            EntityKind::Backing => "pcache_backings",
            EntityKind::Blkdev => "pcache_blkdevs",
        }
    }
}

// ---------------------------------------------------------------------------
// SysfsLayout
// ---------------------------------------------------------------------------

/// Resolves control-filesystem paths beneath a fixed root directory.
#[derive(Debug, Clone)]
pub struct SysfsLayout {
    root: PathBuf,
}

impl SysfsLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SysfsLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Global write-only channel for cache registration.
    pub fn register_path(&self) -> PathBuf {
        self.root.join("cache_dev_register")
    }

    /// Global write-only channel for cache unregistration.
    pub fn unregister_path(&self) -> PathBuf {
        self.root.join("cache_dev_unregister")
    }

    /// Directory holding all cache-instance subtrees.
    pub fn devices_dir(&self) -> PathBuf {
        self.root.join("devices")
    }

    /// Root directory of one cache instance.
    pub fn cache_dir(&self, cache_id: u32) -> PathBuf {
        self.devices_dir().join(format!("cache_dev{}", cache_id))
    }

    /// The `info` file: newline-separated `key: value` pairs.
    pub fn cache_info(&self, cache_id: u32) -> PathBuf {
        self.cache_dir(cache_id).join("info")
    }

    /// The single-line backing mount path of the cache device.
    pub fn cache_path_attr(&self, cache_id: u32) -> PathBuf {
        self.cache_dir(cache_id).join("path")
    }

    /// The local host's registration id. Multi-tenant layouts only.
    pub fn cache_host_id(&self, cache_id: u32) -> PathBuf {
        self.cache_dir(cache_id).join("host_id")
    }

    /// The per-cache administrative command channel.
    pub fn cache_adm(&self, cache_id: u32) -> PathBuf {
        self.cache_dir(cache_id).join("adm")
    }

    /// Group directory of one entity kind under a cache instance.
    pub fn entity_group_dir(&self, cache_id: u32, kind: EntityKind) -> PathBuf {
        self.cache_dir(cache_id).join(kind.group_dir())
    }

    /// Directory of one entity instance.
    pub fn entity_dir(&self, cache_id: u32, kind: EntityKind, entity_id: u32) -> PathBuf {
        self.entity_group_dir(cache_id, kind)
            .join(format!("{}{}", kind.singular(), entity_id))
    }

    /// One field file of one entity instance.
    pub fn entity_attr(
        &self,
        cache_id: u32,
        kind: EntityKind,
        entity_id: u32,
        field: &str,
    ) -> PathBuf {
        self.entity_dir(cache_id, kind, entity_id).join(field)
    }
}

impl Default for SysfsLayout {
    fn default() -> Self {
        SysfsLayout::new(DEFAULT_SYSFS_ROOT)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
