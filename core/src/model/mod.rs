//! Typed, read-only snapshots of control-filesystem entities.
//!
//! Every record here is reconstructed fresh from the control filesystem on
//! each query; nothing is cached across operations. A changed attribute
//! produces a new snapshot read, never an in-place update.

pub mod backing;
pub mod blkdev;
pub mod cache;
pub mod host;

pub use backing::Backing;
pub use blkdev::BlockDevice;
pub use cache::CacheInstance;
pub use host::Host;

use serde::Serializer;

/// Ceiling for probe-until-hole discovery of nested entities when the cache
/// info file does not report a count.
pub const ENTITY_PROBE_MAX: u32 = 1024;

/// Serialize a 64-bit magic as `0x` plus 16 fixed-width hex digits.
pub(crate) fn hex16<S: Serializer>(v: &u64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{:016x}", v))
}

/// Serialize a 32-bit flags word as `0x` plus 8 fixed-width hex digits.
pub(crate) fn hex8<S: Serializer>(v: &u32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("0x{:08x}", v))
}

// ---------------------------------------------------------------------------
// Shared test fixtures: a fake control filesystem under a temp directory.
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::PathBuf;

    use crate::sysfs::{EntityKind, SysfsLayout};

    /// Create a fresh fixture root named `pcache-fix-<name>` and a layout
    /// over it. Any previous run's tree is removed first.
    pub fn fixture_layout(name: &str) -> (PathBuf, SysfsLayout) {
        let dir = std::env::temp_dir().join(format!("pcache-fix-{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("devices")).unwrap();
        let layout = SysfsLayout::new(&dir);
        (dir, layout)
    }

    /// Populate one cache instance: `info`, `path`, and an empty `adm`
    /// channel file.
    pub fn write_cache(layout: &SysfsLayout, cache_id: u32, info: &str, path: &str) {
        let dir = layout.cache_dir(cache_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(layout.cache_info(cache_id), info).unwrap();
        fs::write(layout.cache_path_attr(cache_id), format!("{}\n", path)).unwrap();
        fs::write(layout.cache_adm(cache_id), "").unwrap();
    }

    /// Write one field file of one nested entity, creating its directory.
    pub fn write_entity_attr(
        layout: &SysfsLayout,
        cache_id: u32,
        kind: EntityKind,
        entity_id: u32,
        field: &str,
        value: &str,
    ) {
        let dir = layout.entity_dir(cache_id, kind, entity_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(field), format!("{}\n", value)).unwrap();
    }

    /// Populate a complete backing entry.
    pub fn write_backing(
        layout: &SysfsLayout,
        cache_id: u32,
        backing_id: u32,
        path: &str,
        alive: bool,
        cache_segs: u32,
        cache_gc_percent: u32,
        cache_used_segs: u32,
    ) {
        let kind = EntityKind::Backing;
        write_entity_attr(layout, cache_id, kind, backing_id, "path", path);
        write_entity_attr(
            layout,
            cache_id,
            kind,
            backing_id,
            "alive",
            if alive { "true" } else { "false" },
        );
        write_entity_attr(
            layout,
            cache_id,
            kind,
            backing_id,
            "cache_segs",
            &cache_segs.to_string(),
        );
        write_entity_attr(
            layout,
            cache_id,
            kind,
            backing_id,
            "cache_gc_percent",
            &cache_gc_percent.to_string(),
        );
        write_entity_attr(
            layout,
            cache_id,
            kind,
            backing_id,
            "cache_used_segs",
            &cache_used_segs.to_string(),
        );
    }

    /// Populate a complete block-device entry.
    pub fn write_blkdev(
        layout: &SysfsLayout,
        cache_id: u32,
        blkdev_id: u32,
        backing_id: u32,
        mapped_id: u32,
        alive: bool,
    ) {
        let kind = EntityKind::Blkdev;
        write_entity_attr(
            layout,
            cache_id,
            kind,
            blkdev_id,
            "backing_id",
            &backing_id.to_string(),
        );
        write_entity_attr(
            layout,
            cache_id,
            kind,
            blkdev_id,
            "mapped_id",
            &mapped_id.to_string(),
        );
        write_entity_attr(
            layout,
            cache_id,
            kind,
            blkdev_id,
            "alive",
            if alive { "true" } else { "false" },
        );
    }

    /// A minimal single-host info file: no area layout, no counts.
    pub fn single_host_info() -> &'static str {
        "magic: 0x65b05dbadeadbabe\nversion: 1\nflags: 0x00000000\nsegment_num: 128\n"
    }
}
