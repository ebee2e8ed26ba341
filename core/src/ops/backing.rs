//! Backing operations: attach, detach, list, and lookup by storage path.

use crate::adm::{AdmCommand, CommandChannel};
use crate::errors::{PcacheError, Result};
use crate::model::{Backing, CacheInstance};
use crate::sysfs::{self, walk_prefixed, EntityKind, SysfsLayout};

/// Convert a cache-size argument to whole mebibytes, rounding up.
///
/// Accepted forms: a bare byte count, or a number with a `K`/`KiB`,
/// `M`/`MiB`, or `G`/`GiB` suffix (case-insensitive). Rounding up is
/// load-bearing: an under-sized allocation must never be requested silently.
pub fn parse_size_mb(input: &str) -> Result<u64> {
    let t = input.trim();
    let digits_end = t
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(t.len());
    let (num, unit) = t.split_at(digits_end);
    let value: u64 = num
        .parse()
        .map_err(|_| PcacheError::InvalidArgument(format!("invalid cache size '{}'", input)))?;

    let mb = if unit.is_empty() {
        // Bare byte count.
        value.div_ceil(1024 * 1024)
    } else if unit.eq_ignore_ascii_case("k") || unit.eq_ignore_ascii_case("kib") {
        value.div_ceil(1024)
    } else if unit.eq_ignore_ascii_case("m") || unit.eq_ignore_ascii_case("mib") {
        value
    } else if unit.eq_ignore_ascii_case("g") || unit.eq_ignore_ascii_case("gib") {
        value
            .checked_mul(1024)
            .ok_or_else(|| PcacheError::InvalidArgument(format!("cache size overflow '{}'", input)))?
    } else {
        return Err(PcacheError::InvalidArgument(format!(
            "invalid unit for cache size: '{}'",
            unit
        )));
    };
    Ok(mb)
}

/// Attach a backing store at `path` to cache `cache_id`.
///
/// Nothing is loaded beforehand — there is no backing id yet to diff.
pub fn start(
    layout: &SysfsLayout,
    cache_id: u32,
    path: &str,
    queues: Option<u32>,
    cache_size: Option<&str>,
) -> Result<()> {
    if path.is_empty() {
        return Err(PcacheError::InvalidArgument(
            "backing path must not be empty".into(),
        ));
    }
    let mut cmd = AdmCommand::op("backing-start").arg("path", path);
    if let Some(q) = queues {
        cmd = cmd.arg("queues", q);
    }
    if let Some(size) = cache_size {
        cmd = cmd.arg("cache_size", parse_size_mb(size)?);
    }
    CommandChannel::new(layout.cache_adm(cache_id)).send(&cmd)
}

/// Detach a backing, addressed either by id or by its storage path.
pub fn stop(
    layout: &SysfsLayout,
    cache_id: u32,
    backing_id: Option<u32>,
    path: Option<&str>,
) -> Result<()> {
    let backing_id = match (backing_id, path) {
        (Some(id), _) => id,
        (None, Some(p)) => {
            let cache = CacheInstance::load(layout, cache_id)?;
            find_id_by_path(layout, &cache, p)?.ok_or_else(|| {
                PcacheError::InvalidArgument(format!("no backing with path '{}'", p))
            })?
        }
        (None, None) => {
            return Err(PcacheError::InvalidArgument(
                "--backing required for backing-stop".into(),
            ))
        }
    };
    let cmd = AdmCommand::op("backing-stop").arg("backing_id", backing_id);
    CommandChannel::new(layout.cache_adm(cache_id)).send(&cmd)
}

/// List the backings of cache `cache_id`. Unless `all` is set, entries are
/// filtered to the local host when both host ids are known.
pub fn list(layout: &SysfsLayout, cache_id: u32, all: bool) -> Result<Vec<Backing>> {
    let cache = CacheInstance::load(layout, cache_id)?;
    let backings = Backing::load_all(layout, &cache)
        .into_iter()
        .filter(|b| all || is_local(b.host_id, cache.host_id))
        .collect();
    Ok(backings)
}

/// Find the id of the backing whose `path` attribute equals `path`, walking
/// the cache's backing entries in directory order.
pub fn find_id_by_path(
    layout: &SysfsLayout,
    cache: &CacheInstance,
    path: &str,
) -> Result<Option<u32>> {
    let group = layout.entity_group_dir(cache.cache_id, EntityKind::Backing);
    let mut found = None;
    walk_prefixed(&group, EntityKind::Backing.singular(), |id, entry| {
        if found.is_some() {
            return Ok(());
        }
        match sysfs::read_attr(&entry.join("path")) {
            Ok(p) if p.trim() == path => {
                found = Some(id);
                Ok(())
            }
            Ok(_) => Ok(()),
            // A backing torn down mid-walk is not an error for the lookup.
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    })?;
    Ok(found)
}

/// Host filter shared by the list operations: without `--all`, an entity is
/// reported only when it belongs to the local host. Single-host layouts have
/// no host ids and are never filtered.
pub(crate) fn is_local(entity_host: Option<u32>, cache_host: Option<u32>) -> bool {
    match (entity_host, cache_host) {
        (Some(e), Some(c)) => e == c,
        _ => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{
        fixture_layout, single_host_info, write_backing, write_cache, write_entity_attr,
    };

    #[test]
    fn size_conversion_rounds_up() {
        assert_eq!(parse_size_mb("1K").unwrap(), 1);
        assert_eq!(parse_size_mb("1024K").unwrap(), 1);
        assert_eq!(parse_size_mb("1025K").unwrap(), 2);
        assert_eq!(parse_size_mb("512M").unwrap(), 512);
        assert_eq!(parse_size_mb("1G").unwrap(), 1024);
        assert_eq!(parse_size_mb("1048576").unwrap(), 1);
        assert_eq!(parse_size_mb("1048577").unwrap(), 2);
    }

    #[test]
    fn size_conversion_accepts_long_unit_forms() {
        assert_eq!(parse_size_mb("2KiB").unwrap(), 1);
        assert_eq!(parse_size_mb("512MiB").unwrap(), 512);
        assert_eq!(parse_size_mb("2gib").unwrap(), 2048);
    }

    #[test]
    fn size_conversion_rejects_garbage() {
        assert!(parse_size_mb("12X").is_err());
        assert!(parse_size_mb("").is_err());
        assert!(parse_size_mb("M").is_err());
    }

    #[test]
    fn attach_writes_command_with_optional_fields() {
        let (dir, layout) = fixture_layout("ops-backing-start");
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");

        start(&layout, 0, "/dev/sdb", Some(4), Some("512M")).unwrap();
        assert_eq!(
            std::fs::read_to_string(layout.cache_adm(0)).unwrap(),
            "op=backing-start,path=/dev/sdb,queues=4,cache_size=512"
        );

        start(&layout, 0, "/dev/sdc", None, None).unwrap();
        assert_eq!(
            std::fs::read_to_string(layout.cache_adm(0)).unwrap(),
            "op=backing-start,path=/dev/sdc"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn attach_rejects_empty_path() {
        let (dir, layout) = fixture_layout("ops-backing-start-empty");
        let err = start(&layout, 0, "", None, None).unwrap_err();
        assert!(matches!(err, PcacheError::InvalidArgument(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn detach_requires_an_identifier() {
        let (dir, layout) = fixture_layout("ops-backing-stop-noid");
        let err = stop(&layout, 0, None, None).unwrap_err();
        assert!(matches!(err, PcacheError::InvalidArgument(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn detach_by_id_writes_command() {
        let (dir, layout) = fixture_layout("ops-backing-stop");
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");

        stop(&layout, 0, Some(2), None).unwrap();
        assert_eq!(
            std::fs::read_to_string(layout.cache_adm(0)).unwrap(),
            "op=backing-stop,backing_id=2"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn detach_by_path_resolves_id() {
        let (dir, layout) = fixture_layout("ops-backing-stop-path");
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 0);
        write_backing(&layout, 0, 1, "/dev/sdc", true, 64, 70, 0);

        stop(&layout, 0, None, Some("/dev/sdc")).unwrap();
        assert_eq!(
            std::fs::read_to_string(layout.cache_adm(0)).unwrap(),
            "op=backing-stop,backing_id=1"
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn detach_by_unknown_path_fails() {
        let (dir, layout) = fixture_layout("ops-backing-stop-badpath");
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 0);

        let err = stop(&layout, 0, None, Some("/dev/nope")).unwrap_err();
        assert!(matches!(err, PcacheError::InvalidArgument(_)));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_filters_to_local_host() {
        let (dir, layout) = fixture_layout("ops-backing-list");
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");
        std::fs::write(layout.cache_host_id(0), "1\n").unwrap();
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 0);
        write_entity_attr(&layout, 0, EntityKind::Backing, 0, "host_id", "1");
        write_backing(&layout, 0, 1, "/dev/sdc", true, 64, 70, 0);
        write_entity_attr(&layout, 0, EntityKind::Backing, 1, "host_id", "2");

        let local = list(&layout, 0, false).unwrap();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].backing_id, 0);

        let all = list(&layout, 0, true).unwrap();
        assert_eq!(all.len(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_single_host_layout_is_unfiltered() {
        let (dir, layout) = fixture_layout("ops-backing-list-single");
        write_cache(&layout, 0, single_host_info(), "/mnt/pmem0");
        write_backing(&layout, 0, 0, "/dev/sdb", true, 64, 70, 0);

        let backings = list(&layout, 0, false).unwrap();
        assert_eq!(backings.len(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn is_local_matrix() {
        assert!(is_local(Some(1), Some(1)));
        assert!(!is_local(Some(2), Some(1)));
        assert!(is_local(None, Some(1)));
        assert!(is_local(Some(2), None));
        assert!(is_local(None, None));
    }
}
