//! Block-device operations: start with snapshot reconciliation, retried
//! stop, and list.

use std::collections::BTreeSet;

use crate::adm::{AdmCommand, CommandChannel};
use crate::errors::{PcacheError, Result};
use crate::model::{Backing, BlockDevice, CacheInstance};
use crate::sysfs::SysfsLayout;

use super::backing::is_local;

/// What a device-start achieved. The kernel reports nothing back through the
/// channel, so the outcome is reconstructed by diffing the backing's device
/// set around the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevStartOutcome {
    /// A new device appeared; `dev_name` is its node path.
    Started { dev_name: String },
    /// The command was accepted but no new device materialized. Not an
    /// error: the kernel may legitimately decline without failing the write.
    NoNewDevice,
}

/// Start a block device on backing `backing_id`.
///
/// Existing device bindings on the backing are detached first, one
/// `dev-clear` each, so the subsequent diff cannot be confused by a stale
/// id. Then the device set is snapshotted, the `dev-start` issued, and the
/// set snapshotted again; the new device is whichever id is in the second
/// snapshot but not the first.
pub fn start(layout: &SysfsLayout, cache_id: u32, backing_id: u32) -> Result<DevStartOutcome> {
    let cache = CacheInstance::load(layout, cache_id)?;
    let channel = CommandChannel::new(layout.cache_adm(cache_id));

    clear_stale_devices(&channel, layout, &cache, backing_id)?;

    let before = Backing::load(layout, &cache, backing_id)?.device_ids();
    channel.send(&AdmCommand::op("dev-start").arg("backing_id", backing_id))?;
    let after = Backing::load(layout, &cache, backing_id)?.device_ids();

    match diff_new_device(&before, &after) {
        Some(id) => {
            let dev = BlockDevice::load(layout, &cache, id)?;
            Ok(DevStartOutcome::Started {
                dev_name: dev.dev_name,
            })
        }
        None => Ok(DevStartOutcome::NoNewDevice),
    }
}

/// Stop block device `dev_id`. This is the one write that is retried: stop
/// races against in-flight I/O draining, and a busy device clears within the
/// retry window far more often than not.
pub fn stop(layout: &SysfsLayout, cache_id: u32, dev_id: u32) -> Result<()> {
    let cmd = AdmCommand::op("dev-stop").arg("dev_id", dev_id);
    CommandChannel::new(layout.cache_adm(cache_id)).send_with_retry(&cmd)
}

/// List the block devices of cache `cache_id`, filtered to the local host
/// unless `all` is set.
pub fn list(layout: &SysfsLayout, cache_id: u32, all: bool) -> Result<Vec<BlockDevice>> {
    let cache = CacheInstance::load(layout, cache_id)?;
    let devices = BlockDevice::load_all(layout, &cache)
        .into_iter()
        .filter(|d| all || is_local(d.host_id, cache.host_id))
        .collect();
    Ok(devices)
}

/// Issue `dev-clear` for every device currently bound to `backing_id`,
/// detaching stale bindings before a new device is started.
///
/// The clear is an idempotent detach: each device's liveness is re-read
/// immediately before it, and a device already not alive needs no clear
/// and is skipped without any write. A device that vanished since the
/// backing load is skipped too. Clears are single-shot, never retried.
fn clear_stale_devices(
    channel: &CommandChannel,
    layout: &SysfsLayout,
    cache: &CacheInstance,
    backing_id: u32,
) -> Result<()> {
    let backing = match Backing::load(layout, cache, backing_id) {
        Ok(b) => b,
        Err(e) if e.is_not_found() => {
            return Err(PcacheError::InvalidArgument(format!(
                "backing {} does not exist",
                backing_id
            )))
        }
        Err(e) => return Err(e),
    };
    for dev in &backing.blkdevs {
        let current = match BlockDevice::load(layout, cache, dev.blkdev_id) {
            Ok(d) => d,
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e),
        };
        if !current.alive {
            continue;
        }
        channel.send(&AdmCommand::op("dev-clear").arg("dev_id", dev.blkdev_id))?;
    }
    Ok(())
}

/// The id present in `after` but not `before`, if any. Ordering of the
/// underlying directory walk is irrelevant; only set membership counts.
fn diff_new_device(before: &BTreeSet<u32>, after: &BTreeSet<u32>) -> Option<u32> {
    after.difference(before).next().copied()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
