//! Help system — the usage text for the pcache CLI.

/// Top-level usage overview.
pub fn help_text() -> String {
    "\
pcache — administrative client for the pcache block-caching subsystem

Usage: pcache <operation> [flags...]

Cache operations:
  cache-start -p <path> [-F] [-f]   Register a cache device
  cache-stop -c <cache>             Unregister a cache instance
  cache-list                        List registered cache instances

Backing operations:
  backing-start -p <path> [-c <cache>] [-n <queues>] [--cache-size <size>]
                                    Attach a backing store
  backing-stop (-b <backing> | -p <path>) [-c <cache>]
                                    Detach a backing store
  backing-list [-c <cache>] [-a]    List backings

Device operations:
  dev-start -b <backing> [-c <cache>]   Start a block device on a backing
  dev-stop -d <dev> [-c <cache>]        Stop a block device
  dev-list [-c <cache>] [-a]            List block devices

Host operations:
  host-list [-c <cache>]            List registered hosts

Flags:
  -c, --cache <id>       Cache instance id (default 0)
  -p, --path <path>      Device or file path
  -b, --backing <id>     Backing id
  -d, --dev <id>         Block device id
  -n, --queues <n>       Number of I/O queues
      --cache-size <sz>  Cache space per backing, e.g. 512M or 2G
  -F, --force            Take over a device that looks in use
  -f, --format           Format the cache device before use
  -a, --all              Include entries belonging to other hosts
  -h, --help             Show this message

List output is JSON. Configuration is read from $PCACHE_CONFIG or
/etc/pcache/pcachectl.yaml; $PCACHE_SYSFS_ROOT overrides the control
filesystem root."
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
