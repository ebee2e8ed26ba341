//! Command — the typed interface for all administrative operations.
//!
//! Every operation that can be dispatched through `Sys::execute()` is a
//! variant of the `Command` enum. The enum doubles as a machine-readable
//! interchange format: commands serialize as JSON objects with a
//! `"command"` discriminant, via serde's `tag = "command"` attribute.
//!
//! ```json
//! {"command": "cache-start", "path": "/mnt/pmem0", "format": true}
//! {"command": "dev-start", "cache": 0, "backing": 1}
//! ```

use serde::{Deserialize, Serialize};

/// A typed administrative command.
///
/// Each variant corresponds to exactly one operation in `Sys::execute()`.
/// Required fields are non-optional; optional fields use `Option<T>` and
/// are omitted from the serialized form when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command")]
pub enum Command {
    // -----------------------------------------------------------------
    // Cache-instance commands
    // -----------------------------------------------------------------

    /// Register a cache device.
    #[serde(rename = "cache-start")]
    CacheStart {
        /// Path to the cache device (e.g. a DAX device or file).
        path: String,
        /// Take over a device that looks in use.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        force: bool,
        /// Format the device before use.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        format: bool,
    },

    /// Unregister a cache instance.
    #[serde(rename = "cache-stop")]
    CacheStop {
        /// Cache instance id.
        cache: u32,
    },

    /// List all registered cache instances.
    #[serde(rename = "cache-list")]
    CacheList,

    // -----------------------------------------------------------------
    // Backing commands
    // -----------------------------------------------------------------

    /// Attach a backing store to a cache instance.
    #[serde(rename = "backing-start")]
    BackingStart {
        /// Cache instance id.
        cache: u32,
        /// Path to the backing block device.
        path: String,
        /// Number of I/O queues.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        queues: Option<u32>,
        /// Cache space to dedicate, e.g. "512M" or "2G".
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cache_size: Option<String>,
    },

    /// Detach a backing, addressed by id or by path.
    #[serde(rename = "backing-stop")]
    BackingStop {
        /// Cache instance id.
        cache: u32,
        /// Backing id to detach.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        backing: Option<u32>,
        /// Backing path to detach, resolved to an id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },

    /// List the backings of a cache instance.
    #[serde(rename = "backing-list")]
    BackingList {
        /// Cache instance id.
        cache: u32,
        /// Include backings belonging to other hosts.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        all: bool,
    },

    // -----------------------------------------------------------------
    // Block-device commands
    // -----------------------------------------------------------------

    /// Start a block device on a backing.
    #[serde(rename = "dev-start")]
    DevStart {
        /// Cache instance id.
        cache: u32,
        /// Backing id to start the device on.
        backing: u32,
    },

    /// Stop a block device.
    #[serde(rename = "dev-stop")]
    DevStop {
        /// Cache instance id.
        cache: u32,
        /// Block device id.
        dev: u32,
    },

    /// List the block devices of a cache instance.
    #[serde(rename = "dev-list")]
    DevList {
        /// Cache instance id.
        cache: u32,
        /// Include devices belonging to other hosts.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        all: bool,
    },

    // -----------------------------------------------------------------
    // Host commands
    // -----------------------------------------------------------------

    /// List the hosts registered against a cache instance.
    #[serde(rename = "host-list")]
    HostList {
        /// Cache instance id.
        cache: u32,
    },

    // -----------------------------------------------------------------
    // Help
    // -----------------------------------------------------------------

    /// Show the usage overview.
    #[serde(rename = "help")]
    Help,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_start_round_trip() {
        let cmd = Command::CacheStart {
            path: "/mnt/pmem0".into(),
            force: false,
            format: true,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"cache-start\""));
        assert!(json.contains("\"format\":true"));
        // Unset booleans stay out of the serialized form.
        assert!(!json.contains("\"force\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn cache_start_from_minimal_json() {
        let json = r#"{"command":"cache-start","path":"/mnt/pmem0"}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            Command::CacheStart {
                path: "/mnt/pmem0".into(),
                force: false,
                format: false,
            }
        );
    }

    #[test]
    fn backing_start_round_trip() {
        let cmd = Command::BackingStart {
            cache: 0,
            path: "/dev/sdb".into(),
            queues: Some(4),
            cache_size: Some("512M".into()),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"backing-start\""));
        assert!(json.contains("\"queues\":4"));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn backing_stop_by_path() {
        let json = r#"{"command":"backing-stop","cache":0,"path":"/dev/sdb"}"#;
        let cmd: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            cmd,
            Command::BackingStop {
                cache: 0,
                backing: None,
                path: Some("/dev/sdb".into()),
            }
        );
    }

    #[test]
    fn dev_start_round_trip() {
        let cmd = Command::DevStart { cache: 0, backing: 1 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"command\":\"dev-start\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn unknown_command_rejected() {
        let json = r#"{"command":"bogus-command"}"#;
        assert!(serde_json::from_str::<Command>(json).is_err());
    }

    #[test]
    fn missing_required_field_rejected() {
        // dev-stop requires "dev".
        let json = r#"{"command":"dev-stop","cache":0}"#;
        assert!(serde_json::from_str::<Command>(json).is_err());
    }

    #[test]
    fn all_variants_deserialize() {
        let cases = vec![
            r#"{"command":"cache-start","path":"/mnt/pmem0"}"#,
            r#"{"command":"cache-stop","cache":0}"#,
            r#"{"command":"cache-list"}"#,
            r#"{"command":"backing-start","cache":0,"path":"/dev/sdb"}"#,
            r#"{"command":"backing-stop","cache":0,"backing":1}"#,
            r#"{"command":"backing-list","cache":0}"#,
            r#"{"command":"dev-start","cache":0,"backing":1}"#,
            r#"{"command":"dev-stop","cache":0,"dev":1}"#,
            r#"{"command":"dev-list","cache":0,"all":true}"#,
            r#"{"command":"host-list","cache":0}"#,
            r#"{"command":"help"}"#,
        ];
        for json in cases {
            let result = serde_json::from_str::<Command>(json);
            assert!(result.is_ok(), "failed to deserialize {}: {}", json, result.unwrap_err());
        }
    }
}
