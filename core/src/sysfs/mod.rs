//! Low-level access to the pcache control filesystem: path resolution,
//! scalar attribute reads/writes, and directory enumeration.

pub mod attr;
pub mod layout;
pub mod walk;

pub use attr::{parse_bool, parse_u32, parse_u64, read_attr, write_attr};
pub use layout::{EntityKind, SysfsLayout, CACHE_MAX, DEFAULT_SYSFS_ROOT};
pub use walk::walk_prefixed;
