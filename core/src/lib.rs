//! pcache-admin-core — the administrative core for the pcache block-caching
//! subsystem.
//!
//! The kernel exposes its state as a sysfs-style control filesystem: one
//! directory per cache instance, attribute files for every field, and
//! write-only channel files accepting flat `key=value` command lines. This
//! crate turns that surface into typed records and lifecycle operations:
//!
//! - [`sysfs`] — attribute I/O, path layout, and directory walking
//! - [`model`] — typed snapshots of caches, hosts, backings, and devices
//! - [`adm`] — the command channel and its bounded retry
//! - [`ops`] — lifecycle orchestration (start/stop/list per entity)
//! - [`sys`] — the single dispatch point, [`command`] in, [`response`] out

pub mod adm;
pub mod cli;
pub mod command;
pub mod errors;
pub mod help;
pub mod model;
pub mod ops;
pub mod response;
pub mod settings;
pub mod sys;
pub mod sysfs;
