//! Lifecycle orchestration: the administrative operations exposed to the
//! presentation layer. Each operation re-reads state from the control
//! filesystem, issues commands through the admin channel, and reconciles
//! snapshots where a command's side effect must be discovered.

pub mod backing;
pub mod blkdev;
pub mod cache;
pub mod host;
