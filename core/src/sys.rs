//! Central dispatch: every command enters through `Sys::execute()`.

use serde::Serialize;

use crate::command::Command;
use crate::errors::Result;
use crate::help;
use crate::ops;
use crate::response::Response;
use crate::settings::Settings;
use crate::sysfs::SysfsLayout;

/// The administrative runtime. Holds the resolved control-filesystem layout;
/// all state lives in the kernel and is re-read per command.
pub struct Sys {
    layout: SysfsLayout,
}

impl Sys {
    pub fn new(settings: &Settings) -> Sys {
        Sys {
            layout: SysfsLayout::new(&settings.sysfs_root),
        }
    }

    /// The single dispatch method.
    pub fn execute(&self, cmd: Command) -> Response {
        match cmd {
            Command::CacheStart { path, force, format } => {
                simple(ops::cache::start(&self.layout, &path, force, format))
            }
            Command::CacheStop { cache } => simple(ops::cache::stop(&self.layout, cache)),
            Command::CacheList => listing(ops::cache::list(&self.layout)),
            Command::BackingStart { cache, path, queues, cache_size } => simple(
                ops::backing::start(&self.layout, cache, &path, queues, cache_size.as_deref()),
            ),
            Command::BackingStop { cache, backing, path } => simple(ops::backing::stop(
                &self.layout,
                cache,
                backing,
                path.as_deref(),
            )),
            Command::BackingList { cache, all } => {
                listing(ops::backing::list(&self.layout, cache, all))
            }
            Command::DevStart { cache, backing } => self.cmd_dev_start(cache, backing),
            Command::DevStop { cache, dev } => simple(ops::blkdev::stop(&self.layout, cache, dev)),
            Command::DevList { cache, all } => listing(ops::blkdev::list(&self.layout, cache, all)),
            Command::HostList { cache } => listing(ops::host::list(&self.layout, cache)),
            Command::Help => Response::ok(help::help_text()),
        }
    }

    fn cmd_dev_start(&self, cache: u32, backing: u32) -> Response {
        match ops::blkdev::start(&self.layout, cache, backing) {
            Ok(ops::blkdev::DevStartOutcome::Started { dev_name }) => Response::ok(dev_name),
            Ok(ops::blkdev::DevStartOutcome::NoNewDevice) => Response::NoEffect {
                output: "No new block devices were added.".into(),
            },
            Err(e) => Response::error(e.to_string()),
        }
    }
}

fn simple(result: Result<()>) -> Response {
    match result {
        Ok(()) => Response::empty(),
        Err(e) => Response::error(e.to_string()),
    }
}

fn listing<T: Serialize>(result: Result<Vec<T>>) -> Response {
    let items = match result {
        Ok(items) => items,
        Err(e) => return Response::error(e.to_string()),
    };
    match serde_json::to_string_pretty(&items) {
        Ok(json) => Response::ok(json),
        Err(e) => Response::error(format!("serialization failed: {}", e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
