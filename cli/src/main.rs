//! pcache CLI — the command-line entry point for the pcache admin client.
//!
//! # Usage
//!
//! ```text
//! pcache cache-start -p /mnt/pmem0 -f
//! pcache backing-start -p /dev/sdb --cache-size 512M
//! pcache dev-start -b 0
//! pcache dev-list
//! ```

use std::process;

use pcache_admin_core::cli::parse_args;
use pcache_admin_core::response::Response;
use pcache_admin_core::settings::Settings;
use pcache_admin_core::sys::Sys;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let arg_refs: Vec<&str> = args[1..].iter().map(|s| s.as_str()).collect();

    let cmd = match parse_args(&arg_refs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("pcache: {}", e);
            process::exit(1);
        }
    };

    let settings = match Settings::resolve() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("pcache: {}", e);
            process::exit(1);
        }
    };

    match Sys::new(&settings).execute(cmd) {
        Response::Ok { output } => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Response::NoEffect { output } => {
            println!("{}", output);
            process::exit(1);
        }
        Response::Error { message } => {
            eprintln!("pcache: {}", message);
            process::exit(1);
        }
    }
}
