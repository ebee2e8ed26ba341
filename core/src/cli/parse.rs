use crate::command::Command;

/// Parse CLI arguments into a typed Command enum.
///
/// The first argument is the operation name (e.g. "cache-start",
/// "backing-list"); the rest are flags. Arguments are expected WITHOUT the
/// program name (i.e. `args` should be `["cache-list"]`, not
/// `["pcache", "cache-list"]`).
pub fn parse_args(args: &[&str]) -> Result<Command, String> {
    if args.is_empty() {
        return Err("No operation specified. Run 'pcache help' for usage.".into());
    }
    if args.contains(&"-h") || args.contains(&"--help") {
        return Ok(Command::Help);
    }

    match args[0] {
        "cache-start" => parse_cache_start(&args[1..]),
        "cache-stop" => parse_cache_stop(&args[1..]),
        "cache-list" => expect_no_flags(&args[1..], Command::CacheList),
        "backing-start" => parse_backing_start(&args[1..]),
        "backing-stop" => parse_backing_stop(&args[1..]),
        "backing-list" => parse_list(&args[1..], |cache, all| Command::BackingList { cache, all }),
        "dev-start" => parse_dev_start(&args[1..]),
        "dev-stop" => parse_dev_stop(&args[1..]),
        "dev-list" => parse_list(&args[1..], |cache, all| Command::DevList { cache, all }),
        "host-list" => parse_host_list(&args[1..]),
        "help" => Ok(Command::Help),
        _ => Err(format!("Unknown operation: '{}'", args[0])),
    }
}

// ---------------------------------------------------------------------------
// Sub-parsers
// ---------------------------------------------------------------------------

/// `pcache cache-start -p <path> [-F] [-f]`
fn parse_cache_start(rest: &[&str]) -> Result<Command, String> {
    let mut path = None;
    let mut force = false;
    let mut format = false;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-p" | "--path" => {
                i += 1;
                path = Some(take_arg(rest, i, "--path")?);
            }
            "-F" | "--force" => force = true,
            "-f" | "--format" => format = true,
            other => return Err(format!("Unknown flag for cache-start: '{}'", other)),
        }
        i += 1;
    }
    let path = path.ok_or("Usage: pcache cache-start -p <path> [-F] [-f]")?;
    Ok(Command::CacheStart { path, force, format })
}

/// `pcache cache-stop -c <cache>`
fn parse_cache_stop(rest: &[&str]) -> Result<Command, String> {
    let mut cache = None;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = Some(take_u32(rest, i, "--cache")?);
            }
            other => return Err(format!("Unknown flag for cache-stop: '{}'", other)),
        }
        i += 1;
    }
    let cache = cache.ok_or("Usage: pcache cache-stop -c <cache>")?;
    Ok(Command::CacheStop { cache })
}

/// `pcache backing-start [-c <cache>] -p <path> [-n <queues>] [--cache-size <size>]`
fn parse_backing_start(rest: &[&str]) -> Result<Command, String> {
    let mut cache = 0;
    let mut path = None;
    let mut queues = None;
    let mut cache_size = None;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = take_u32(rest, i, "--cache")?;
            }
            "-p" | "--path" => {
                i += 1;
                path = Some(take_arg(rest, i, "--path")?);
            }
            "-n" | "--queues" => {
                i += 1;
                queues = Some(take_u32(rest, i, "--queues")?);
            }
            "--cache-size" => {
                i += 1;
                cache_size = Some(take_arg(rest, i, "--cache-size")?);
            }
            other => return Err(format!("Unknown flag for backing-start: '{}'", other)),
        }
        i += 1;
    }
    let path = path.ok_or("Usage: pcache backing-start -p <path> [-c <cache>] [-n <queues>] [--cache-size <size>]")?;
    Ok(Command::BackingStart { cache, path, queues, cache_size })
}

/// `pcache backing-stop [-c <cache>] (-b <backing> | -p <path>)`
fn parse_backing_stop(rest: &[&str]) -> Result<Command, String> {
    let mut cache = 0;
    let mut backing = None;
    let mut path = None;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = take_u32(rest, i, "--cache")?;
            }
            "-b" | "--backing" => {
                i += 1;
                backing = Some(take_u32(rest, i, "--backing")?);
            }
            "-p" | "--path" => {
                i += 1;
                path = Some(take_arg(rest, i, "--path")?);
            }
            other => return Err(format!("Unknown flag for backing-stop: '{}'", other)),
        }
        i += 1;
    }
    Ok(Command::BackingStop { cache, backing, path })
}

/// `pcache dev-start [-c <cache>] -b <backing>`
fn parse_dev_start(rest: &[&str]) -> Result<Command, String> {
    let mut cache = 0;
    let mut backing = None;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = take_u32(rest, i, "--cache")?;
            }
            "-b" | "--backing" => {
                i += 1;
                backing = Some(take_u32(rest, i, "--backing")?);
            }
            other => return Err(format!("Unknown flag for dev-start: '{}'", other)),
        }
        i += 1;
    }
    let backing = backing.ok_or("Usage: pcache dev-start -b <backing> [-c <cache>]")?;
    Ok(Command::DevStart { cache, backing })
}

/// `pcache dev-stop [-c <cache>] -d <dev>`
fn parse_dev_stop(rest: &[&str]) -> Result<Command, String> {
    let mut cache = 0;
    let mut dev = None;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = take_u32(rest, i, "--cache")?;
            }
            "-d" | "--dev" => {
                i += 1;
                dev = Some(take_u32(rest, i, "--dev")?);
            }
            other => return Err(format!("Unknown flag for dev-stop: '{}'", other)),
        }
        i += 1;
    }
    let dev = dev.ok_or("Usage: pcache dev-stop -d <dev> [-c <cache>]")?;
    Ok(Command::DevStop { cache, dev })
}

/// Shared shape of `backing-list` and `dev-list`:
/// `pcache <op> [-c <cache>] [-a]`
fn parse_list(rest: &[&str], build: impl Fn(u32, bool) -> Command) -> Result<Command, String> {
    let mut cache = 0;
    let mut all = false;

    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = take_u32(rest, i, "--cache")?;
            }
            "-a" | "--all" => all = true,
            other => return Err(format!("Unknown flag: '{}'", other)),
        }
        i += 1;
    }
    Ok(build(cache, all))
}

/// `pcache host-list [-c <cache>]`
fn parse_host_list(rest: &[&str]) -> Result<Command, String> {
    let mut cache = 0;
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            "-c" | "--cache" => {
                i += 1;
                cache = take_u32(rest, i, "--cache")?;
            }
            other => return Err(format!("Unknown flag for host-list: '{}'", other)),
        }
        i += 1;
    }
    Ok(Command::HostList { cache })
}

fn expect_no_flags(rest: &[&str], cmd: Command) -> Result<Command, String> {
    match rest.first() {
        None => Ok(cmd),
        Some(other) => Err(format!("Unknown flag: '{}'", other)),
    }
}

fn take_arg(args: &[&str], index: usize, flag: &str) -> Result<String, String> {
    if index >= args.len() {
        return Err(format!("{} requires a value", flag));
    }
    Ok(args[index].into())
}

fn take_u32(args: &[&str], index: usize, flag: &str) -> Result<u32, String> {
    let raw = take_arg(args, index, flag)?;
    raw.parse()
        .map_err(|_| format!("{} requires a numeric id, got '{}'", flag, raw))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
