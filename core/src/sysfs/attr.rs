//! Scalar attribute access for the pcache control filesystem.
//!
//! Every sysfs attribute is a small plain-text file: reads return the first
//! line, writes replace the whole value. Coercion into integers and booleans
//! is applied by callers via the parse helpers here.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::errors::{open_error, PcacheError, Result};

/// Read a single attribute value: the first line of the file with the
/// trailing newline stripped. Absence of the file is `NotFound`; any other
/// failure is an I/O error.
pub fn read_attr(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

/// Write a value to an existing attribute file. The file is never created:
/// an attribute that does not exist is `NotFound`, the same as on read.
pub fn write_attr(path: &Path, value: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| open_error(path, e))?;
    file.write_all(value.as_bytes())?;
    Ok(())
}

/// Parse an unsigned attribute value: `0x`-prefixed strings are hexadecimal,
/// everything else decimal. No sign handling; all control-plane counters are
/// unsigned.
pub fn parse_u64(s: &str) -> Result<u64> {
    let t = s.trim();
    let parsed = if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16)
    } else {
        t.parse::<u64>()
    };
    parsed.map_err(|_| PcacheError::InvalidArgument(format!("invalid numeric attribute '{}'", s)))
}

/// Same as [`parse_u64`] but bounded to `u32`, the width of every id and
/// counter attribute.
pub fn parse_u32(s: &str) -> Result<u32> {
    let v = parse_u64(s)?;
    u32::try_from(v)
        .map_err(|_| PcacheError::InvalidArgument(format!("numeric attribute out of range '{}'", s)))
}

/// Permissive boolean coercion: the literal `true` is true, anything else
/// (including the empty string) is false. This matches the kernel-side
/// attribute format and is a compatibility behavior, not to be tightened.
pub fn parse_bool(s: &str) -> bool {
    s.trim() == "true"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
