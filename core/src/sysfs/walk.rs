//! Directory enumeration for numerically keyed control-filesystem entries.

use std::fs;
use std::path::Path;

use crate::errors::{open_error, Result};

/// Walk the entries of `dir` whose names are `<prefix><N>` for a numeric `N`,
/// invoking `handler(N, entry_path)` once per match.
///
/// Entries arrive in the order the OS returns them; callers must not depend
/// on numeric ordering. Entries that do not match the prefix, or whose suffix
/// is not a plain decimal number, are silently skipped. The first handler
/// error aborts the walk and is propagated. Failing to open the directory is
/// a hard error.
pub fn walk_prefixed<F>(dir: &Path, prefix: &str, mut handler: F) -> Result<()>
where
    F: FnMut(u32, &Path) -> Result<()>,
{
    let entries = fs::read_dir(dir).map_err(|e| open_error(dir, e))?;
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let Some(suffix) = name.strip_prefix(prefix) else {
            continue;
        };
        let Ok(id) = suffix.parse::<u32>() else {
            continue;
        };
        handler(id, &entry.path())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
