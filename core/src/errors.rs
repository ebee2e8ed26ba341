use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Core errors
// ---------------------------------------------------------------------------

/// Errors produced by the pcache admin core.
#[derive(Debug)]
pub enum PcacheError {
    /// A control-filesystem entry does not exist. During discovery loops this
    /// also marks the end of a zero-based probe sequence.
    NotFound(PathBuf),
    /// Open/read/write failure other than absence.
    Io(io::Error),
    /// A required identifier or argument was missing or malformed.
    InvalidArgument(String),
    /// An admin-channel command write did not succeed after exhausting
    /// retries.
    CommandFailed { command: String, reason: String },
}

pub type Result<T> = std::result::Result<T, PcacheError>;

impl PcacheError {
    /// True if this error represents absence of a control-filesystem entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PcacheError::NotFound(_))
    }
}

impl fmt::Display for PcacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PcacheError::NotFound(path) => {
                write!(f, "not found: {}", path.display())
            }
            PcacheError::Io(e) => write!(f, "I/O error: {}", e),
            PcacheError::InvalidArgument(msg) => {
                write!(f, "invalid argument: {}", msg)
            }
            PcacheError::CommandFailed { command, reason } => {
                write!(f, "command '{}' failed: {}", command, reason)
            }
        }
    }
}

impl std::error::Error for PcacheError {}

impl From<io::Error> for PcacheError {
    fn from(e: io::Error) -> Self {
        PcacheError::Io(e)
    }
}

/// Map an open/read error on `path` to the core taxonomy: `ENOENT` becomes
/// `NotFound` (absence is meaningful to discovery loops), everything else
/// stays an I/O error.
pub(crate) fn open_error(path: &Path, e: io::Error) -> PcacheError {
    if e.kind() == io::ErrorKind::NotFound {
        PcacheError::NotFound(path.to_path_buf())
    } else {
        PcacheError::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let e = PcacheError::NotFound(PathBuf::from("/sys/bus/pcache/devices/cache_dev0/info"));
        assert_eq!(
            e.to_string(),
            "not found: /sys/bus/pcache/devices/cache_dev0/info"
        );
        assert!(e.is_not_found());
    }

    #[test]
    fn invalid_argument_display() {
        let e = PcacheError::InvalidArgument("--backing required".into());
        assert_eq!(e.to_string(), "invalid argument: --backing required");
        assert!(!e.is_not_found());
    }

    #[test]
    fn command_failed_display() {
        let e = PcacheError::CommandFailed {
            command: "op=dev-stop,dev_id=0".into(),
            reason: "permission denied".into(),
        };
        assert_eq!(
            e.to_string(),
            "command 'op=dev-stop,dev_id=0' failed: permission denied"
        );
    }

    #[test]
    fn open_error_maps_enoent() {
        let path = Path::new("/no/such/attr");
        let e = open_error(path, io::Error::from(io::ErrorKind::NotFound));
        assert!(e.is_not_found());

        let e = open_error(path, io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(e, PcacheError::Io(_)));
    }

    #[test]
    fn from_io_error() {
        let e: PcacheError = io::Error::from(io::ErrorKind::BrokenPipe).into();
        assert!(matches!(e, PcacheError::Io(_)));
    }
}
