//! Response — the result of dispatching one command.

use serde::{Deserialize, Serialize};

/// The outcome of one `Sys::execute()` call.
///
/// `NoEffect` is distinct from both success and failure: the command was
/// accepted by the kernel but produced no observable state change. The
/// presentation layer reports it on stdout yet exits non-zero, so scripts
/// can tell the three outcomes apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status")]
pub enum Response {
    #[serde(rename = "ok")]
    Ok { output: String },
    #[serde(rename = "no_effect")]
    NoEffect { output: String },
    #[serde(rename = "error")]
    Error { message: String },
}

impl Response {
    /// Success with no output.
    pub fn empty() -> Self {
        Response::Ok {
            output: String::new(),
        }
    }

    pub fn ok(output: impl Into<String>) -> Self {
        Response::Ok {
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
