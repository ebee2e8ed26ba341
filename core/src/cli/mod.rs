//! CLI argument parsing, shared between the binary and its tests.

mod parse;

pub use parse::parse_args;
