//! Support library for the `radfx` command-line tool.
//!
//! Exposes PNG grayscale I/O so other crates (and the integration tests)
//! can drive the engine with the same decoding the CLI uses.

pub mod io;

pub use io::{read_gray, write_gray};
