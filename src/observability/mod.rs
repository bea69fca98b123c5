//! Log output for the store.
//!
//! Every operation emits `tracing` spans and events. This module installs the
//! subscriber that writes them, as plain text lines, to a size-rotated file in the
//! data directory:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → FileWriter → portfolio-store.log
//! ```
//!
//! Files rotate at 10 MiB with 3 backups retained. The level is taken from
//! `RUST_LOG`, then [`Config::trace_level`](crate::Config::trace_level), then
//! `"info"`.
//!
//! # Modules
//!
//! - `init`: subscriber setup
//! - [`file_writer`]: rotating file writer with size-based rotation

pub mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
