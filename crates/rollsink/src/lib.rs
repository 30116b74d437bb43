//! # rollsink
//!
//! A byte sink that rotates across numbered files.
//!
//! Writes go to `<base>_<index><ext>` next to a path template. A new index is
//! opened on the first write of every writer and whenever the open file has
//! reached the configured size limit. The index is derived from the files
//! already on disk, so restarting a process continues the sequence instead of
//! overwriting it.
//!
//! ## Design Principles
//!
//! - The sink is opaque: it never interprets the bytes it stores
//! - Naming state lives on disk; there is no counter file
//! - Resolve, rotate and write happen under one exclusive lock
//! - Open and write failures are returned, never fatal
//!
//! ## Example
//!
//! ```rust
//! use rollsink::{RotatingFileWriter, WriterConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let writer = RotatingFileWriter::new(
//!     WriterConfig::new(dir.path().join("capture.pcap")).size_limit(4),
//! );
//!
//! writer.write_all_bytes(b"abcd").unwrap();
//! writer.write_all_bytes(b"efgh").unwrap();
//!
//! assert_eq!(std::fs::read(dir.path().join("capture_0.pcap")).unwrap(), b"abcd");
//! assert_eq!(std::fs::read(dir.path().join("capture_1.pcap")).unwrap(), b"efgh");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
pub mod naming;
mod writer;

pub use config::WriterConfig;
pub use error::{ResolveError, RotateError, RotateResult};
pub use writer::RotatingFileWriter;
