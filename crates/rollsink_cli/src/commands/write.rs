//! Write command implementation.

use rollsink::{RotateResult, RotatingFileWriter, WriterConfig};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;

/// Default number of bytes handed to the writer per call.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// What a pump run produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Bytes copied from the reader.
    pub bytes: u64,
    /// Files opened along the way.
    pub files_opened: usize,
    /// The file that was open when input ended.
    pub last_file: Option<PathBuf>,
}

/// Runs the write command: stdin until EOF, then flush and close.
pub fn run(config: WriterConfig, chunk_size: usize) -> Result<(), Box<dyn std::error::Error>> {
    if chunk_size == 0 {
        return Err("chunk size must be greater than zero".into());
    }

    info!(
        template = %config.path.display(),
        size_limit = config.size_limit,
        "Streaming stdin"
    );

    let writer = RotatingFileWriter::new(config);
    let summary = pump(io::stdin().lock(), &writer, chunk_size)?;
    writer.sync()?;
    writer.close();

    info!(
        bytes = summary.bytes,
        files = summary.files_opened,
        last = ?summary.last_file,
        "Input finished"
    );
    Ok(())
}

/// Copies `reader` into `writer`, one `write_all_bytes` call per chunk.
///
/// Chunks are the rotation granularity: a chunk never straddles two files.
pub fn pump<R: Read>(
    mut reader: R,
    writer: &RotatingFileWriter,
    chunk_size: usize,
) -> RotateResult<WriteSummary> {
    let mut buf = vec![0u8; chunk_size];
    let mut summary = WriteSummary::default();

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        writer.write_all_bytes(&buf[..n])?;
        summary.bytes += n as u64;

        let current = writer.current_name();
        if current != summary.last_file {
            summary.files_opened += 1;
            summary.last_file = current;
        }
    }

    Ok(summary)
}
