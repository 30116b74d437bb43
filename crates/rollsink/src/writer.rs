//! Size-bounded rotating file writer.

use crate::config::WriterConfig;
use crate::error::{RotateError, RotateResult};
use crate::naming;
use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::mem;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Mutable state guarded by the writer's lock.
#[derive(Debug, Default)]
struct WriterState {
    /// Path of the open file; `None` until the first successful open.
    current_name: Option<PathBuf>,
    /// Bytes written to the open file since it was opened.
    current_file_size: u64,
    file: Option<File>,
    closed: bool,
}

/// A byte sink that spreads its input across numbered files.
///
/// Given the template `/var/log/capture.log`, output goes to
/// `/var/log/capture_<n>.log`. The first write of a writer opens the file one
/// above the highest index already on disk (or index 0), and every write that
/// finds the open file at or over the size limit moves on to the next index.
/// The limit is checked before each write, so a file exceeds it by at most
/// the size of the write that crossed it.
///
/// # Thread Safety
///
/// All state sits behind one lock. A write resolves the target name, rotates
/// if needed, and writes while holding it exclusively, so concurrent writers
/// never split a rotation and their buffers land in lock order.
///
/// # Example
///
/// ```no_run
/// use rollsink::{RotatingFileWriter, WriterConfig};
/// use std::io::Write;
///
/// let writer = RotatingFileWriter::new(WriterConfig::new("/tmp/out.log").size_limit(10));
/// (&writer).write_all(b"12345").unwrap();  // out_0.log
/// (&writer).write_all(b"67890").unwrap();  // out_0.log, now at the limit
/// (&writer).write_all(b"X").unwrap();      // out_1.log
/// ```
pub struct RotatingFileWriter {
    template: PathBuf,
    size_limit: u64,
    create_dirs: bool,
    state: RwLock<WriterState>,
}

impl RotatingFileWriter {
    /// Creates a writer from a configuration.
    ///
    /// Nothing is opened until the first write.
    #[must_use]
    pub fn new(config: WriterConfig) -> Self {
        Self {
            template: config.path,
            size_limit: config.size_limit,
            create_dirs: config.create_dirs,
            state: RwLock::new(WriterState::default()),
        }
    }

    /// Creates a writer for `template` with the given size limit (0 = unbounded).
    #[must_use]
    pub fn with_template(template: impl Into<PathBuf>, size_limit: u64) -> Self {
        Self::new(WriterConfig::new(template).size_limit(size_limit))
    }

    /// Returns the path template.
    #[must_use]
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Returns the per-file size limit (0 = unbounded).
    #[must_use]
    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }

    /// Returns the path of the open file, if any file has been opened.
    #[must_use]
    pub fn current_name(&self) -> Option<PathBuf> {
        self.state.read().current_name.clone()
    }

    /// Returns the bytes written to the open file.
    #[must_use]
    pub fn current_file_size(&self) -> u64 {
        self.state.read().current_file_size
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    /// Returns the path the next write would target.
    ///
    /// Advisory only: another thread may write or rotate before the caller
    /// acts on it. Calling it twice with no write in between gives the same
    /// answer as long as the directory is unchanged.
    #[must_use]
    pub fn next_name(&self) -> PathBuf {
        let state = self.state.read();
        self.resolve_locked(&state)
    }

    /// Writes `buf` to the current file, rotating first if due.
    ///
    /// Performs a single underlying write and returns the number of bytes it
    /// accepted, which may be less than `buf.len()`.
    ///
    /// # Errors
    ///
    /// - [`RotateError::OpenFailed`] if the target file cannot be opened;
    ///   nothing is written and the previous file stays current.
    /// - [`RotateError::Io`] if the write itself fails.
    /// - [`RotateError::Closed`] after [`close`](Self::close).
    pub fn write_bytes(&self, buf: &[u8]) -> RotateResult<usize> {
        let mut state = self.state.write();
        if state.closed {
            return Err(RotateError::Closed);
        }
        if buf.is_empty() {
            return Ok(0);
        }

        let file = self.ensure_open(&mut state)?;
        let written = file.write(buf)?;
        state.current_file_size += written as u64;
        Ok(written)
    }

    /// Writes all of `buf` into a single file.
    ///
    /// The rotation decision is made once, so a buffer is never split across
    /// files.
    ///
    /// # Errors
    ///
    /// As [`write_bytes`](Self::write_bytes); a failure after some bytes
    /// reached the file is reported as [`RotateError::PartialWrite`].
    pub fn write_all_bytes(&self, buf: &[u8]) -> RotateResult<()> {
        let mut state = self.state.write();
        if state.closed {
            return Err(RotateError::Closed);
        }
        if buf.is_empty() {
            return Ok(());
        }

        let file = self.ensure_open(&mut state)?;
        let mut written = 0;
        let result = loop {
            if written == buf.len() {
                break Ok(());
            }
            match file.write(&buf[written..]) {
                Ok(0) => {
                    break Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole buffer",
                    ))
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => break Err(e),
            }
        };
        state.current_file_size += written as u64;

        result.map_err(|source| {
            if written == 0 {
                RotateError::Io(source)
            } else {
                RotateError::PartialWrite { written, source }
            }
        })
    }

    /// Flushes the open file. No-op when nothing is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&self) -> RotateResult<()> {
        if let Some(file) = self.state.write().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    /// Syncs the open file's data and metadata to disk. No-op when nothing
    /// is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    pub fn sync(&self) -> RotateResult<()> {
        if let Some(file) = self.state.read().file.as_ref() {
            file.sync_all()?;
        }
        Ok(())
    }

    /// Releases the open file and rejects further writes.
    ///
    /// Closing twice is a no-op, and closing a writer that never opened a
    /// file only marks it closed.
    pub fn close(&self) {
        let mut state = self.state.write();
        if state.closed {
            return;
        }

        if let Some(file) = state.file.take() {
            drop(file);
            debug!(
                path = ?state.current_name,
                bytes = state.current_file_size,
                "closed rotating writer"
            );
        }
        state.closed = true;
        state.current_file_size = 0;
    }

    fn should_rotate(&self, state: &WriterState) -> bool {
        state.current_name.is_none()
            || (self.size_limit > 0 && state.current_file_size >= self.size_limit)
    }

    /// Resolves the target path, degrading to the bare template on failure.
    fn resolve_locked(&self, state: &WriterState) -> PathBuf {
        match naming::resolve(&self.template, self.should_rotate(state)) {
            Ok(path) => path,
            Err(err) => {
                warn!(
                    template = %self.template.display(),
                    error = %err,
                    "cannot resolve indexed file name, writing to template path"
                );
                self.template.clone()
            }
        }
    }

    /// Returns the file the next bytes belong in, opening it if needed.
    ///
    /// The replacement is opened before the previous handle is released, so a
    /// failed open leaves the writer exactly as it was.
    fn ensure_open<'s>(&self, state: &'s mut WriterState) -> RotateResult<&'s mut File> {
        let target = self.resolve_locked(state);

        let file = match state.file.take() {
            Some(file) if state.current_name.as_deref() == Some(target.as_path()) => file,
            previous => match self.open_target(&target) {
                Ok(file) => {
                    drop(previous);
                    let from = state.current_name.replace(target);
                    let from_size = mem::take(&mut state.current_file_size);
                    debug!(
                        path = ?state.current_name,
                        previous = ?from,
                        previous_bytes = from_size,
                        "opened output file"
                    );
                    file
                }
                Err(err) => {
                    state.file = previous;
                    return Err(err);
                }
            },
        };

        Ok(state.file.insert(file))
    }

    fn open_target(&self, path: &Path) -> RotateResult<File> {
        let open = || -> io::Result<File> {
            if self.create_dirs {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
            }

            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o660);
            }
            options.open(path)
        };

        open().map_err(|source| RotateError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("RotatingFileWriter")
            .field("template", &self.template)
            .field("size_limit", &self.size_limit)
            .field("current_name", &state.current_name)
            .field("current_file_size", &state.current_file_size)
            .field("closed", &state.closed)
            .finish_non_exhaustive()
    }
}

impl Write for &RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf)?)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Ok(self.write_all_bytes(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(RotatingFileWriter::flush(*self)?)
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf)?)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        Ok(self.write_all_bytes(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(RotatingFileWriter::flush(self)?)
    }
}
