//! Temporary file allocated at construction, with pass-through open options.
//!
//! Unlike the directory scopes there is no deferred acquisition: the file
//! exists as soon as [`TempFileOptions::create`] returns. Deletion is left to
//! the platform primitive, which removes the file on close unless
//! `delete_on_close` is off.
//!
//! Closing twice is safe: the first close releases the file, later calls
//! return `Ok(())` without touching the disk.

use crate::error::{Result, TempPathError};
use crate::state::{Scope, ScopeState};
use crate::validation::{validate_affix, validate_optional_path};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tempfile::NamedTempFile;
use temppath_platform::{TempPlatform, UniqueName};
use tracing::{debug, trace, warn};

const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

#[cfg(windows)]
const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEPARATOR: &str = "\n";

/// How the stream is opened. The file itself is always newly created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    read: bool,
    append: bool,
    text: bool,
}

impl OpenMode {
    /// `w+b`: read and write bytes.
    pub const READ_WRITE_BINARY: OpenMode = OpenMode {
        read: true,
        append: false,
        text: false,
    };

    /// `w+`: read and write text.
    pub const READ_WRITE_TEXT: OpenMode = OpenMode {
        read: true,
        append: false,
        text: true,
    };

    pub fn is_readable(self) -> bool {
        self.read
    }

    pub fn is_append(self) -> bool {
        self.append
    }

    pub fn is_text(self) -> bool {
        self.text
    }
}

impl Default for OpenMode {
    fn default() -> Self {
        Self::READ_WRITE_BINARY
    }
}

impl FromStr for OpenMode {
    type Err = TempPathError;

    /// Parse an `fopen`-style mode: one of `w`, `x` or `a`, optionally `+`,
    /// optionally `b` or `t`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            TempPathError::invalid_argument("mode", format!("'{}': {}", s, reason))
        };

        let mut create = 0;
        let mut append = false;
        let mut read = false;
        let mut binary = false;
        let mut text = false;

        for c in s.chars() {
            match c {
                'w' | 'x' => create += 1,
                'a' => {
                    create += 1;
                    append = true;
                }
                '+' if !read => read = true,
                'b' if !binary && !text => binary = true,
                't' if !binary && !text => text = true,
                'r' => {
                    return Err(invalid(
                        "temporary files are always created, use 'w+' to read back",
                    ))
                }
                _ => return Err(invalid("unexpected or repeated mode character")),
            }
        }

        if create != 1 {
            return Err(invalid("exactly one of 'w', 'x' or 'a' is required"));
        }

        Ok(OpenMode {
            read,
            append,
            text: !binary,
        })
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = if self.append { "a" } else { "w" };
        let plus = if self.read { "+" } else { "" };
        let kind = if self.text { "" } else { "b" };
        write!(f, "{}{}{}", base, plus, kind)
    }
}

/// Write buffering applied by the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Buffering {
    #[default]
    Default,
    /// Every write goes straight to the file. Binary mode only.
    Unbuffered,
    /// Flush whenever a newline is written. Text mode only.
    Line,
    Capacity(usize),
}

/// Newline translation for text streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Newline {
    /// Write `\n` as the platform line separator; read any of `\n`, `\r\n`,
    /// `\r` back as `\n`.
    #[default]
    Universal,
    /// No translation in either direction.
    Untranslated,
    Lf,
    CrLf,
    Cr,
}

/// Creation options for [`TempFileAllocator`].
#[derive(Debug, Clone)]
pub struct TempFileOptions {
    mode: OpenMode,
    buffering: Buffering,
    encoding: Option<String>,
    newline: Option<Newline>,
    suffix: Option<String>,
    prefix: Option<String>,
    dir: Option<PathBuf>,
    delete: bool,
}

impl Default for TempFileOptions {
    fn default() -> Self {
        Self {
            mode: OpenMode::default(),
            buffering: Buffering::default(),
            encoding: None,
            newline: None,
            suffix: None,
            prefix: None,
            dir: None,
            delete: true,
        }
    }
}

impl TempFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: OpenMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn buffering(mut self, buffering: Buffering) -> Self {
        self.buffering = buffering;
        self
    }

    /// Text encoding; only UTF-8 is supported, and only in text mode.
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn newline(mut self, newline: Newline) -> Self {
        self.newline = Some(newline);
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Directory to create the file in (defaults to the platform temp root).
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Remove the file on close (the default).
    pub fn delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    /// Validate the options and create the file.
    pub fn create(self) -> Result<TempFileAllocator> {
        TempFileAllocator::with_platform(self, temppath_platform::current())
    }

    fn validate(&self) -> Result<()> {
        if let Some(prefix) = &self.prefix {
            validate_affix("prefix", prefix)?;
        }
        if let Some(suffix) = &self.suffix {
            validate_affix("suffix", suffix)?;
        }

        if !self.mode.text {
            if self.encoding.is_some() {
                return Err(TempPathError::invalid_argument(
                    "encoding",
                    "binary mode doesn't take an encoding",
                ));
            }
            if self.newline.is_some() {
                return Err(TempPathError::invalid_argument(
                    "newline",
                    "binary mode doesn't take a newline mode",
                ));
            }
        }

        if let Some(encoding) = &self.encoding {
            let normalized: String = encoding
                .chars()
                .filter(|c| !matches!(c, '-' | '_'))
                .collect::<String>()
                .to_ascii_lowercase();
            if normalized != "utf8" {
                return Err(TempPathError::invalid_argument(
                    "encoding",
                    format!("unsupported encoding '{}'", encoding),
                ));
            }
        }

        match self.buffering {
            Buffering::Unbuffered if self.mode.text => Err(TempPathError::invalid_argument(
                "buffering",
                "can't have unbuffered text I/O",
            )),
            Buffering::Line if !self.mode.text => Err(TempPathError::invalid_argument(
                "buffering",
                "line buffering requires text mode",
            )),
            Buffering::Capacity(0) => Err(TempPathError::invalid_argument(
                "buffering",
                "capacity must be positive, use Buffering::Unbuffered",
            )),
            _ => Ok(()),
        }
    }
}

/// Open stream of a [`TempFileAllocator`].
pub struct TempStream {
    file: NamedTempFile,
    mode: OpenMode,
    buffering: Buffering,
    newline: Newline,
    pending: Vec<u8>,
}

impl TempStream {
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Write `text`, translating `\n` per the newline mode.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.ensure_text("write text")?;
        let translated = translate_for_write(text, self.newline);
        self.write_all(translated.as_bytes())?;
        Ok(())
    }

    /// Read from the current position to the end as UTF-8 text.
    pub fn read_text(&mut self) -> Result<String> {
        self.ensure_text("read text")?;
        let mut raw = Vec::new();
        self.read_to_end(&mut raw)?;
        let text =
            String::from_utf8(raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(match self.newline {
            Newline::Universal => normalize_newlines(&text),
            _ => text,
        })
    }

    fn ensure_text(&self, operation: &str) -> Result<()> {
        if self.mode.text {
            Ok(())
        } else {
            Err(TempPathError::invalid_argument(
                "mode",
                format!("cannot {} on a binary stream", operation),
            ))
        }
    }

    fn capacity(&self) -> Option<usize> {
        match self.buffering {
            Buffering::Unbuffered => None,
            Buffering::Default | Buffering::Line => Some(DEFAULT_BUFFER_CAPACITY),
            Buffering::Capacity(n) => Some(n),
        }
    }

    fn flush_pending(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            self.file.write_all(&self.pending)?;
            self.pending.clear();
        }
        Ok(())
    }

    fn into_inner(mut self) -> io::Result<NamedTempFile> {
        self.flush_pending()?;
        Ok(self.file)
    }
}

impl Write for TempStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some(capacity) = self.capacity() else {
            return self.file.write(buf);
        };

        if self.pending.len() + buf.len() > capacity {
            self.flush_pending()?;
        }
        if buf.len() >= capacity {
            return self.file.write(buf);
        }

        self.pending.extend_from_slice(buf);
        if self.buffering == Buffering::Line && buf.contains(&b'\n') {
            self.flush_pending()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending()?;
        self.file.flush()
    }
}

impl Read for TempStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.mode.read {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("stream opened with mode '{}' is not readable", self.mode),
            ));
        }
        self.flush_pending()?;
        self.file.read(buf)
    }
}

impl Seek for TempStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.flush_pending()?;
        self.file.seek(pos)
    }
}

impl fmt::Debug for TempStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempStream")
            .field("path", &self.file.path())
            .field("mode", &self.mode)
            .field("buffering", &self.buffering)
            .field("newline", &self.newline)
            .field("pending", &self.pending.len())
            .finish()
    }
}

fn translate_for_write(text: &str, newline: Newline) -> Cow<'_, str> {
    let separator = match newline {
        Newline::Universal => LINE_SEPARATOR,
        Newline::CrLf => "\r\n",
        Newline::Cr => "\r",
        Newline::Lf | Newline::Untranslated => "\n",
    };
    if separator == "\n" {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.replace('\n', separator))
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// A named temporary file and its open stream.
pub struct TempFileAllocator {
    path: PathBuf,
    stream: Option<TempStream>,
    delete_on_close: bool,
}

impl TempFileAllocator {
    /// Binary read-write file in the platform temp root, deleted on close.
    pub fn new() -> Result<Self> {
        TempFileOptions::default().create()
    }

    /// Create the file through the given platform.
    pub fn with_platform(
        options: TempFileOptions,
        platform: Arc<dyn TempPlatform>,
    ) -> Result<Self> {
        options.validate()?;
        let dir = validate_optional_path("dir", options.dir.as_deref())?;

        let name = UniqueName::default()
            .with_parent(dir.as_deref())
            .with_prefix(options.prefix.as_deref())
            .with_suffix(options.suffix.as_deref());
        let file = platform.create_unique_file(&name, options.mode.append)?;
        let path = file.path().to_path_buf();
        debug!(
            path = %path.display(),
            mode = %options.mode,
            delete = options.delete,
            "allocated temporary file"
        );

        Ok(Self {
            path,
            stream: Some(TempStream {
                file,
                mode: options.mode,
                buffering: options.buffering,
                newline: options.newline.unwrap_or_default(),
                pending: Vec::new(),
            }),
            delete_on_close: options.delete,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn delete_on_close(&self) -> bool {
        self.delete_on_close
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    /// The open stream; fails once the file is closed.
    pub fn stream(&mut self) -> Result<&mut TempStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| TempPathError::invalid_state("access the stream", ScopeState::Exited))
    }

    /// Flush and close the file, deleting it if `delete_on_close` is set.
    pub fn close(&mut self) -> Result<()> {
        let Some(stream) = self.stream.as_mut() else {
            trace!(path = %self.path.display(), "already closed");
            return Ok(());
        };
        // Flush while still owned, so a failed flush leaves the file open.
        stream.flush()?;

        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        let file = stream.into_inner()?;
        if self.delete_on_close {
            file.close()?;
            debug!(path = %self.path.display(), "closed and removed temporary file");
        } else {
            file.keep().map_err(|e| e.error)?;
            debug!(path = %self.path.display(), "closed temporary file, keeping it");
        }
        Ok(())
    }
}

impl Read for TempFileAllocator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream()?.read(buf)
    }
}

impl Write for TempFileAllocator {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream()?.flush()
    }
}

impl Seek for TempFileAllocator {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.stream()?.seek(pos)
    }
}

impl Scope for TempFileAllocator {
    /// The file is acquired at construction, so entering only checks that it
    /// is still open.
    fn enter(&mut self) -> Result<&Path> {
        if self.stream.is_none() {
            return Err(TempPathError::invalid_state("enter", ScopeState::Exited));
        }
        Ok(self.path.as_path())
    }

    fn exit(&mut self) -> Result<()> {
        self.close()
    }

    fn state(&self) -> ScopeState {
        if self.stream.is_some() {
            ScopeState::Entered
        } else {
            ScopeState::Exited
        }
    }
}

impl Drop for TempFileAllocator {
    fn drop(&mut self) {
        if self.stream.is_none() {
            return;
        }
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "failed to close temporary file");
        }
    }
}

impl fmt::Debug for TempFileAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TempFileAllocator")
            .field("path", &self.path)
            .field("delete_on_close", &self.delete_on_close)
            .field("closed", &self.is_closed())
            .finish()
    }
}
