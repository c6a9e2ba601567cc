//! File handle bound to a session
//!
//! Nothing is opened until the first write. Every operation is a no-op once
//! the session holds an error.

use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lash_session::{Category, Session};

use crate::appender::Appender;
use crate::error::FileError;
use crate::lines::Lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    Append,
    Truncate,
}

#[derive(Debug)]
pub struct File {
    session: Session,
    path: PathBuf,
    handle: Option<fs::File>,
}

impl File {
    /// File at the interpolated `name`
    pub fn open(session: &Session, name: &str, args: &[&dyn Display]) -> Self {
        let path = if session.is_error() {
            PathBuf::from(name)
        } else {
            PathBuf::from(session.env_str(name, args))
        };
        Self::from_path(session, path)
    }

    /// File at `path`, taken literally
    pub fn from_path(session: &Session, path: impl Into<PathBuf>) -> Self {
        Self {
            session: session.clone(),
            path: path.into(),
            handle: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    fn fail(&self, action: &'static str, err: FileError) {
        self.session.set_error(Category::File.fail(action, err));
    }

    fn io_fail(&self, action: &'static str, err: io::Error) {
        self.fail(action, FileError::io(&self.path, err));
    }

    /// Whole file as text, empty on failure
    pub fn read_string(&self) -> String {
        if self.session.is_error() {
            return String::new();
        }
        fs::read_to_string(&self.path).unwrap_or_else(|e| {
            self.io_fail("String", e);
            String::new()
        })
    }

    /// Whole file as bytes, empty on failure
    pub fn read_bytes(&self) -> Vec<u8> {
        if self.session.is_error() {
            return Vec::new();
        }
        fs::read(&self.path).unwrap_or_else(|e| {
            self.io_fail("Bytes", e);
            Vec::new()
        })
    }

    /// Decode the file as JSON
    pub fn read_json<T: DeserializeOwned>(&self) -> Option<T> {
        if self.session.is_error() {
            return None;
        }
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.io_fail("AsJSON_read", e);
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail("AsJSON_unmarshal", FileError::json(&self.path, e));
                None
            }
        }
    }

    /// Iterate the lines of the file, each call starts from the top
    pub fn read_lines(&self) -> Lines {
        Lines::new(self.session.clone(), self.path.clone())
    }

    fn ensure_open(&mut self, mode: OpenMode) -> Option<&mut fs::File> {
        if self.handle.is_none() {
            let mut options = OpenOptions::new();
            match mode {
                OpenMode::Append => options.read(true).append(true).create(true),
                OpenMode::Truncate => options.read(true).write(true).truncate(true).create(true),
            };
            match options.open(&self.path) {
                Ok(file) => {
                    tracing::trace!(path = %self.path.display(), ?mode, "Opened file");
                    self.handle = Some(file);
                }
                Err(e) => {
                    let action = match mode {
                        OpenMode::Append => "Open",
                        OpenMode::Truncate => "Truncate",
                    };
                    self.io_fail(action, e);
                    return None;
                }
            }
        }
        self.handle.as_mut()
    }

    /// Interpolate `template` and append it plus a newline
    pub fn append_line(&mut self, template: &str, args: &[&dyn Display]) -> &mut Self {
        if self.session.is_error() {
            return self;
        }
        let line = self.session.env_str(template, args);
        self.write_line(&line);
        self
    }

    /// Append `line` as is
    pub(crate) fn write_line(&mut self, line: &str) {
        if self.session.is_error() {
            return;
        }
        let Some(handle) = self.ensure_open(OpenMode::Append) else {
            return;
        };
        if let Err(e) = writeln!(handle, "{}", line) {
            self.io_fail("AppendLine", e);
        }
    }

    /// Empty the file, later appends start from the beginning
    pub fn truncate(&mut self) -> &mut Self {
        if self.session.is_error() {
            return self;
        }
        self.close();
        self.ensure_open(OpenMode::Truncate);
        self
    }

    /// Hand the file to a background writer
    pub fn appender(self) -> Appender {
        Appender::spawn(self)
    }

    /// Sync to disk and release the handle, if open
    pub fn close(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.sync_all() {
            self.io_fail("Close", e);
        }
    }

    pub fn delete(&mut self) {
        if self.session.is_error() {
            return;
        }
        self.close();
        if let Err(e) = fs::remove_file(&self.path) {
            self.io_fail("Delete", e);
        }
    }

    /// Create the directory at this path, parents included
    pub fn mkdir(&self) {
        if self.session.is_error() {
            return;
        }
        if let Err(e) = fs::create_dir_all(&self.path) {
            self.io_fail("Mkdir", e);
        }
    }

    /// Copy to the interpolated `dest`, keeping permissions. Returns the copy.
    pub fn copy_to(&self, dest: &str, args: &[&dyn Display]) -> File {
        let copy = File::open(&self.session, dest, args);
        if self.session.is_error() {
            return copy;
        }
        if let Err(e) = copy_file(&self.path, copy.path()) {
            self.io_fail("Copy", e);
        }
        copy
    }
}

/// Write into a temp file beside `dst`, then rename over it
fn copy_file(src: &Path, dst: &Path) -> io::Result<()> {
    let mut input = fs::File::open(src)?;
    let permissions = input.metadata()?.permissions();

    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut input, &mut tmp)?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(dst).map_err(|e| e.error)?;
    Ok(())
}
