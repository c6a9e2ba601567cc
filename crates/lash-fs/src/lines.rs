//! Lazy line reader

use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use lash_session::{Category, Session};

use crate::error::FileError;

/// Lines of a file without terminators.
///
/// The file is opened on the first call to `next`. An open or read failure
/// is recorded as `File:ReadLines` and ends the iteration.
pub struct Lines {
    session: Session,
    path: PathBuf,
    reader: Option<io::Lines<BufReader<fs::File>>>,
    done: bool,
}

impl Lines {
    pub(crate) fn new(session: Session, path: PathBuf) -> Self {
        Self {
            session,
            path,
            reader: None,
            done: false,
        }
    }

    fn fail(&mut self, err: io::Error) {
        self.done = true;
        self.reader = None;
        self.session
            .set_error(Category::File.fail("ReadLines", FileError::io(&self.path, err)));
    }
}

impl Iterator for Lines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        if self.reader.is_none() {
            if self.session.is_error() {
                self.done = true;
                return None;
            }
            match fs::File::open(&self.path) {
                Ok(file) => self.reader = Some(BufReader::new(file).lines()),
                Err(e) => {
                    self.fail(e);
                    return None;
                }
            }
        }

        match self.reader.as_mut()?.next() {
            Some(Ok(line)) => Some(line),
            Some(Err(e)) => {
                self.fail(e);
                None
            }
            None => {
                self.done = true;
                self.reader = None;
                None
            }
        }
    }
}
