//! Background line writer
//!
//! Lines sent from any thread are written in arrival order by one worker
//! thread that owns the file.

use std::fmt::Display;
use std::mem;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use lash_session::{Category, Session};

use crate::error::FileError;
use crate::file::File;

/// Queue of lines written by a worker thread.
///
/// Closing or dropping waits until every line is written, which includes
/// lines from `sender` clones. Drop those clones first or the wait never ends.
#[derive(Debug)]
pub struct Appender {
    session: Session,
    path: PathBuf,
    sender: Sender<String>,
    worker: Option<JoinHandle<()>>,
}

impl Appender {
    pub(crate) fn spawn(mut file: File) -> Self {
        let session = file.session().clone();
        let path = file.path().to_path_buf();
        let (sender, receiver) = mpsc::channel::<String>();

        let worker = thread::Builder::new()
            .name("lash-appender".to_string())
            .spawn(move || {
                for line in receiver {
                    file.write_line(&line);
                }
                file.close();
                tracing::debug!(path = %file.path().display(), "Appender finished");
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                session.set_error(Category::File.fail("Open", FileError::io(&path, e)));
                None
            }
        };

        Self {
            session,
            path,
            sender,
            worker,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Raw sender for producer threads. Lines go out as is.
    pub fn sender(&self) -> Sender<String> {
        self.sender.clone()
    }

    /// Interpolate `template` and queue it
    pub fn append_line(&self, template: &str, args: &[&dyn Display]) -> &Self {
        if self.session.is_error() {
            return self;
        }
        let line = self.session.env_str(template, args);
        if self.sender.send(line).is_err() {
            self.session.set_error(Category::File.fail(
                "AppendLine",
                FileError::AppenderClosed(self.path.display().to_string()),
            ));
        }
        self
    }

    /// Wait for every queued line to be written, then release the file.
    ///
    /// Outstanding clones from `sender` keep the worker alive until dropped.
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        // Replacing our sender with a dead one disconnects the channel
        let (dead, _) = mpsc::channel();
        drop(mem::replace(&mut self.sender, dead));

        if worker.join().is_err() {
            self.session.set_error(Category::File.fail(
                "Close",
                FileError::WorkerPanicked(self.path.display().to_string()),
            ));
        }
    }
}

impl Drop for Appender {
    fn drop(&mut self) {
        self.finish();
    }
}
