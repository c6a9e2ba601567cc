//! Lash FS
//!
//! File helpers bound to a session:
//! - Paths are `$token` interpolated
//! - Failures are recorded as `File:<Action>` and later calls do nothing
//! - `Appender` moves writes onto a worker thread

mod appender;
mod error;
mod file;
mod lines;

pub use appender::Appender;
pub use error::FileError;
pub use file::File;
pub use lines::Lines;

pub type Result<T> = std::result::Result<T, FileError>;
