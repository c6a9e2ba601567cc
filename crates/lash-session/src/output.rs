//! Output sinks

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

pub(crate) type Sink = Mutex<Box<dyn Write + Send>>;

pub(crate) fn sink<W: Write + Send + 'static>(writer: W) -> Sink {
    Mutex::new(Box::new(writer))
}

/// Write one line, output failures are dropped
pub(crate) fn write_line(sink: &Sink, line: &str) {
    let mut out = sink.lock();
    let _ = writeln!(out, "{}", line);
    let _ = out.flush();
}

/// In-memory writer for capturing session output
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
