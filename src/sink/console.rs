//! Console sink.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::sink::Sink;

/// Standard stream a console sink writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// Writes each line to a standard stream and flushes immediately.
pub struct ConsoleSink {
    stream: ConsoleStream,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn new(stream: ConsoleStream) -> Self {
        let out: Box<dyn Write + Send> = match stream {
            ConsoleStream::Stdout => Box::new(io::stdout()),
            ConsoleStream::Stderr => Box::new(io::stderr()),
        };
        Self {
            stream,
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    /// Console sink over an arbitrary writer (pipes, test buffers).
    pub fn with_writer(stream: ConsoleStream, writer: impl Write + Send + 'static) -> Self {
        Self {
            stream,
            out: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("stream", &self.stream)
            .finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner).flush()
    }
}
