//! Console handler implementation

use crate::core::{LoggerError, Result};
use parking_lot::Mutex;
use std::io::{self, Write};

enum ConsoleStream {
    Stdout,
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Writes one rendered record per line to standard output
pub struct ConsoleHandler {
    stream: ConsoleStream,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    /// Send lines to `writer` instead of stdout
    ///
    /// # Example
    ///
    /// ```
    /// use alert_logger::handlers::ConsoleHandler;
    ///
    /// let handler = ConsoleHandler::with_writer(std::io::sink());
    /// handler.write_line("discarded").unwrap();
    /// ```
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            stream: ConsoleStream::Writer(Mutex::new(Box::new(writer))),
        }
    }

    pub fn write_line(&self, line: &str) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => {
                // hold the lock so lines from concurrent emitters never interleave
                let mut out = io::stdout().lock();
                writeln!(out, "{}", line).map_err(|e| {
                    LoggerError::io_operation("writing to stdout", "console write failed", e)
                })
            }
            ConsoleStream::Writer(ref writer) => {
                let mut writer = writer.lock();
                writeln!(writer, "{}", line)?;
                Ok(())
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush()?,
            ConsoleStream::Writer(ref writer) => writer.lock().flush()?,
        }
        Ok(())
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_one_line_per_record() {
        let buffer = Buffer::default();
        let handler = ConsoleHandler::with_writer(buffer.clone());

        handler.write_line("first").unwrap();
        handler.write_line("second").unwrap();
        handler.flush().unwrap();

        let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(output, "first\nsecond\n");
    }

    #[test]
    fn test_stdout_write() {
        let handler = ConsoleHandler::new();
        assert!(handler.write_line("console handler test line").is_ok());
        assert!(handler.flush().is_ok());
    }
}
