//! Console sink.
//!
//! The writer forwards each record straight to its stream. It adds no locking of
//! its own: with `stdout`/`stderr` the standard library's line lock keeps a single
//! `write` call intact, but records from concurrent emitters are not otherwise
//! ordered.

use crate::metrics::{self, Outcome};
use crate::sink::Sink;
use std::io::{self, Stderr, Stdout, Write};

/// Sink writing to a fixed output stream.
#[derive(Debug)]
pub struct ConsoleWriter<W> {
    name: &'static str,
    stream: W,
}

impl ConsoleWriter<Stdout> {
    pub fn stdout() -> Self {
        Self::new("stdout", io::stdout())
    }
}

impl ConsoleWriter<Stderr> {
    pub fn stderr() -> Self {
        Self::new("stderr", io::stderr())
    }
}

impl Default for ConsoleWriter<Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W> ConsoleWriter<W>
where
    for<'a> &'a W: Write,
{
    /// Wrap any stream that can be written through a shared reference.
    pub fn new(name: &'static str, stream: W) -> Self {
        Self { name, stream }
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let result = (&self.stream).write(buf);
        metrics::record_console_write(Outcome::of(&result));
        result
    }

    pub fn sync(&self) -> io::Result<()> {
        (&self.stream).flush()
    }
}

impl<W> Sink for ConsoleWriter<W>
where
    W: Send + Sync,
    for<'a> &'a W: Write,
{
    fn name(&self) -> &str {
        self.name
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        ConsoleWriter::write(self, buf)
    }

    fn sync(&self) -> io::Result<()> {
        ConsoleWriter::sync(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_write_reports_length() {
        let writer = ConsoleWriter::stdout();
        let msg = b"Hello, world!\n";
        assert_eq!(writer.write(msg).unwrap(), msg.len());
        writer.sync().unwrap();
        assert_eq!(Sink::name(&writer), "stdout");
    }

    #[test]
    fn test_file_backed_console() {
        let file = tempfile::tempfile().unwrap();
        let writer = ConsoleWriter::new("tmp", file);
        assert_eq!(writer.write(b"abc").unwrap(), 3);
        writer.sync().unwrap();
        assert_eq!(writer.get_ref().metadata().unwrap().len(), 3);
    }
}
