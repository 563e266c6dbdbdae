//! Record destinations and the fan-out over them.

use std::io;
use std::sync::Arc;

/// Destination for encoded records.
///
/// A sink receives one complete record per `write` call. Implementations must
/// be shareable across threads; any internal locking is their own concern.
pub trait Sink: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &str;

    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    fn sync(&self) -> io::Result<()>;
}

/// Ordered set of sinks written as one.
#[derive(Clone, Default)]
pub struct FanOut {
    sinks: Vec<Arc<dyn Sink>>,
}

impl FanOut {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Sink>> {
        self.sinks.iter()
    }

    /// Write `buf` to every sink in registration order. A failing sink does not
    /// stop delivery to the rest; returns the number of sinks that failed.
    pub fn deliver(&self, buf: &[u8]) -> usize {
        let mut failed = 0;
        for sink in &self.sinks {
            if let Err(e) = sink.write(buf) {
                failed += 1;
                tracing::warn!(sink = sink.name(), error = %e, "failed to deliver log record");
            }
        }
        failed
    }

    /// Sync every sink, returning the first error after all were attempted.
    pub fn sync(&self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &self.sinks {
            if let Err(e) = sink.sync() {
                tracing::warn!(sink = sink.name(), error = %e, "failed to sync log sink");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FanOut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sinks.iter().map(|s| s.name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Memory {
        buf: Mutex<Vec<u8>>,
    }

    impl Sink for Memory {
        fn name(&self) -> &str {
            "memory"
        }

        fn write(&self, buf: &[u8]) -> io::Result<usize> {
            self.buf.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn sync(&self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Sink for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn write(&self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken pipe"))
        }

        fn sync(&self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "broken pipe"))
        }
    }

    #[test]
    fn test_failure_does_not_stop_delivery() {
        let first = Arc::new(Memory::default());
        let last = Arc::new(Memory::default());
        let fan = FanOut::new(vec![
            first.clone() as Arc<dyn Sink>,
            Arc::new(Broken),
            last.clone(),
        ]);

        assert_eq!(fan.deliver(b"line\n"), 1);
        assert_eq!(*first.buf.lock().unwrap(), b"line\n");
        assert_eq!(*last.buf.lock().unwrap(), b"line\n");
        assert!(fan.sync().is_err());
    }

    #[test]
    fn test_empty_fan_out() {
        let fan = FanOut::default();
        assert!(fan.is_empty());
        assert_eq!(fan.deliver(b"x"), 0);
        assert!(fan.sync().is_ok());
    }
}
