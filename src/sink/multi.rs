//! Best-effort fan-out to several sinks.

use std::io;
use std::sync::Arc;

use super::Sink;

/// Writes every record to every member.
///
/// A failing member never prevents the write attempt on the others; all
/// failures are folded into one error for the caller to report.
#[derive(Clone, Default)]
pub struct MultiSink {
    sinks: Vec<Arc<dyn Sink>>,
}

impl MultiSink {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self { sinks }
    }

    fn each(&self, mut op: impl FnMut(&dyn Sink) -> io::Result<()>) -> io::Result<()> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = op(sink.as_ref()) {
                failures.push(e);
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => {
                let joined = failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(io::Error::other(joined))
            }
        }
    }
}

impl Sink for MultiSink {
    fn write_record(&self, record: &[u8]) -> io::Result<()> {
        self.each(|sink| sink.write_record(record))
    }

    fn flush(&self) -> io::Result<()> {
        self.each(|sink| sink.flush())
    }
}

impl std::fmt::Debug for MultiSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSink").field("sinks", &self.sinks.len()).finish()
    }
}
