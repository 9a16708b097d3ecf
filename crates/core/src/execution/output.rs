//! Output multiplexing
//!
//! Each task's stdout and stderr are captured, split into lines, and written to
//! an [`OutputSink`] tagged with the task's fqdn.

use std::io::Write;
use std::sync::Mutex;

use colored::Colorize;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::task::Task;

/// Which of the child's streams a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Destination for prefixed task output
pub trait OutputSink: Send + Sync {
    fn write_line(&self, task: &Task, stream: Stream, line: &str);
}

/// Writes `[<fqdn>]: <line>` to the process's own stdout/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_line(&self, task: &Task, stream: Stream, line: &str) {
        let prefix = task.fqdn().color(colored::Color::from(task.color()));
        // One locked write per line keeps lines from different tasks whole
        let result = match stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "[{}]: {}", prefix, line),
            Stream::Stderr => writeln!(std::io::stderr().lock(), "[{}]: {}", prefix, line),
        };
        if let Err(e) = result {
            tracing::debug!(task = %task.fqdn(), "Failed to write task output: {}", e);
        }
    }
}

/// Records uncolored `[<fqdn>]: <line>` lines per stream
#[derive(Debug, Default)]
pub struct CapturedOutput {
    stdout: Mutex<Vec<String>>,
    stderr: Mutex<Vec<String>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(&self) -> Vec<String> {
        self.stdout.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn stderr(&self) -> Vec<String> {
        self.stderr.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

impl OutputSink for CapturedOutput {
    fn write_line(&self, task: &Task, stream: Stream, line: &str) {
        let lines = match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        };
        if let Ok(mut lines) = lines.lock() {
            lines.push(format!("[{}]: {}", task.fqdn(), line));
        }
    }
}

/// Accumulates raw bytes and yields complete lines.
///
/// Splitting happens on bytes before decoding, so a multi-byte character cut
/// across two reads is decoded whole.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every line it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            lines.push(decode_line(&self.pending[start..end]));
            start = end + 1;
        }
        self.pending.drain(..start);
        lines
    }

    /// Flush an unterminated final line at end of stream
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = decode_line(&self.pending);
        self.pending.clear();
        Some(line)
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Drain `reader` to the end, forwarding each line to `sink`
pub async fn pump<R>(mut reader: R, task: &Task, stream: Stream, sink: &dyn OutputSink)
where
    R: AsyncRead + Unpin,
{
    let mut buffer = LineBuffer::new();
    let mut chunk = [0u8; 8192];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                for line in buffer.push(&chunk[..n]) {
                    sink.write_line(task, stream, &line);
                }
            }
            Err(e) => {
                tracing::warn!(task = %task.fqdn(), ?stream, "Failed to read task output: {}", e);
                break;
            }
        }
    }
    if let Some(line) = buffer.finish() {
        sink.write_line(task, stream, &line);
    }
}
