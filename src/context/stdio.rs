//! Standard stream wiring held by a context.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StdStream {
    Stdin,
    Stdout,
    Stderr,
}

impl StdStream {
    pub const ALL: [StdStream; 3] = [StdStream::Stdin, StdStream::Stdout, StdStream::Stderr];

    pub fn as_str(self) -> &'static str {
        match self {
            StdStream::Stdin => "stdin",
            StdStream::Stdout => "stdout",
            StdStream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StdStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stream as seen from inside a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamHandle {
    pub stream: StdStream,
    /// Process the handle was bound in.
    pub owner_pid: u32,
    /// Routed through the embedder's streams rather than the raw descriptor.
    pub polyglot: bool,
    /// Flush after every write.
    pub synchronized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdioBinding {
    pub stdin: StreamHandle,
    pub stdout: StreamHandle,
    pub stderr: StreamHandle,
}

impl StdioBinding {
    /// Bind all three streams in process `owner_pid`.
    pub fn for_process(owner_pid: u32, polyglot: bool, synchronized: bool) -> Self {
        let handle = |stream| StreamHandle {
            stream,
            owner_pid,
            polyglot,
            synchronized,
        };
        Self {
            stdin: handle(StdStream::Stdin),
            stdout: handle(StdStream::Stdout),
            stderr: handle(StdStream::Stderr),
        }
    }

    pub fn get(&self, stream: StdStream) -> &StreamHandle {
        match stream {
            StdStream::Stdin => &self.stdin,
            StdStream::Stdout => &self.stdout,
            StdStream::Stderr => &self.stderr,
        }
    }

    pub fn set(&mut self, handle: StreamHandle) {
        match handle.stream {
            StdStream::Stdin => self.stdin = handle,
            StdStream::Stdout => self.stdout = handle,
            StdStream::Stderr => self.stderr = handle,
        }
    }
}

/// Writer for an output handle. Synchronized handles flush on every write.
pub struct StreamWriter<W: Write> {
    inner: W,
    synchronized: bool,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(inner: W, synchronized: bool) -> Self {
        Self {
            inner,
            synchronized,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for StreamWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if self.synchronized {
            self.inner.flush()?;
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
