//! Captured output assertions.
//!
//! Code under test writes to an [`OutputBuffer`] instead of stdout; the
//! buffer implements both [`std::fmt::Write`] and [`std::io::Write`].

use std::fmt;
use std::io;

use lion_test_core::{Result, TestError, assert_same};

/// In-memory text sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text`.
    pub fn print(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Captured text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Returns true if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the buffer and returns its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}

impl io::Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.text.push_str(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `callback` against a fresh buffer and asserts what it wrote.
///
/// Returns the captured text.
///
/// # Errors
/// [`TestError::Assertion`] if nothing was written or the text differs from
/// `expected`.
pub fn assert_with_output<F>(expected: &str, callback: F) -> Result<String>
where
    F: FnOnce(&mut OutputBuffer),
{
    let mut buffer = OutputBuffer::new();
    callback(&mut buffer);

    if buffer.is_empty() {
        return Err(TestError::assertion("no output was captured"));
    }

    assert_same(expected, buffer.as_str(), "captured output")?;
    Ok(buffer.into_string())
}
