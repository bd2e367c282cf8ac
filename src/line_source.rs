//! Streaming line source
//!
//! Reads the log through a fixed-size buffer, never holding more than the current
//! physical line in memory. Lines are split on `\n`; carriage returns on either side of
//! the split are dropped, and a recognized timestamp prefix is removed before the line is
//! handed out. A trailing fragment without a newline is still returned as a line.

use crate::timestamp::TimestampPrefix;
use std::io::{self, BufRead, BufReader, Read};
use tracing::info;

/// Default read buffer, 32 KiB
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

pub struct LineSource<R> {
    reader: BufReader<R>,
    scratch: Vec<u8>,
    bytes_read: u64,
    lines_read: u64,
    progress_interval: u64,
    next_progress: u64,
    exhausted: bool,
}

impl<R: Read> LineSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity.max(1), inner),
            scratch: Vec::new(),
            bytes_read: 0,
            lines_read: 0,
            progress_interval: 0,
            next_progress: 0,
            exhausted: false,
        }
    }

    /// Emit an `info` progress event every `bytes` consumed. Zero disables it.
    pub fn with_progress_interval(mut self, bytes: u64) -> Self {
        self.progress_interval = bytes;
        self.next_progress = bytes;
        self
    }

    /// Next physical line, or `None` once the stream is exhausted
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.exhausted {
            return Ok(None);
        }

        self.scratch.clear();
        let read = self.reader.read_until(b'\n', &mut self.scratch)?;
        if read == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        self.bytes_read += read as u64;

        let mut end = self.scratch.len();
        if self.scratch[end - 1] == b'\n' {
            end -= 1;
            self.skip_leading_carriage_returns()?;
        }
        while end > 0 && self.scratch[end - 1] == b'\r' {
            end -= 1;
        }

        let line = String::from_utf8_lossy(TimestampPrefix::strip(&self.scratch[..end])).into_owned();
        self.lines_read += 1;
        self.report_progress();

        Ok(Some(line))
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn skip_leading_carriage_returns(&mut self) -> io::Result<()> {
        loop {
            let buf = self.reader.fill_buf()?;
            let skip = buf.iter().take_while(|&&b| b == b'\r').count();
            if skip == 0 {
                return Ok(());
            }
            let whole_buffer = skip == buf.len();
            self.reader.consume(skip);
            self.bytes_read += skip as u64;
            if !whole_buffer {
                return Ok(());
            }
        }
    }

    fn report_progress(&mut self) {
        if self.progress_interval == 0 || self.bytes_read < self.next_progress {
            return;
        }
        info!(
            bytes_read = self.bytes_read,
            mb_read = self.bytes_read / (1024 * 1024),
            lines_read = self.lines_read,
            "Parsing progress"
        );
        while self.next_progress <= self.bytes_read {
            self.next_progress += self.progress_interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str, capacity: usize) -> Vec<String> {
        let mut source = LineSource::with_capacity(capacity, input.as_bytes());
        let mut lines = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_splits_on_newline() {
        assert_eq!(collect("a\nb\nc\n", DEFAULT_BUFFER_SIZE), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_final_fragment_without_newline() {
        let mut source = LineSource::new("first\nlast".as_bytes());
        assert_eq!(source.next_line().unwrap().as_deref(), Some("first"));
        assert_eq!(source.next_line().unwrap().as_deref(), Some("last"));
        assert!(!source.is_exhausted());
        assert_eq!(source.next_line().unwrap(), None);
        assert!(source.is_exhausted());
    }

    #[test]
    fn test_carriage_returns_trimmed() {
        assert_eq!(
            collect("one\r\ntwo\n\r\rthree\r\n", DEFAULT_BUFFER_SIZE),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_blank_lines_preserved() {
        assert_eq!(collect("a\n\nb\n", DEFAULT_BUFFER_SIZE), vec!["a", "", "b"]);
    }

    #[test]
    fn test_tiny_buffer_crosses_chunk_boundaries() {
        let input = "[12:34:56]runtime error: long message here\r\n\r\r\rproc name: thing\n";
        assert_eq!(
            collect(input, 3),
            vec!["runtime error: long message here", "proc name: thing"]
        );
    }

    #[test]
    fn test_timestamps_stripped() {
        let input = "[12:34:56]short\n[2024-01-15 10:30:00.123] long\nplain\n";
        assert_eq!(
            collect(input, DEFAULT_BUFFER_SIZE),
            vec!["short", "long", "plain"]
        );
    }

    #[test]
    fn test_counts_bytes_and_lines() {
        let mut source = LineSource::new("ab\r\ncd\n".as_bytes());
        while source.next_line().unwrap().is_some() {}
        assert_eq!(source.bytes_read(), 7);
        assert_eq!(source.lines_read(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(collect("", DEFAULT_BUFFER_SIZE).is_empty());
    }
}
