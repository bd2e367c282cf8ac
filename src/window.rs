//! Three-line lookahead window over a [`LineSource`]

use crate::line_source::LineSource;
use std::io::{self, Read};

/// `previous`, `current` and `next` lines of the log.
///
/// `next` is always prefetched so record extraction can peek one line ahead. Past the
/// end of the stream every slot that would hold a line holds an empty string instead.
pub struct LookaheadWindow<R> {
    source: LineSource<R>,
    previous: String,
    current: String,
    next: String,
    next_is_line: bool,
}

impl<R: Read> LookaheadWindow<R> {
    /// Prime the window with the first line of `source` in `next`
    pub fn new(mut source: LineSource<R>) -> io::Result<Self> {
        let first = source.next_line()?;
        Ok(Self {
            source,
            previous: String::new(),
            current: String::new(),
            next_is_line: first.is_some(),
            next: first.unwrap_or_default(),
        })
    }

    /// Shift `current` into `previous` and `next` into `current`, then pull a fresh
    /// line into `next`. Returns whether the new `current` is a real line of the input.
    pub fn advance(&mut self) -> io::Result<bool> {
        let was_line = self.next_is_line;
        self.previous = std::mem::take(&mut self.current);
        self.current = std::mem::take(&mut self.next);

        match self.source.next_line()? {
            Some(line) => {
                self.next = line;
                self.next_is_line = true;
            }
            None => self.next_is_line = false,
        }

        Ok(was_line)
    }

    /// True when the stream has no more lines to shift in
    pub fn at_end(&self) -> bool {
        !self.next_is_line
    }

    pub fn previous(&self) -> &str {
        &self.previous
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn next(&self) -> &str {
        &self.next
    }

    pub fn set_current(&mut self, line: String) {
        self.current = line;
    }

    /// Replace `next` with a copy of `previous`
    pub fn recall_previous_into_next(&mut self) {
        self.next = self.previous.clone();
    }

    /// Replace `current` with a copy of `previous`
    pub fn restore_previous(&mut self) {
        self.current = self.previous.clone();
    }

    pub fn source(&self) -> &LineSource<R> {
        &self.source
    }
}
