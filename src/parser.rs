//! Record classifier and extractor
//!
//! A single forward pass over the log. Each line that reaches `current` in the
//! [`LookaheadWindow`] is classified as a runtime-shaped record, a hard deletion record
//! or an ordinary line. Recognized records may consume further lines from the window
//! while their detail fields are captured.

use crate::aggregator::{Aggregator, Slot};
use crate::line_source::LineSource;
use crate::models::{RecordKind, RuntimeRecord};
use crate::window::LookaheadWindow;
use std::io::{self, Read};
use tracing::{debug, trace};

pub const RUNTIME_PREFIX: &str = "runtime error:";
/// Used when a runtime message has to be rebuilt from the following line
pub const RUNTIME_MARKER: &str = "runtime error: ";
pub const HARD_DELETION_PREFIX: &str = "Path : ";
pub const PROC_PREFIX: &str = "proc name:";
pub const SOURCE_FILE_PREFIX: &str = "  source file:";
pub const USR_PREFIX: &str = "  usr:";
pub const SRC_LOC_PREFIX: &str = "  src.loc:";

const INFINITE_LOOP_MARKERS: [&str; 2] = [
    "Infinite loop suspected",
    "Maximum recursion level reached",
];

/// A runtime line this short carries no message of its own
const EMPTY_RUNTIME_MAX_LEN: usize = 17;
/// The failure count follows a fixed-width label on the line after `Path : `
const FAILURE_COUNT_OFFSET: usize = 11;

/// What a single step of the parser did with the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Runtime(RecordKind),
    HardDeletion,
    /// A record prefix matched but the record could not be read
    Malformed,
    Ordinary,
}

pub struct RecordParser<R> {
    window: LookaheadWindow<R>,
    aggregator: Aggregator,
}

impl<R: Read> RecordParser<R> {
    pub fn new(source: LineSource<R>) -> io::Result<Self> {
        Ok(Self {
            window: LookaheadWindow::new(source)?,
            aggregator: Aggregator::new(),
        })
    }

    /// True when the source produced no lines at all
    pub fn input_is_empty(&self) -> bool {
        self.window.at_end() && self.window.source().lines_read() == 0
    }

    /// Consume the whole stream and hand back the filled tables
    pub fn run(mut self) -> io::Result<Aggregator> {
        while self.window.advance()? {
            self.step()?;
        }

        debug!(
            lines_read = self.window.source().lines_read(),
            bytes_read = self.window.source().bytes_read(),
            "Reached end of input"
        );
        Ok(self.aggregator)
    }

    /// Classify the line in `current`, extracting and aggregating it if it opens a record
    pub fn step(&mut self) -> io::Result<Classification> {
        if self.window.current().starts_with(RUNTIME_PREFIX) {
            let kind = self.extract_runtime()?;
            return Ok(Classification::Runtime(kind));
        }

        if self.window.current().starts_with(HARD_DELETION_PREFIX) {
            return Ok(self.extract_hard_deletion());
        }

        Ok(Classification::Ordinary)
    }

    fn extract_runtime(&mut self) -> io::Result<RecordKind> {
        if self.window.current().len() <= EMPTY_RUNTIME_MAX_LEN {
            // The message was pushed onto the following line
            if self.window.next().len() < 2 {
                self.window.recall_previous_into_next();
            }
            self.window.advance()?;
            let rebuilt = format!("{}{}", RUNTIME_MARKER, self.window.current());
            trace!(line = %rebuilt, "Rebuilt runtime with empty message");
            self.window.set_current(rebuilt);
        }

        let kind = if is_infinite_loop(self.window.current()) {
            // Skip the world.loop_checks line that follows
            self.window.advance()?;
            self.window.restore_previous();
            RecordKind::InfiniteLoop
        } else {
            RecordKind::Runtime
        };

        let found_proc = self.window.next().starts_with(PROC_PREFIX);
        let mut key = self.window.current().to_string();
        if found_proc {
            key.push_str(self.window.next());
        }

        let table = self.aggregator.record_occurrence(kind);
        match table.fetch_or_insert(key) {
            Slot::Fresh(record) => {
                *record = RuntimeRecord::new(self.window.current());

                if found_proc {
                    record.proc_name = self.window.next().to_string();
                    self.window.advance()?;
                }

                if self.window.next().starts_with(SOURCE_FILE_PREFIX) {
                    record.source_file = self.window.next().to_string();
                    self.window.advance()?;
                }

                if self.window.next().starts_with(USR_PREFIX) {
                    self.window.advance()?;
                    self.window.advance()?;
                    if self.window.at_end() {
                        trace!("Input ended inside runtime context block");
                    }
                    record.usr = self.window.previous().to_string();
                    record.src = self.window.current().to_string();

                    if self.window.next().starts_with(SRC_LOC_PREFIX) {
                        record.src_loc = self.window.next().to_string();
                        self.window.advance()?;
                    }
                }

                trace!(kind = ?kind, text = %record.text, "New unique record");
            }
            Slot::Existing(record) => {
                record.occurrence_count += 1;
                if found_proc {
                    self.window.advance()?;
                }
            }
        }

        Ok(kind)
    }

    fn extract_hard_deletion(&mut self) -> Classification {
        let current = self.window.current();
        let rest = &current[HARD_DELETION_PREFIX.len()..];
        let type_name = rest.strip_suffix(' ').unwrap_or(rest);

        match parse_failure_count(self.window.next()) {
            Some(failures) => {
                self.aggregator.add_hard_deletion(type_name, failures);
                Classification::HardDeletion
            }
            None => {
                debug!(
                    type_name = %type_name,
                    line = %self.window.next(),
                    "Skipping hard deletion with unreadable failure count"
                );
                Classification::Malformed
            }
        }
    }
}

/// Parse a whole stream in one pass
pub fn parse<R: Read>(source: LineSource<R>) -> io::Result<Aggregator> {
    RecordParser::new(source)?.run()
}

fn is_infinite_loop(line: &str) -> bool {
    let Some(body) = line.strip_prefix(RUNTIME_MARKER) else {
        return false;
    };
    INFINITE_LOOP_MARKERS
        .iter()
        .any(|marker| body.starts_with(marker))
}

/// Leading integer at the fixed offset of `line`; `None` unless it is positive.
/// Counts too large for a `u64` saturate.
fn parse_failure_count(line: &str) -> Option<u64> {
    let field = line.get(FAILURE_COUNT_OFFSET..)?.trim_start();
    let (negative, digits) = match field.as_bytes().first() {
        Some(b'-') => (true, &field[1..]),
        Some(b'+') => (false, &field[1..]),
        _ => (false, field),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);

    if negative || value == 0 {
        None
    } else {
        Some(value)
    }
}
