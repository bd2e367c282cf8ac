//! Core Data Models
//!
//! Records accumulated while parsing a runtime log, and the drained, sorted report
//! built from them.
//!
//! ## Data Flow
//!
//! 1. **Parsing**: [`RuntimeRecord`] and [`HardDeletionRecord`] live in the aggregation
//!    tables, one per distinct key
//! 2. **Draining**: the tables are converted into a [`Report`], each section sorted by
//!    descending occurrence count
//! 3. **Output**: the report is rendered as text or serialized as JSON
//!
//! Detail fields on [`RuntimeRecord`] are captured from the first occurrence of a key
//! only. Empty fields are omitted from rendered output.

use serde::Serialize;

/// Which table a runtime-shaped record is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Runtime,
    InfiniteLoop,
}

/// A runtime error or infinite loop, deduplicated by its text and proc line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeRecord {
    pub text: String,
    #[serde(rename = "procName", skip_serializing_if = "String::is_empty")]
    pub proc_name: String,
    #[serde(rename = "sourceFile", skip_serializing_if = "String::is_empty")]
    pub source_file: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub usr: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub src: String,
    #[serde(rename = "srcLoc", skip_serializing_if = "String::is_empty")]
    pub src_loc: String,
    #[serde(rename = "occurrenceCount")]
    pub occurrence_count: u64,
}

impl RuntimeRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            occurrence_count: 1,
            ..Self::default()
        }
    }

    /// Non-empty detail lines in report order: text, proc, source file, usr, src, src.loc
    pub fn detail_lines(&self) -> impl Iterator<Item = &str> {
        [
            self.text.as_str(),
            self.proc_name.as_str(),
            self.source_file.as_str(),
            self.usr.as_str(),
            self.src.as_str(),
            self.src_loc.as_str(),
        ]
        .into_iter()
        .filter(|line| !line.is_empty())
    }
}

/// Hard deletion failures summed per type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HardDeletionRecord {
    #[serde(rename = "typeName")]
    pub type_name: String,
    #[serde(rename = "failureCount")]
    pub failure_count: u64,
}

/// Unique and raw totals per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    #[serde(rename = "uniqueInfiniteLoops")]
    pub unique_infinite_loops: usize,
    #[serde(rename = "totalInfiniteLoops")]
    pub total_infinite_loops: u64,
    #[serde(rename = "uniqueRuntimes")]
    pub unique_runtimes: usize,
    #[serde(rename = "totalRuntimes")]
    pub total_runtimes: u64,
    #[serde(rename = "uniqueHardDeletions")]
    pub unique_hard_deletions: usize,
    #[serde(rename = "totalHardDeletions")]
    pub total_hard_deletions: u64,
}

/// Drained aggregation tables, each section sorted by descending count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    #[serde(rename = "infiniteLoops")]
    pub infinite_loops: Vec<RuntimeRecord>,
    pub runtimes: Vec<RuntimeRecord>,
    #[serde(rename = "hardDeletions")]
    pub hard_deletions: Vec<HardDeletionRecord>,
}
