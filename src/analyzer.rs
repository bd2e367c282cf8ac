//! Condensing Pipeline
//!
//! Coordinates one run of the tool: open the input, parse it in a single forward pass,
//! drain the tables into a sorted report, then open the destination and write it.
//!
//! ## Phases
//!
//! 1. **Open**: the input must open and contain at least one line, otherwise the run
//!    fails before any parsing
//! 2. **Parse**: [`RecordParser`] fills the aggregation tables
//! 3. **Build**: [`ReportBuilder`] drains and sorts them
//! 4. **Write**: the destination is opened only now; if that fails the parsed work is
//!    discarded and the run fails
//!
//! The two halves never overlap: the tables belong to the parser until it returns them,
//! and to the report builder afterwards.

use crate::config::ProcessingConfig;
use crate::error::CondenserError;
use crate::line_source::LineSource;
use crate::models::{Report, ReportSummary};
use crate::parser::RecordParser;
use crate::report::{ReportBuilder, ReportFormat};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info, info_span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    File(PathBuf),
    Stdout,
}

impl std::fmt::Display for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputSink::File(path) => write!(f, "{}", path.display()),
            OutputSink::Stdout => write!(f, "standard output"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CondenseOptions {
    pub input: InputSource,
    pub output: OutputSink,
    pub format: ReportFormat,
}

pub struct Condenser {
    buffer_size: usize,
    progress_interval: u64,
    report_builder: ReportBuilder,
}

impl Default for Condenser {
    fn default() -> Self {
        Self::new(&ProcessingConfig::default())
    }
}

impl Condenser {
    pub fn new(processing: &ProcessingConfig) -> Self {
        Self {
            buffer_size: processing.buffer_size_bytes(),
            progress_interval: processing.progress_interval_bytes(),
            report_builder: ReportBuilder::new(),
        }
    }

    pub fn report_builder(&self) -> &ReportBuilder {
        &self.report_builder
    }

    /// Parse `input` and drain the result into a report
    pub fn condense<R: Read>(&self, input: R) -> Result<Report> {
        let source = LineSource::with_capacity(self.buffer_size, input)
            .with_progress_interval(self.progress_interval);
        let parser = RecordParser::new(source).map_err(CondenserError::Io)?;
        if parser.input_is_empty() {
            return Err(CondenserError::InputEmpty.into());
        }

        info!("Parsing runtime log");
        let mut aggregator = parser.run().map_err(CondenserError::Io)?;
        info!(
            total_runtimes = aggregator.total_runtimes,
            unique_runtimes = aggregator.runtimes.len(),
            total_infinite_loops = aggregator.total_infinite_loops,
            unique_infinite_loops = aggregator.infinite_loops.len(),
            total_hard_dels = aggregator.total_hard_dels,
            unique_hard_dels = aggregator.hard_deletions.len(),
            "Parsing complete"
        );

        let report = self.report_builder.build(&mut aggregator);
        debug!("Aggregation tables drained into report");
        Ok(report)
    }

    pub fn write_report<W: Write>(&self, report: &Report, format: ReportFormat, out: W) -> Result<()> {
        let mut out = BufWriter::new(out);
        self.report_builder.render(report, format, &mut out)?;
        out.flush().context("Failed to flush report")?;
        Ok(())
    }

    /// Run the whole pipeline described by `options`
    pub fn run(&self, options: &CondenseOptions) -> Result<ReportSummary> {
        let span = info_span!("condense", run_id = %crate::logging::new_run_id());
        let _enter = span.enter();

        let report = match &options.input {
            InputSource::File(path) => {
                let file = File::open(path).map_err(|source| CondenserError::InputUnavailable {
                    path: path.clone(),
                    source,
                })?;
                info!(input = %path.display(), "Opened input file");
                self.condense(file)?
            }
            InputSource::Stdin => self.condense(io::stdin().lock())?,
        };

        match &options.output {
            OutputSink::File(path) => {
                let file = File::create(path).map_err(|source| CondenserError::OutputUnavailable {
                    path: path.clone(),
                    source,
                })?;
                self.write_report(&report, options.format, file)?;
            }
            OutputSink::Stdout => self.write_report(&report, options.format, io::stdout().lock())?,
        }
        info!(output = %options.output, format = ?options.format, "Report written");

        Ok(report.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condense_rejects_empty_input() {
        let err = Condenser::default().condense("".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CondenserError>(),
            Some(CondenserError::InputEmpty)
        ));
    }

    #[test]
    fn test_condense_and_write() {
        let condenser = Condenser::default();
        let report = condenser
            .condense("runtime error: A\nruntime error: A\nruntime error: B\n".as_bytes())
            .unwrap();
        assert_eq!(report.summary.total_runtimes, 3);
        assert_eq!(report.runtimes[0].text, "runtime error: A");

        let mut out = Vec::new();
        condenser
            .write_report(&report, ReportFormat::Text, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("The following runtime has occurred 2 time(s).\nruntime error: A\n"));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device went away"))
        }
    }

    #[test]
    fn test_read_failure_is_io_error() {
        let err = Condenser::default().condense(FailingReader).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CondenserError>(),
            Some(CondenserError::Io(_))
        ));
        assert!(format!("{:#}", err).contains("device went away"));
    }

    #[test]
    fn test_open_error_reports_os_error_once() {
        let err = CondenserError::InputUnavailable {
            path: PathBuf::from("Input.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let chained = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(chained, "Unable to open input Input.txt: not found");
    }

    #[test]
    fn test_missing_input_file() {
        let options = CondenseOptions {
            input: InputSource::File(PathBuf::from("/nonexistent/definitely/Input.txt")),
            output: OutputSink::Stdout,
            format: ReportFormat::Text,
        };
        let err = Condenser::default().run(&options).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CondenserError>(),
            Some(CondenserError::InputUnavailable { .. })
        ));
    }
}
