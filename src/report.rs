//! Report Building and Rendering
//!
//! Drains the aggregation tables into a [`Report`] and renders it either as the
//! human-readable condensed log or as JSON.
//!
//! ## Ordering
//!
//! Every section is sorted by descending occurrence count. Equal counts are ordered by
//! record text so two runs over the same input produce byte-identical reports.
//!
//! ## Text Layout
//!
//! - A note about first-occurrence details, then the summary counters. A counter line
//!   is left out when its value is zero.
//! - `** Infinite loops **`, only when any were seen
//! - `** Runtimes **`, always present even when empty
//! - `** Hard deletions **`, only when any failures were counted
//!
//! Each runtime-shaped entry prints its count followed by its non-empty detail lines in
//! the fixed order text, proc, source file, usr, src, src.loc.

use crate::aggregator::Aggregator;
use crate::models::{HardDeletionRecord, Report, ReportSummary, RuntimeRecord};
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;

const FIRST_OCCURRENCE_NOTE: &str = "Note: The source file, src and usr are all from the FIRST of the identical runtimes. Everything else is cropped.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

pub struct ReportBuilder;

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Drain all three tables of `aggregator` into a sorted report
    pub fn build(&self, aggregator: &mut Aggregator) -> Report {
        let summary = ReportSummary {
            unique_infinite_loops: aggregator.infinite_loops.len(),
            total_infinite_loops: aggregator.total_infinite_loops,
            unique_runtimes: aggregator.runtimes.len(),
            total_runtimes: aggregator.total_runtimes,
            unique_hard_deletions: aggregator.hard_deletions.len(),
            total_hard_deletions: aggregator.total_hard_dels,
        };

        Report {
            summary,
            infinite_loops: sort_runtimes(aggregator.infinite_loops.drain()),
            runtimes: sort_runtimes(aggregator.runtimes.drain()),
            hard_deletions: sort_hard_deletions(aggregator.hard_deletions.drain()),
        }
    }

    pub fn render<W: Write>(&self, report: &Report, format: ReportFormat, out: &mut W) -> Result<()> {
        match format {
            ReportFormat::Text => self.render_text(report, out),
            ReportFormat::Json => self.render_json(report, out),
        }
    }

    pub fn render_json<W: Write>(&self, report: &Report, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, report)
            .context("Failed to serialize report to JSON")?;
        writeln!(out)?;
        Ok(())
    }

    pub fn render_text<W: Write>(&self, report: &Report, out: &mut W) -> Result<()> {
        let summary = &report.summary;

        writeln!(out, "{}", FIRST_OCCURRENCE_NOTE)?;
        writeln!(out)?;

        if summary.unique_infinite_loops > 0 {
            writeln!(out, "Total unique infinite loops: {}", summary.unique_infinite_loops)?;
        }
        if summary.total_infinite_loops > 0 {
            writeln!(out, "Total infinite loops: {}", summary.total_infinite_loops)?;
            writeln!(out)?;
        }

        if summary.unique_runtimes > 0 {
            writeln!(out, "Total unique runtimes: {}", summary.unique_runtimes)?;
        }
        if summary.total_runtimes > 0 {
            writeln!(out, "Total runtimes: {}", summary.total_runtimes)?;
            writeln!(out)?;
        }

        if summary.unique_hard_deletions > 0 {
            writeln!(out, "Total unique hard deletions: {}", summary.unique_hard_deletions)?;
        }
        if summary.total_hard_deletions > 0 {
            writeln!(out, "Total hard deletes: {}", summary.total_hard_deletions)?;
            writeln!(out)?;
        }

        if !report.infinite_loops.is_empty() {
            writeln!(out, "** Infinite loops **")?;
            write_runtime_section(out, &report.infinite_loops, "infinite loop")?;
        }

        writeln!(out, "** Runtimes **")?;
        write_runtime_section(out, &report.runtimes, "runtime")?;

        if summary.total_hard_deletions > 0 {
            writeln!(out, "** Hard deletions **")?;
            writeln!(out)?;
            for record in &report.hard_deletions {
                writeln!(out, "{} - {} time(s).", record.type_name, record.failure_count)?;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Short colored summary for the operator, written to stderr
    pub fn print_console_summary(&self, summary: &ReportSummary, destination: &str) {
        eprintln!(
            "{} {} unique runtimes ({} total)",
            "📊".bright_yellow(),
            summary.unique_runtimes.to_string().bright_white().bold(),
            summary.total_runtimes.to_string().bright_white()
        );
        if summary.total_infinite_loops > 0 {
            eprintln!(
                "{} {} unique infinite loops ({} total)",
                "🔁".bright_yellow(),
                summary.unique_infinite_loops.to_string().bright_white().bold(),
                summary.total_infinite_loops.to_string().bright_white()
            );
        }
        if summary.total_hard_deletions > 0 {
            eprintln!(
                "{} {} types failed hard deletion ({} failures)",
                "🗑".bright_yellow(),
                summary.unique_hard_deletions.to_string().bright_white().bold(),
                summary.total_hard_deletions.to_string().bright_white()
            );
        }
        eprintln!("{} Report written to {}", "✅".bright_green(), destination.bright_cyan());
    }
}

fn write_runtime_section<W: Write>(out: &mut W, records: &[RuntimeRecord], noun: &str) -> Result<()> {
    writeln!(out)?;
    for record in records {
        writeln!(
            out,
            "The following {} has occurred {} time(s).",
            noun, record.occurrence_count
        )?;
        for line in record.detail_lines() {
            writeln!(out, "{}", line)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn sort_runtimes(mut records: Vec<RuntimeRecord>) -> Vec<RuntimeRecord> {
    records.sort_by(|a, b| {
        b.occurrence_count
            .cmp(&a.occurrence_count)
            .then_with(|| a.text.cmp(&b.text))
            .then_with(|| a.proc_name.cmp(&b.proc_name))
    });
    records
}

fn sort_hard_deletions(mut records: Vec<HardDeletionRecord>) -> Vec<HardDeletionRecord> {
    records.sort_by(|a, b| {
        b.failure_count
            .cmp(&a.failure_count)
            .then_with(|| a.type_name.cmp(&b.type_name))
    });
    records
}
