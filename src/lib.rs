//! Runtime Condenser Library
//!
//! Condenses the runtime log of a game server into a short summary. Runtime errors,
//! infinite loops and hard deletion failures are deduplicated by their signature,
//! counted, and written out sorted by how often they occurred.
//!
//! ## Core Features
//!
//! - **Streaming**: the log is read through a fixed-size buffer in a single forward
//!   pass, so multi-gigabyte inputs are fine; memory grows only with the number of
//!   distinct records
//! - **Multi-line records**: a three-line lookahead window lets the parser pick up the
//!   proc, source file, usr, src and src.loc lines that follow an error
//! - **Deduplication**: identical records collapse into one entry whose details come
//!   from the first occurrence
//! - **Text or JSON output**
//!
//! ## Architecture Overview
//!
//! - [`line_source`] - buffered line reader with timestamp stripping
//! - [`timestamp`] - recognition of the two timestamp prefixes
//! - [`window`] - the previous/current/next lookahead window
//! - [`parser`] - the record classifier and extractor
//! - [`aggregator`] - deduplicating tables and raw totals
//! - [`report`] - sorting and rendering
//! - [`analyzer`] - the open, parse, report, write pipeline
//! - [`config`] - configuration with file support
//! - [`logging`] - structured logging setup
//! - [`error`] - error taxonomy
//!
//! ## Main Entry Point
//!
//! ```rust
//! use runtime_condenser::Condenser;
//!
//! # fn example() -> anyhow::Result<()> {
//! let log = "runtime error: Cannot read null.x\nproc name: act (/obj/act)\n";
//! let report = Condenser::default().condense(log.as_bytes())?;
//! assert_eq!(report.summary.total_runtimes, 1);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod error;
pub mod line_source;
pub mod logging;
pub mod models;
pub mod parser;
pub mod report;
pub mod timestamp;
pub mod window;

pub use analyzer::{CondenseOptions, Condenser, InputSource, OutputSink};
pub use error::CondenserError;
pub use models::*;
pub use report::ReportFormat;
