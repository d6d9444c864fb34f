//! Aggregation and comparison of section size reports.
//!
//! Reports are whitespace separated text, one record per line. Lines with
//! too few tokens are skipped; a value that is not an integer aborts the
//! run before anything is written.

mod aggregator;
mod compare;
mod error;
mod lines;
mod table;

pub mod cli;

use std::io::Write;
use std::path::Path;

pub use aggregator::{LineFormat, SizeAggregator};
pub use compare::SectionComparator;
pub use error::{ReportError, Result};
pub use table::{Size, SizeTable};

/// Writes `<name>   <size in first>   <size in second>` for every name of
/// either report.
pub fn compare_files(first: &Path, second: &Path, output: &mut dyn Write) -> Result<()> {
    SectionComparator::new().run(first, second, output)
}

/// Writes `<key>   <summed size>` for every key of the report.
pub fn merge_file(format: LineFormat, path: &Path, output: &mut dyn Write) -> Result<()> {
    SizeAggregator::new(format).run(path, output)
}
