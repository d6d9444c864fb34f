use std::io::{BufRead, Write};
use std::path::Path;

use log::debug;

use crate::error::{LineError, Result};
use crate::lines::{self, Line};
use crate::table::SizeTable;

/// Lines up the section sizes of two `<name> <size>` reports.
///
/// Every name from the second report is also entered into the first table
/// with size 0, so the first table decides which rows are written and in
/// which order. A genuine 0 in the first report looks the same as a name
/// that only the second report has.
pub struct SectionComparator {
    first: SizeTable,
    second: SizeTable,
}

impl Default for SectionComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionComparator {
    pub fn new() -> Self {
        SectionComparator {
            first: SizeTable::new(),
            second: SizeTable::new(),
        }
    }

    pub fn run(&mut self, first: &Path, second: &Path, output: &mut dyn Write) -> Result<()> {
        self.process_first(first)?;
        self.process_second(second)?.write(output)?;
        Ok(())
    }

    pub fn process_first(&mut self, path: &Path) -> Result<&Self> {
        let reader = lines::open(path)?;
        self.read_first(reader, path)
    }

    pub fn process_second(&mut self, path: &Path) -> Result<&Self> {
        let reader = lines::open(path)?;
        self.read_second(reader, path)
    }

    pub fn read_first<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<&Self> {
        let used = lines::fold(reader, path, |line| self.add_first(line))?;
        debug!("{}: {} sizes", path.display(), used);
        Ok(self)
    }

    pub fn read_second<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<&Self> {
        let used = lines::fold(reader, path, |line| self.add_second(line))?;
        debug!(
            "{}: {} sizes, {} names in total",
            path.display(),
            used,
            self.first.len()
        );
        Ok(self)
    }

    fn add_first(&mut self, line: &str) -> std::result::Result<Line, LineError> {
        let Some((name, value)) = name_and_value(line) else {
            return Ok(Line::Skipped);
        };
        self.first.set(name, lines::parse_size(value)?);
        Ok(Line::Used)
    }

    fn add_second(&mut self, line: &str) -> std::result::Result<Line, LineError> {
        let Some((name, value)) = name_and_value(line) else {
            return Ok(Line::Skipped);
        };
        self.first.reserve_key(name);
        self.second.set(name, lines::parse_size(value)?);
        Ok(Line::Used)
    }

    pub fn first(&self) -> &SizeTable {
        &self.first
    }

    pub fn second(&self) -> &SizeTable {
        &self.second
    }

    pub fn write(&self, output: &mut dyn Write) -> Result<()> {
        for (name, size) in self.first.iter() {
            let other = self.second.get(name).unwrap_or(0);
            writeln!(output, "{}   {}   {}", name, size, other)?;
        }
        Ok(())
    }
}

fn name_and_value(line: &str) -> Option<(&str, &str)> {
    let mut tokens = line.split_whitespace();
    Some((tokens.next()?, tokens.next()?))
}
