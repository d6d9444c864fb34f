use std::borrow::Cow;
use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, warn};

use crate::error::{LineError, Result};
use crate::lines::{self, Line};
use crate::table::SizeTable;

/// Shape of the lines a merge report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// `xxx: zz`, keyed by the first token as written (colon included).
    Simple,
    /// `Section (xx, yy): zz`, keyed by tokens 1 and 2 joined without a separator.
    Composite,
}

const SECTION: &str = "Section";

impl LineFormat {
    fn min_tokens(self) -> usize {
        match self {
            LineFormat::Simple => 2,
            LineFormat::Composite => 4,
        }
    }

    /// Key and value token of a line, `None` if the line does not count.
    fn split<'a>(self, tokens: &[&'a str]) -> Option<(Cow<'a, str>, &'a str)> {
        if tokens.len() < self.min_tokens() {
            return None;
        }
        match self {
            LineFormat::Simple => Some((Cow::Borrowed(tokens[0]), tokens[1])),
            LineFormat::Composite if tokens[0] == SECTION => {
                Some((Cow::Owned(format!("{}{}", tokens[1], tokens[2])), tokens[3]))
            }
            LineFormat::Composite => None,
        }
    }
}

/// Sums the sizes of one report per key.
pub struct SizeAggregator {
    format: LineFormat,
    table: SizeTable,
}

impl SizeAggregator {
    pub fn new(format: LineFormat) -> Self {
        SizeAggregator {
            format,
            table: SizeTable::new(),
        }
    }

    pub fn run(&mut self, path: &Path, output: &mut dyn Write) -> Result<()> {
        self.process(path)?.write(output)?;
        Ok(())
    }

    pub fn process(&mut self, path: &Path) -> Result<&Self> {
        let reader = lines::open(path)?;
        self.read(reader, path)
    }

    pub fn read<R: BufRead>(&mut self, reader: R, path: &Path) -> Result<&Self> {
        let used = lines::fold(reader, path, |line| self.add(line))?;
        if self.table.is_empty() {
            warn!("{}: no {:?} lines found", path.display(), self.format);
        }
        debug!(
            "{}: {} lines merged into {} keys",
            path.display(),
            used,
            self.table.len()
        );
        Ok(self)
    }

    fn add(&mut self, line: &str) -> std::result::Result<Line, LineError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((key, value)) = self.format.split(&tokens) else {
            return Ok(Line::Skipped);
        };
        let size = lines::parse_size(value)?;
        self.table
            .add(&key, size)
            .ok_or_else(|| LineError::Overflow(key.into_owned()))?;
        Ok(Line::Used)
    }

    pub fn table(&self) -> &SizeTable {
        &self.table
    }

    pub fn write(&self, output: &mut dyn Write) -> Result<()> {
        for (key, size) in self.table.iter() {
            writeln!(output, "{}   {}", key, size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::fs;

    fn merge(format: LineFormat, input: &str) -> String {
        let mut output = Vec::new();
        SizeAggregator::new(format)
            .read(input.as_bytes(), Path::new("mem"))
            .unwrap()
            .write(&mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_process_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let samples = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/samples");
        for (dir, format) in [
            ("linkmap", LineFormat::Simple),
            ("obj", LineFormat::Composite),
        ] {
            let files = fs::read_dir(samples.join(dir)).unwrap();
            for file in files {
                let file_path = file.unwrap().path();
                if file_path.extension().map_or(true, |ext| ext != "txt") {
                    continue;
                }
                let expected_output = fs::read_to_string(file_path.with_extension("out")).unwrap();

                let mut output = Vec::new();
                SizeAggregator::new(format)
                    .run(&file_path, &mut output)
                    .unwrap();

                let output_str = String::from_utf8(output).unwrap();
                assert_eq!(
                    output_str,
                    expected_output,
                    "Failed for file: {}",
                    file_path.display()
                );
            }
        }
    }

    #[test]
    fn test_simple_merge() {
        let mut aggregator = SizeAggregator::new(LineFormat::Simple);
        aggregator
            .read("a: 3\nb: 4\na: 2\n".as_bytes(), Path::new("mem"))
            .unwrap();

        let mut expected = SizeTable::new();
        expected.set("a:", 5);
        expected.set("b:", 4);
        assert_eq!(aggregator.table(), &expected);
    }

    #[test]
    fn test_simple_merge_output() {
        let output = merge(LineFormat::Simple, "a: 3\nb: 4\na: 2\n");
        assert_eq!(output, "a:   5\nb:   4\n");
    }

    #[test]
    fn test_simple_merge_skips_short_lines() {
        let input = "\nheader\n__text: 10 extra tokens\n   \n__text: 6\n";
        assert_eq!(merge(LineFormat::Simple, input), "__text:   16\n");
    }

    #[test]
    fn test_composite_merge() {
        let input = "\
Section (__TEXT, __text): 100
Section (__TEXT, __text): 28
Section (__DATA, __data): 12
";
        assert_eq!(
            merge(LineFormat::Composite, input),
            "(__TEXT,__text):   128\n(__DATA,__data):   12\n"
        );
    }

    #[test]
    fn test_composite_merge_requires_section() {
        let input = "\
Foo Bar Baz 10
Section Bar Baz 10
Section Bar Baz 5
section Bar Baz 1000
Sections Bar Baz 1000
";
        let mut aggregator = SizeAggregator::new(LineFormat::Composite);
        aggregator.read(input.as_bytes(), Path::new("mem")).unwrap();
        assert_eq!(aggregator.table().len(), 1);
        assert_eq!(aggregator.table().get("BarBaz"), Some(15));
    }

    #[test]
    fn test_composite_merge_skips_short_section_lines() {
        // too short to carry a value, never parsed
        let input = "Section (__TEXT, __text):\nSection\n";
        assert_eq!(merge(LineFormat::Composite, input), "");
    }

    #[test]
    fn test_composite_merge_without_sections() {
        let mut aggregator = SizeAggregator::new(LineFormat::Composite);
        aggregator
            .read("__text: 10
Segment __TEXT: 8192
".as_bytes(), Path::new("mem"))
            .unwrap();
        assert!(aggregator.table().is_empty());
    }

    #[test]
    fn test_simple_merge_old_mac_line_endings() {
        assert_eq!(merge(LineFormat::Simple, "a: 1\rb: 2\n"), "a:   1\nb:   2\n");
        assert_eq!(
            merge(LineFormat::Simple, "a: 1\r\na: 2\rb: 3"),
            "a:   3\nb:   3\n"
        );
    }

    #[test]
    fn test_grouped_digits() {
        assert_eq!(merge(LineFormat::Simple, "a: 1_000\na: 24\n"), "a:   1024\n");
    }

    #[test]
    fn test_composite_key_has_no_separator() {
        let input = "Section ab c 1\nSection a bc 2\n";
        assert_eq!(merge(LineFormat::Composite, input), "abc   3\n");
    }

    #[test]
    fn test_invalid_value_is_fatal() {
        let mut aggregator = SizeAggregator::new(LineFormat::Simple);
        let err = aggregator
            .read("a: 3\nb: four\n".as_bytes(), Path::new("sizes.txt"))
            .err()
            .unwrap();
        match err {
            ReportError::InvalidValue { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "four");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_composite_spaced_colon_is_fatal() {
        let mut aggregator = SizeAggregator::new(LineFormat::Composite);
        let err = aggregator
            .read("Section a b : 10\n".as_bytes(), Path::new("mem"))
            .err()
            .unwrap();
        assert!(matches!(err, ReportError::InvalidValue { ref token, .. } if token == ":"));
    }

    #[test]
    fn test_overflow_is_fatal() {
        let input = format!("big: {}\nbig: 1\n", i64::MAX);
        let mut aggregator = SizeAggregator::new(LineFormat::Simple);
        let err = aggregator
            .read(input.as_bytes(), Path::new("mem"))
            .err()
            .unwrap();
        assert!(matches!(err, ReportError::Overflow { line: 2, ref key, .. } if key == "big:"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(merge(LineFormat::Simple, ""), "");
        assert_eq!(merge(LineFormat::Composite, ""), "");
    }

    #[test]
    fn test_idempotent() {
        let input = "z: 1\ny: 2\nz: 3\n";
        assert_eq!(
            merge(LineFormat::Simple, input),
            merge(LineFormat::Simple, input)
        );
    }
}
