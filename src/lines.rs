use std::fs::File;
use std::io::{self, BufRead, Read};
use std::path::Path;

use log::{debug, trace};

use crate::error::{LineError, ReportError, Result};
use crate::table::Size;

/// Whether a line contributed to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line {
    Used,
    Skipped,
}

pub(crate) fn open(path: &Path) -> Result<io::BufReader<File>> {
    debug!("reading {}", path.display());
    let file = File::open(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(io::BufReader::new(file))
}

/// Feeds every line of `reader` to `add` and returns how many were used.
/// `path` only labels errors.
pub(crate) fn fold<R, F>(mut reader: R, path: &Path, mut add: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(&str) -> std::result::Result<Line, LineError>,
{
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut used = 0;
    for (index, line) in split_lines(&text).iter().enumerate() {
        match add(line.as_str()).map_err(|err| err.at(path, index + 1))? {
            Line::Used => used += 1,
            Line::Skipped => trace!("{}:{}: skipped {:?}", path.display(), index + 1, line),
        }
    }
    Ok(used)
}

/// Lines ended by `\n`, `\r\n` or a lone `\r`.
fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split_terminator(['\n', '\r'])
        .map(str::to_owned)
        .collect()
}

/// Integer value of a token. Single underscores between digits group them,
/// so `1_000` is 1000.
pub(crate) fn parse_size(token: &str) -> std::result::Result<Size, LineError> {
    let invalid = || LineError::InvalidValue(token.to_owned());
    if !token.contains('_') {
        return token.parse().map_err(|_| invalid());
    }
    let bytes = token.as_bytes();
    let grouped = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !grouped {
        return Err(invalid());
    }
    token.replace('_', "").parse().map_err(|_| invalid())
}
