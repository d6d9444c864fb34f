use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use crate::error::{ReportError, Result};

/// Takes the first `names.len()` positional arguments as paths. Anything
/// after them is ignored.
pub fn paths(args: &[String], names: &[&str]) -> Result<Vec<PathBuf>> {
    let program = args.first().map_or("sectsize", String::as_str);
    if args.len() <= names.len() {
        let usage = format!("Usage: {} <{}>", program, names.join("> <"));
        return Err(ReportError::Usage { usage });
    }
    Ok(args[1..=names.len()].iter().map(PathBuf::from).collect())
}

/// Runs a tool against a locked, buffered stdout and exits with status 1 on
/// the first error.
pub fn main<F>(names: &[&str], tool: F)
where
    F: FnOnce(&[PathBuf], &mut dyn Write) -> Result<()>,
{
    let _ = env_logger::try_init();

    let args: Vec<String> = std::env::args().collect();
    let result = paths(&args, names).and_then(|paths| {
        let stdout = io::stdout();
        let mut output = io::BufWriter::new(stdout.lock());
        tool(&paths, &mut output)?;
        output.flush()?;
        Ok(())
    });

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}
