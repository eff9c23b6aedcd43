use crate::reducer::TotalSums;

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Default name of the emitted table.
pub const DEFAULT_TABLE_PATH: &str = "plot.csv";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write to plot file '{}': {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One line of the output table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultRow {
    pub period: usize,
    pub magnitude: f64,
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:6} , {:10.2}", self.period, self.magnitude)
    }
}

/// Writes rows one per line. Rows for period 0 are dropped.
pub fn write_table<W, I>(out: &mut W, rows: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = ResultRow>,
{
    let mut written = 0;
    for row in rows.into_iter().filter(|row| row.period != 0) {
        writeln!(out, "{}", row)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}

/// File-backed destination for the final table.
pub struct ResultSink {
    path: PathBuf,
}

impl ResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn emit(&self, totals: &TotalSums) -> Result<usize, SinkError> {
        let to_err = |source| SinkError::Unavailable {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(to_err)?;
        let mut out = BufWriter::new(file);
        let rows = write_table(&mut out, totals.rows()).map_err(to_err)?;

        tracing::info!("Wrote {} rows to {}", rows, self.path.display());
        Ok(rows)
    }
}
