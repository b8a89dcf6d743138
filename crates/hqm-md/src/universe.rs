//! Universe loader: ticker symbols from a CSV file.
//!
//! ## Column contract
//!
//! The header row is required. The ticker column is found by name,
//! case-insensitively: `ticker`, then `symbol`. A single-column file is
//! accepted whatever its header says. Cells are trimmed; blank cells are
//! skipped. Symbols are not validated and duplicates are kept (the fetcher
//! collapses them).

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const TICKER_HEADERS: &[&str] = &["ticker", "symbol"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniverseError {
    /// The file is absent or unreadable.
    Io { path: String, message: String },
    /// The CSV library rejected the input.
    Csv(String),
    /// No header names a ticker column and the file has more than one column.
    MissingTickerColumn { headers: Vec<String> },
}

impl fmt::Display for UniverseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniverseError::Io { path, message } => {
                write!(f, "cannot read universe file '{path}': {message}")
            }
            UniverseError::Csv(msg) => write!(f, "universe csv error: {msg}"),
            UniverseError::MissingTickerColumn { headers } => write!(
                f,
                "universe csv has no 'Ticker' column (headers: {})",
                headers.join(", ")
            ),
        }
    }
}

impl std::error::Error for UniverseError {}

/// Load tickers from the CSV file at `path`, in file order.
pub fn load_universe(path: &Path) -> Result<Vec<String>, UniverseError> {
    let file = File::open(path).map_err(|e| UniverseError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let tickers = parse_universe_reader(file)?;
    tracing::info!(path = %path.display(), tickers = tickers.len(), "universe loaded");
    Ok(tickers)
}

/// Parse tickers from any CSV reader (tests use in-memory bytes).
pub fn parse_universe_reader<R: Read>(rdr: R) -> Result<Vec<String>, UniverseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| UniverseError::Csv(e.to_string()))?
        .clone();

    let col = ticker_column(&headers)?;

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| UniverseError::Csv(e.to_string()))?;
        match record.get(col) {
            Some(cell) if !cell.is_empty() => out.push(cell.to_string()),
            _ => continue,
        }
    }
    Ok(out)
}

fn ticker_column(headers: &csv::StringRecord) -> Result<usize, UniverseError> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
        .collect();

    for wanted in TICKER_HEADERS {
        if let Some(i) = normalized.iter().position(|h| h == wanted) {
            return Ok(i);
        }
    }

    if normalized.len() == 1 {
        return Ok(0);
    }

    Err(UniverseError::MissingTickerColumn {
        headers: headers.iter().map(str::to_string).collect(),
    })
}
