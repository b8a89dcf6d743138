//! hqm-report
//!
//! Serializes a sized portfolio to a single-sheet `.xlsx` workbook: one header
//! row, then one row per retained instrument in rank order.
//!
//! Layout and number formats follow the column's semantic kind:
//!
//! | kind     | columns                               | format  |
//! |----------|---------------------------------------|---------|
//! | text     | Ticker                                | general |
//! | currency | Stock Price, every `* Return`         | `$0.00` |
//! | percent  | every `* Percentile`, HQM Score       | `0.0%`  |
//! | integer  | Shares to Buy                         | `0`     |
//!
//! Percent cells are written as fractions (`percentile / 100`) so the `0.0%`
//! format shows `100.0%` for a percentile of 100.

mod layout;

pub use layout::{columns, row_cells, CellValue, Column, ColumnKind};

use std::fmt;
use std::path::Path;

use hqm_rank::SizedPortfolio;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};

pub const DEFAULT_SHEET_NAME: &str = "Recommended Trades";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The spreadsheet library rejected the workbook or could not save it.
    Xlsx(String),
    /// The output directory could not be created.
    Io { path: String, message: String },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Xlsx(msg) => write!(f, "xlsx error: {msg}"),
            ReportError::Io { path, message } => {
                write!(f, "cannot prepare output path '{path}': {message}")
            }
        }
    }
}

impl std::error::Error for ReportError {}

impl From<rust_xlsxwriter::XlsxError> for ReportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ReportError::Xlsx(e.to_string())
    }
}

/// Cell styling shared by every column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportStyle {
    pub font_rgb: u32,
    pub background_rgb: u32,
    pub column_width: f64,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            font_rgb: 0xFFFFFF,
            background_rgb: 0x0A0A23,
            column_width: 18.0,
        }
    }
}

impl ReportStyle {
    fn format_for(&self, kind: ColumnKind) -> Format {
        let base = Format::new()
            .set_font_color(Color::RGB(self.font_rgb))
            .set_background_color(Color::RGB(self.background_rgb))
            .set_border(FormatBorder::Thin);
        match kind.num_format() {
            Some(nf) => base.set_num_format(nf),
            None => base,
        }
    }
}

/// Build the workbook in memory.
pub fn build_workbook(
    portfolio: &SizedPortfolio,
    sheet_name: &str,
    style: &ReportStyle,
) -> Result<Workbook, ReportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    let cols = columns();
    let formats: Vec<Format> = cols.iter().map(|c| style.format_for(c.kind)).collect();

    for (col, (column, format)) in cols.iter().zip(&formats).enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, style.column_width)?;
        sheet.set_column_format(col, format)?;
        sheet.write_string_with_format(0, col, &column.header, format)?;
    }

    for (i, position) in portfolio.positions.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, (cell, format)) in row_cells(position).iter().zip(&formats).enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Text(s) => {
                    sheet.write_string_with_format(row, col, s, format)?;
                }
                CellValue::Number(n) => {
                    sheet.write_number_with_format(row, col, *n, format)?;
                }
            }
        }
    }

    Ok(workbook)
}

/// Render the workbook to bytes.
pub fn render_report(
    portfolio: &SizedPortfolio,
    sheet_name: &str,
    style: &ReportStyle,
) -> Result<Vec<u8>, ReportError> {
    let mut workbook = build_workbook(portfolio, sheet_name, style)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the workbook to `path`, overwriting any existing file.
///
/// Missing parent directories are created.
pub fn write_report(
    portfolio: &SizedPortfolio,
    path: &Path,
    sheet_name: &str,
    style: &ReportStyle,
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            path: parent.display().to_string(),
            message: e.to_string(),
        })?;
    }

    let mut workbook = build_workbook(portfolio, sheet_name, style)?;
    workbook.save(path)?;

    tracing::info!(path = %path.display(), rows = portfolio.len(), "report written");
    Ok(())
}
