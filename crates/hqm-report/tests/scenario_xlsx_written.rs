//! Workbook output: one sheet, header row, one row per position.
//!
//! The xlsx container is a zip archive; assertions read the XML parts directly.

use std::io::{Cursor, Read};

use hqm_md::{Quote, WindowReturns};
use hqm_rank::{rank_and_size, Micros, SizedPortfolio};
use hqm_report::{render_report, write_report, ReportStyle, DEFAULT_SHEET_NAME};

fn portfolio() -> SizedPortfolio {
    let quotes = vec![
        Quote::new("AAPL", 180.0, WindowReturns::new(0.30, 0.10, 0.05, 0.01)),
        Quote::new("MSFT", 410.0, WindowReturns::new(0.20, 0.20, 0.10, 0.02)),
        Quote::new("XOM", 105.0, WindowReturns::new(0.10, 0.05, 0.00, -0.01)),
    ];
    rank_and_size(quotes, 50, Micros::from_decimal(1_000_000.0).unwrap()).unwrap()
}

fn part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn workbook_has_single_named_sheet() {
    let bytes = render_report(&portfolio(), DEFAULT_SHEET_NAME, &ReportStyle::default()).unwrap();
    assert_eq!(&bytes[..2], b"PK");

    let workbook = part(&bytes, "xl/workbook.xml");
    assert!(workbook.contains(r#"name="Recommended Trades""#));
    assert_eq!(workbook.matches("<sheet ").count(), 1);
}

#[test]
fn headers_and_tickers_are_present() {
    let bytes = render_report(&portfolio(), DEFAULT_SHEET_NAME, &ReportStyle::default()).unwrap();
    let strings = part(&bytes, "xl/sharedStrings.xml");

    for header in ["Ticker", "Stock Price", "One Month Percentile", "HQM Score", "Shares to Buy"] {
        assert!(strings.contains(header), "missing header {header}");
    }
    for ticker in ["AAPL", "MSFT", "XOM"] {
        assert!(strings.contains(ticker), "missing ticker {ticker}");
    }
}

#[test]
fn header_plus_one_row_per_position() {
    let pf = portfolio();
    let bytes = render_report(&pf, DEFAULT_SHEET_NAME, &ReportStyle::default()).unwrap();
    let sheet = part(&bytes, "xl/worksheets/sheet1.xml");

    assert_eq!(sheet.matches("<row ").count(), pf.len() + 1);
}

#[test]
fn custom_number_formats_are_registered() {
    let bytes = render_report(&portfolio(), DEFAULT_SHEET_NAME, &ReportStyle::default()).unwrap();
    let styles = part(&bytes, "xl/styles.xml");

    assert!(styles.contains("$0.00"));
    assert!(styles.contains("0.0%"));
}

#[test]
fn write_report_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("recommended_trades.xlsx");

    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"stale").unwrap();

    write_report(&portfolio(), &path, DEFAULT_SHEET_NAME, &ReportStyle::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn write_report_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("trades.xlsx");

    write_report(&portfolio(), &path, "Trades", &ReportStyle::default()).unwrap();
    assert!(path.exists());
}
