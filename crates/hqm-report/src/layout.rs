use hqm_md::Window;
use hqm_rank::SizedPosition;

/// Semantic type of a report column; decides its number format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Currency,
    Percent,
    Integer,
}

impl ColumnKind {
    pub fn num_format(&self) -> Option<&'static str> {
        match self {
            ColumnKind::Text => None,
            ColumnKind::Currency => Some("$0.00"),
            ColumnKind::Percent => Some("0.0%"),
            ColumnKind::Integer => Some("0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub kind: ColumnKind,
}

impl Column {
    fn new<S: Into<String>>(header: S, kind: ColumnKind) -> Self {
        Self {
            header: header.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// Fixed column order: ticker, price, (return, percentile) per window, score, shares.
pub fn columns() -> Vec<Column> {
    let mut cols = vec![
        Column::new("Ticker", ColumnKind::Text),
        Column::new("Stock Price", ColumnKind::Currency),
    ];
    for w in Window::ALL {
        cols.push(Column::new(format!("{} Return", w.label()), ColumnKind::Currency));
        cols.push(Column::new(format!("{} Percentile", w.label()), ColumnKind::Percent));
    }
    cols.push(Column::new("HQM Score", ColumnKind::Percent));
    cols.push(Column::new("Shares to Buy", ColumnKind::Integer));
    cols
}

/// One data row, aligned with [`columns`].
pub fn row_cells(position: &SizedPosition) -> Vec<CellValue> {
    let inst = &position.instrument;
    let mut cells = vec![
        CellValue::Text(inst.quote.symbol.clone()),
        CellValue::Number(inst.quote.price),
    ];
    for w in Window::ALL {
        cells.push(CellValue::Number(inst.quote.returns.get(w)));
        cells.push(CellValue::Number(inst.percentiles.get(w) / 100.0));
    }
    cells.push(CellValue::Number(inst.composite_score / 100.0));
    cells.push(CellValue::Number(position.shares_to_buy as f64));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use hqm_md::{Quote, WindowReturns};
    use hqm_rank::{Micros, ScoredInstrument, WindowPercentiles};

    fn position() -> SizedPosition {
        SizedPosition {
            instrument: ScoredInstrument {
                quote: Quote::new("NVDA", 450.25, WindowReturns::new(1.2, 0.6, 0.3, 0.1)),
                percentiles: WindowPercentiles {
                    one_year: 100.0,
                    six_month: 90.0,
                    three_month: 80.0,
                    one_month: 70.0,
                },
                composite_score: 85.0,
            },
            price: Micros::new(450_250_000),
            shares_to_buy: 44,
            cost: Micros::new(19_811_000_000),
        }
    }

    #[test]
    fn twelve_columns_in_fixed_order() {
        let headers: Vec<String> = columns().into_iter().map(|c| c.header).collect();
        assert_eq!(
            headers,
            [
                "Ticker",
                "Stock Price",
                "One Year Return",
                "One Year Percentile",
                "Six Month Return",
                "Six Month Percentile",
                "Three Month Return",
                "Three Month Percentile",
                "One Month Return",
                "One Month Percentile",
                "HQM Score",
                "Shares to Buy",
            ]
        );
    }

    #[test]
    fn kinds_match_column_semantics() {
        for c in columns() {
            let expected = if c.header == "Ticker" {
                ColumnKind::Text
            } else if c.header == "Shares to Buy" {
                ColumnKind::Integer
            } else if c.header.ends_with("Percentile") || c.header == "HQM Score" {
                ColumnKind::Percent
            } else {
                ColumnKind::Currency
            };
            assert_eq!(c.kind, expected, "{}", c.header);
        }
    }

    #[test]
    fn row_matches_column_order_and_scales_percents() {
        let cells = row_cells(&position());
        assert_eq!(cells.len(), columns().len());
        assert_eq!(cells[0], CellValue::Text("NVDA".to_string()));
        assert_eq!(cells[1], CellValue::Number(450.25));
        assert_eq!(cells[2], CellValue::Number(1.2));
        assert_eq!(cells[3], CellValue::Number(1.0));
        assert_eq!(cells[9], CellValue::Number(0.7));
        assert_eq!(cells[10], CellValue::Number(0.85));
        assert_eq!(cells[11], CellValue::Number(44.0));
    }

    #[test]
    fn stock_price_is_the_fetched_price_not_the_sizing_price() {
        let mut pos = position();
        pos.instrument.quote.price = 100.0000004;
        pos.price = Micros::new(100_000_001);
        assert_eq!(row_cells(&pos)[1], CellValue::Number(100.0000004));
    }
}
