use std::fmt;

/// Errors from selection and position sizing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RankError {
    /// No instrument survived to sizing (empty universe or `top_n == 0`).
    EmptySelection,
    /// Total budget is zero or negative.
    NonPositiveBudget,
    /// A price rounds to zero micros (or below) and cannot size a position.
    NonPositivePrice { symbol: String },
    /// `price * shares` does not fit the fixed-point range.
    Overflow { symbol: String },
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelection => write!(f, "empty selection: no instruments to size"),
            Self::NonPositiveBudget => write!(f, "total budget must be > 0"),
            Self::NonPositivePrice { symbol } => {
                write!(f, "price for '{symbol}' is not positive at micro precision")
            }
            Self::Overflow { symbol } => write!(f, "position value overflow for '{symbol}'"),
        }
    }
}

impl std::error::Error for RankError {}
