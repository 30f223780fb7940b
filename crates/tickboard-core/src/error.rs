use thiserror::Error;

/// Validation and contract errors exposed by `tickboard-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid lookback period '{value}', expected e.g. '6 months', '1 year', '3 years'")]
    InvalidPeriod { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("unix timestamp {value} is out of range")]
    TimestampOutOfRange { value: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("price series must be strictly ascending in time (violated at index {index})")]
    UnorderedSeries { index: usize },

    #[error("instrument name cannot be empty for symbol '{symbol}'")]
    EmptyInstrumentName { symbol: String },
}
