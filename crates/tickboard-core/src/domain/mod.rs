//! # Domain Models
//!
//! Canonical domain types for the dashboard.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PriceSeries`] | Ascending close series for one instrument |
//! | [`PricePoint`] | One timestamped close |
//! | [`InstrumentMeta`] | Symbol, display name and ISIN/WKN |
//! | [`LookbackPeriod`] | History window (6 months, 1 year, ...) |
//! | [`Symbol`] | Validated exchange ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! All types validate their invariants at construction time.

mod instrument;
mod period;
mod series;
mod symbol;
mod timestamp;

pub use instrument::InstrumentMeta;
pub use period::LookbackPeriod;
pub use series::{PricePoint, PriceSeries};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
