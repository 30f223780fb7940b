//! Market data providers.

mod synthetic;
mod yahoo;

pub use synthetic::SyntheticSource;
pub use yahoo::{parse_chart_response, YahooChartSource};
