//! Display formatting for KPI values, kept apart from the computation.

use serde::Serialize;

use super::KpiSnapshot;

/// Marker rendered for an absent metric.
pub const NOT_AVAILABLE: &str = "n/a";

/// Direction of a signed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Non-negative change, rendered green.
    Up,
    /// Negative change, rendered red.
    Down,
}

impl Trend {
    pub fn classify(pct: f64) -> Self {
        if pct >= 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }
}

/// One display row of a KPI panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedKpi {
    pub label: &'static str,
    pub text: String,
    pub trend: Option<Trend>,
}

impl FormattedKpi {
    fn price(label: &'static str, value: Option<f64>) -> Self {
        Self {
            label,
            text: format_price(value),
            trend: None,
        }
    }

    fn percent(label: &'static str, value: Option<f64>) -> Self {
        Self {
            label,
            text: format_percent(value),
            trend: value.map(|value| Trend::classify(displayed(value))),
        }
    }

    pub fn is_available(&self) -> bool {
        self.text != NOT_AVAILABLE
    }
}

pub fn format_price(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => String::from(NOT_AVAILABLE),
    }
}

/// Signed percentage with two decimals, e.g. `+7.14%`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:+.2}%", displayed(value)),
        None => String::from(NOT_AVAILABLE),
    }
}

// Values that round to zero display as +0.00 and count as up.
fn displayed(value: f64) -> f64 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

/// Fixed row set of an instrument panel; every row is `n/a` for an absent
/// snapshot.
pub fn format_snapshot(snapshot: Option<&KpiSnapshot>) -> Vec<FormattedKpi> {
    vec![
        FormattedKpi::price("Current", snapshot.map(|s| s.current)),
        FormattedKpi::price("ATH", snapshot.map(|s| s.all_time_high)),
        FormattedKpi::percent("Daily", snapshot.and_then(|s| s.daily_pct)),
        FormattedKpi::percent("Monthly", snapshot.and_then(|s| s.monthly_pct)),
        FormattedKpi::percent("Yearly", snapshot.and_then(|s| s.yearly_pct)),
        FormattedKpi::percent("Δ ATH", snapshot.and_then(|s| s.delta_from_ath_pct)),
    ]
}
