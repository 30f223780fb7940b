use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Lookback window kept as price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LookbackPeriod {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    FiveYears,
}

impl LookbackPeriod {
    pub const ALL: [Self; 6] = [
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::ThreeYears,
        Self::FiveYears,
    ];

    /// Periods offered by the header toggle.
    pub const TOGGLE: [Self; 3] = [Self::SixMonths, Self::OneYear, Self::ThreeYears];

    /// Range token understood by the chart endpoint.
    pub const fn range_token(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::ThreeYears => "3y",
            Self::FiveYears => "5y",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::SixMonths => "6M",
            Self::OneYear => "1Y",
            Self::ThreeYears => "3Y",
            Self::FiveYears => "5Y",
        }
    }

    /// Approximate number of daily observations in the window.
    pub const fn trading_days(self) -> usize {
        match self {
            Self::OneMonth => 22,
            Self::ThreeMonths => 63,
            Self::SixMonths => 126,
            Self::OneYear => 252,
            Self::ThreeYears => 756,
            Self::FiveYears => 1260,
        }
    }

    const fn from_parts(amount: u32, unit: Unit) -> Option<Self> {
        match (amount, unit) {
            (1, Unit::Month) => Some(Self::OneMonth),
            (3, Unit::Month) => Some(Self::ThreeMonths),
            (6, Unit::Month) => Some(Self::SixMonths),
            (12, Unit::Month) | (1, Unit::Year) => Some(Self::OneYear),
            (36, Unit::Month) | (3, Unit::Year) => Some(Self::ThreeYears),
            (60, Unit::Month) | (5, Unit::Year) => Some(Self::FiveYears),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Unit {
    Month,
    Year,
}

fn parse_unit(value: &str) -> Option<Unit> {
    match value {
        "m" | "mo" | "mon" | "month" | "months" => Some(Unit::Month),
        "y" | "yr" | "year" | "years" => Some(Unit::Year),
        _ => None,
    }
}

impl Display for LookbackPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.range_token())
    }
}

impl FromStr for LookbackPeriod {
    type Err = ValidationError;

    /// Accepts `"6 months"`, `"1 year"`, `"3years"`, `"6mo"`, `"1y"`, `"3Y"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidPeriod {
            value: value.to_owned(),
        };

        let normalized = value.trim().to_ascii_lowercase();
        let split = normalized
            .find(|ch: char| !ch.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (digits, unit) = normalized.split_at(split);

        let amount = digits.parse::<u32>().map_err(|_| invalid())?;
        let unit = parse_unit(unit.trim()).ok_or_else(invalid)?;

        Self::from_parts(amount, unit).ok_or_else(invalid)
    }
}

impl TryFrom<String> for LookbackPeriod {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LookbackPeriod> for String {
    fn from(value: LookbackPeriod) -> Self {
        value.range_token().to_owned()
    }
}
