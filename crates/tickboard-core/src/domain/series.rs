use serde::{Deserialize, Serialize};

use crate::{UtcDateTime, ValidationError};

/// One closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: UtcDateTime,
    pub close: f64,
}

impl PricePoint {
    pub fn new(ts: UtcDateTime, close: f64) -> Result<Self, ValidationError> {
        if !close.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "close" });
        }
        if close < 0.0 {
            return Err(ValidationError::NegativeValue { field: "close" });
        }
        Ok(Self { ts, close })
    }
}

/// Chronologically ascending close series with unique timestamps.
///
/// An empty series is valid and stands for "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, ValidationError> {
        for (index, point) in points.iter().enumerate() {
            if !point.close.is_finite() {
                return Err(ValidationError::NonFiniteValue { field: "close" });
            }
            if point.close < 0.0 {
                return Err(ValidationError::NegativeValue { field: "close" });
            }
            if index > 0 && points[index - 1].ts >= point.ts {
                return Err(ValidationError::UnorderedSeries { index });
            }
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Point `n` observations before the last one (`nth_back(0)` is the last).
    pub fn nth_back(&self, n: usize) -> Option<&PricePoint> {
        self.points.iter().rev().nth(n)
    }

    pub fn max_close(&self) -> Option<f64> {
        self.points.iter().map(|point| point.close).reduce(f64::max)
    }

    /// Keeps only the newest `n` points.
    pub fn tail(&self, n: usize) -> Self {
        let start = self.points.len().saturating_sub(n);
        Self {
            points: self.points[start..].to_vec(),
        }
    }

    /// Latest point strictly older than `ts`.
    pub fn last_before(&self, ts: UtcDateTime) -> Option<&PricePoint> {
        self.points.iter().rev().find(|point| point.ts < ts)
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = ValidationError;

    fn try_from(value: Vec<PricePoint>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(value: PriceSeries) -> Self {
        value.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(seconds: i64, close: f64) -> PricePoint {
        let ts = UtcDateTime::from_unix_timestamp(seconds).expect("timestamp");
        PricePoint::new(ts, close).expect("valid point")
    }

    #[test]
    fn rejects_unordered_or_duplicate_timestamps() {
        let err = PriceSeries::new(vec![point(10, 1.0), point(10, 2.0)]).expect_err("duplicate");
        assert_eq!(err, ValidationError::UnorderedSeries { index: 1 });

        let err = PriceSeries::new(vec![point(20, 1.0), point(10, 2.0)]).expect_err("unordered");
        assert_eq!(err, ValidationError::UnorderedSeries { index: 1 });
    }

    #[test]
    fn rejects_non_finite_close() {
        let ts = UtcDateTime::from_unix_timestamp(0).expect("timestamp");
        assert!(matches!(
            PricePoint::new(ts, f64::NAN),
            Err(ValidationError::NonFiniteValue { field: "close" })
        ));
    }

    #[test]
    fn tail_and_lookups() {
        let series =
            PriceSeries::new(vec![point(1, 5.0), point(2, 9.0), point(3, 7.0)]).expect("valid");
        assert_eq!(series.max_close(), Some(9.0));
        assert_eq!(series.nth_back(2).map(|p| p.close), Some(5.0));
        assert_eq!(series.tail(2).len(), 2);
        assert_eq!(series.tail(10).len(), 3);

        let cutoff = UtcDateTime::from_unix_timestamp(3).expect("timestamp");
        assert_eq!(series.last_before(cutoff).map(|p| p.close), Some(9.0));
        assert!(PriceSeries::empty().max_close().is_none());
    }
}
