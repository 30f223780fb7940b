//! Line chart artifact built from a close series.
//!
//! The artifact is renderer-neutral: x is unix seconds, y is the close.

use serde::Serialize;

use crate::PriceSeries;

const Y_PADDING_RATIO: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartArtifact {
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartArtifact {
    /// `None` for an empty series.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;

        let points = series
            .points()
            .iter()
            .map(|point| (point.ts.unix_timestamp() as f64, point.close))
            .collect::<Vec<_>>();

        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
                (lo.min(*y), hi.max(*y))
            });

        let x_bounds = {
            let start = first.ts.unix_timestamp() as f64;
            let end = last.ts.unix_timestamp() as f64;
            if end > start {
                [start, end]
            } else {
                [start - 1.0, end + 1.0]
            }
        };

        let y_bounds = if max_y > min_y {
            let padding = (max_y - min_y) * Y_PADDING_RATIO;
            [min_y - padding, max_y + padding]
        } else {
            [min_y - 1.0, max_y + 1.0]
        };

        Some(Self {
            points,
            x_bounds,
            y_bounds,
        })
    }

    /// Close range actually present in the data, without padding.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.points.iter().map(|(_, y)| *y);
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricePoint, UtcDateTime};

    fn series(closes: &[f64]) -> PriceSeries {
        let points = closes
            .iter()
            .enumerate()
            .map(|(index, close)| {
                let ts = UtcDateTime::from_unix_timestamp(1_000 + index as i64 * 60)
                    .expect("timestamp");
                PricePoint::new(ts, *close).expect("point")
            })
            .collect();
        PriceSeries::new(points).expect("series")
    }

    #[test]
    fn empty_series_has_no_chart() {
        assert!(ChartArtifact::from_series(&PriceSeries::empty()).is_none());
    }

    #[test]
    fn pads_y_bounds_by_range() {
        let chart = ChartArtifact::from_series(&series(&[100.0, 120.0, 110.0])).expect("chart");
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.x_bounds, [1_000.0, 1_120.0]);
        assert_eq!(chart.y_bounds, [99.0, 121.0]);
        assert_eq!(chart.value_range(), Some((100.0, 120.0)));
    }

    #[test]
    fn widens_degenerate_bounds() {
        let chart = ChartArtifact::from_series(&series(&[50.0])).expect("chart");
        assert_eq!(chart.x_bounds, [999.0, 1_001.0]);
        assert_eq!(chart.y_bounds, [49.0, 51.0]);
    }
}
