//! Behavior-driven tests for the KPI engine
//!
//! These tests verify WHAT an investor sees for a given close series,
//! focusing on metric values and absence rules rather than internals.

use tickboard_core::{
    compute_snapshot, format_snapshot, CurrentSource, PricePoint, PriceSeries, Trend, UtcDateTime,
};

const DAY: i64 = 86_400;
const START: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z

fn series(closes: &[f64]) -> PriceSeries {
    series_from(START, closes)
}

fn series_from(start: i64, closes: &[f64]) -> PriceSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(index, close)| {
            let ts = UtcDateTime::from_unix_timestamp(start + index as i64 * DAY)
                .expect("timestamp in range");
            PricePoint::new(ts, *close).expect("valid close")
        })
        .collect();
    PriceSeries::new(points).expect("ascending series")
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("metric should be present");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// =============================================================================
// KPI Engine: Worked Examples
// =============================================================================

#[test]
fn four_day_series_yields_daily_yearly_and_ath_but_no_monthly() {
    // Given: A short history of four closes
    let history = series(&[100.0, 102.0, 98.0, 105.0]);

    // When: The snapshot is computed without a latest quote
    let snapshot = compute_snapshot(&history, None).expect("two or more points");

    // Then: Current and ATH are the last close
    assert_eq!(snapshot.current, 105.0);
    assert_eq!(snapshot.all_time_high, 105.0);
    assert_eq!(snapshot.current_source, CurrentSource::History);

    // And: Daily, yearly and delta-from-ATH follow the exact formulas
    assert_close(snapshot.daily_pct, (105.0 - 98.0) / 98.0 * 100.0);
    assert_close(snapshot.yearly_pct, 5.0);
    assert_close(snapshot.delta_from_ath_pct, 0.0);

    // And: Monthly change needs 22 observations
    assert!(snapshot.monthly_pct.is_none());
}

#[test]
fn twenty_two_points_enable_monthly_change() {
    // Given: 22 closes starting at 50 and ending at 55
    let mut closes = vec![52.0; 22];
    closes[0] = 50.0;
    closes[21] = 55.0;
    let history = series(&closes);

    // When: The snapshot is computed
    let snapshot = compute_snapshot(&history, None).expect("snapshot");

    // Then: Monthly compares against the 22nd-from-last observation
    assert_close(snapshot.monthly_pct, 10.0);
    assert_close(snapshot.yearly_pct, 10.0);
}

#[test]
fn empty_and_single_point_series_have_no_snapshot() {
    // Given: No data, or a single observation
    let empty = PriceSeries::empty();
    let single = series(&[42.0]);

    // When / Then: The whole snapshot is absent and nothing panics
    assert!(compute_snapshot(&empty, None).is_none());
    assert!(compute_snapshot(&single, None).is_none());

    // And: The panel renders only "n/a" markers
    let rows = format_snapshot(None);
    assert!(rows.iter().all(|row| !row.is_available()));
}

// =============================================================================
// KPI Engine: Properties
// =============================================================================

#[test]
fn daily_change_is_exact_for_any_series_with_two_points() {
    let cases: &[&[f64]] = &[
        &[1.0, 2.0],
        &[250.0, 249.5],
        &[10.0, 10.0, 10.0],
        &[0.5, 3.0, 0.25, 0.75, 80.0],
    ];

    for closes in cases {
        let history = series(closes);
        let snapshot = compute_snapshot(&history, None).expect("snapshot");
        let last = closes[closes.len() - 1];
        let previous = closes[closes.len() - 2];
        assert_eq!(
            snapshot.daily_pct,
            Some((last - previous) / previous * 100.0),
            "daily change for {closes:?}"
        );
    }
}

#[test]
fn monthly_change_is_absent_below_twenty_two_points() {
    for len in 2..22 {
        let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
        let snapshot = compute_snapshot(&series(&closes), None).expect("snapshot");
        assert!(snapshot.monthly_pct.is_none(), "len {len} must not have monthly");
    }
}

#[test]
fn ath_never_below_current_and_delta_never_positive() {
    let histories: &[&[f64]] = &[
        &[100.0, 90.0],
        &[90.0, 100.0],
        &[5.0, 7.0, 6.0, 7.0],
        &[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0],
    ];
    let quotes: &[Option<&[f64]>] = &[None, Some(&[8.0, 200.0]), Some(&[1.0])];

    for closes in histories {
        let history = series(closes);
        for quote in quotes {
            let latest = quote.map(|q| series_from(START + 100 * DAY, q));
            let snapshot = compute_snapshot(&history, latest.as_ref()).expect("snapshot");
            assert!(snapshot.all_time_high >= snapshot.current);
            assert!(snapshot.delta_from_ath_pct.expect("ath is non-zero") <= 0.0);
        }
    }
}

#[test]
fn recomputing_from_same_inputs_is_identical() {
    let history = series(&[10.0, 11.0, 12.5, 11.75, 13.0]);
    let latest = series_from(START + 10 * DAY, &[13.0, 13.4]);

    let first = compute_snapshot(&history, Some(&latest));
    let second = compute_snapshot(&history, Some(&latest));

    assert_eq!(first, second);
    assert_eq!(format_snapshot(first.as_ref()), format_snapshot(second.as_ref()));
}

// =============================================================================
// KPI Engine: Latest Quote Takes Precedence
// =============================================================================

#[test]
fn latest_quote_drives_current_price_and_daily_change() {
    // Given: A one-year history and a fresher two-point quote series
    let history = series(&[100.0, 104.0, 110.0, 108.0]);
    let latest = series_from(START + 4 * DAY, &[108.0, 113.4]);

    // When: The snapshot is computed
    let snapshot = compute_snapshot(&history, Some(&latest)).expect("snapshot");

    // Then: Current comes from the quote and lifts the ATH
    assert_eq!(snapshot.current, 113.4);
    assert_eq!(snapshot.current_source, CurrentSource::Latest);
    assert_eq!(snapshot.all_time_high, 113.4);

    // And: Daily compares the two quote points
    assert_close(snapshot.daily_pct, 5.0);

    // And: The formatted daily row is green
    let rows = format_snapshot(Some(&snapshot));
    assert_eq!(rows[2].text, "+5.00%");
    assert_eq!(rows[2].trend, Some(Trend::Up));
}

#[test]
fn empty_latest_falls_back_to_history() {
    let history = series(&[100.0, 95.0]);
    let latest = PriceSeries::empty();

    let snapshot = compute_snapshot(&history, Some(&latest)).expect("snapshot");

    assert_eq!(snapshot.current, 95.0);
    assert_eq!(snapshot.current_source, CurrentSource::History);
    let rows = format_snapshot(Some(&snapshot));
    assert_eq!(rows[2].text, "-5.00%");
    assert_eq!(rows[2].trend, Some(Trend::Down));
}
