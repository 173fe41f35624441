//! Property tests for the analysis invariants.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use trendscope::lines::helpers::is_near_duplicate;
use trendscope::prelude::*;

fn make_bars(closes: &[f64]) -> Vec<Candle> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Candle::flat(start + Duration::days(i as i64), c))
        .collect()
}

fn closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1000.0, 0..80)
}

fn window() -> impl Strategy<Value = usize> {
    prop::sample::select(vec![3usize, 5, 7, 9])
}

proptest! {
    #[test]
    fn analysis_is_deterministic(closes in closes(), window in window()) {
        let analyzer = AnalyzerBuilder::new().reversal_window(window).build().unwrap();
        let bars = make_bars(&closes);
        prop_assert_eq!(analyzer.analyze(&bars).unwrap(), analyzer.analyze(&bars).unwrap());
    }

    #[test]
    fn short_series_has_no_reversals(closes in prop::collection::vec(1.0f64..1000.0, 0..9)) {
        let analyzer = AnalyzerBuilder::new().reversal_window(9).build().unwrap();
        let bars = make_bars(&closes);
        prop_assert!(analyzer.reversals(&bars).unwrap().is_empty());
        prop_assert!(analyzer.analyze(&bars).unwrap().is_empty());
    }

    #[test]
    fn output_is_bounded(
        closes in closes(),
        horizontal in 0usize..5,
        diagonal in 0usize..4,
    ) {
        let analyzer = AnalyzerBuilder::new()
            .horizontal_lines(horizontal)
            .diagonal_lines(diagonal)
            .build()
            .unwrap();
        let lines = analyzer.analyze(&make_bars(&closes)).unwrap();
        prop_assert!(lines.horizontal.len() <= horizontal);
        prop_assert!(lines.diagonal.len() <= diagonal);
    }

    #[test]
    fn levels_are_not_near_duplicates(closes in closes()) {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let tolerance = analyzer.config().horizontal.duplicate_tolerance.get();
        let lines = analyzer.analyze(&make_bars(&closes)).unwrap();

        for (i, &a) in lines.horizontal.iter().enumerate() {
            for &b in &lines.horizontal[i + 1..] {
                prop_assert!(!is_near_duplicate(a, b, tolerance));
            }
        }
    }

    #[test]
    fn diagonal_lines_are_not_near_duplicates(closes in closes(), window in window()) {
        let analyzer = AnalyzerBuilder::new()
            .reversal_window(window)
            .diagonal_lines(4)
            .build()
            .unwrap();
        let tolerance = analyzer.config().diagonal.duplicate_tolerance.get();
        let lines = analyzer.analyze(&make_bars(&closes)).unwrap();

        for (i, a) in lines.diagonal.iter().enumerate() {
            for b in &lines.diagonal[i + 1..] {
                prop_assert!(
                    !(is_near_duplicate(a.slope, b.slope, tolerance)
                        && is_near_duplicate(a.intercept, b.intercept, tolerance))
                );
            }
        }
    }

    #[test]
    fn levels_are_reversal_values(closes in closes()) {
        let analyzer = AnalyzerBuilder::new().build().unwrap();
        let bars = make_bars(&closes);
        let values = analyzer.reversals(&bars).unwrap().values();
        let lines = analyzer.analyze(&bars).unwrap();

        for level in &lines.horizontal {
            prop_assert!(values.contains(level));
        }
    }

    #[test]
    fn diagonal_lines_meet_min_weight(closes in closes(), min_weight in 3usize..6) {
        let analyzer = AnalyzerBuilder::new()
            .diagonal_min_weight(min_weight)
            .build()
            .unwrap();
        let lines = analyzer.analyze(&make_bars(&closes)).unwrap();

        for line in &lines.diagonal {
            prop_assert!(line.weight >= min_weight);
            prop_assert!(line.start.price > 0.0);
            prop_assert!(line.end.price > 0.0);
        }
    }

    #[test]
    fn level_weights_count_self(values in prop::collection::vec(1.0f64..1000.0, 1..40)) {
        let weighted = weigh_levels(&values, Tolerance::new(0.05).unwrap());
        prop_assert_eq!(weighted.len(), values.len());
        for (w, &v) in weighted.iter().zip(&values) {
            prop_assert_eq!(w.value, v);
            prop_assert!(w.weight >= 1 && w.weight <= values.len());
        }
    }
}
