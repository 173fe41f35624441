//! Benchmarks for trend line detection.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trendscope::prelude::*;

/// Simple test bar structure
#[derive(Debug, Clone, Copy)]
struct TestBar {
  d: NaiveDate,
  o: f64,
  h: f64,
  l: f64,
  c: f64,
}

impl OHLCV for TestBar {
  fn date(&self) -> NaiveDate {
    self.d
  }

  fn open(&self) -> f64 {
    self.o
  }

  fn high(&self) -> f64 {
    self.h
  }

  fn low(&self) -> f64 {
    self.l
  }

  fn close(&self) -> f64 {
    self.c
  }

  fn volume(&self) -> f64 {
    1000.0
  }
}

/// Generate realistic daily bars
fn generate_bars(n: usize) -> Vec<TestBar> {
  let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
  let mut bars = Vec::with_capacity(n);
  let mut price = 100.0;

  for i in 0..n {
    let change = ((i * 7 + 13) % 100) as f64 / 50.0 - 1.0; // Deterministic "random"
    let swing = (i as f64 / 15.0).sin() * 1.5;
    let volatility = 2.0 + ((i * 3) % 10) as f64 / 5.0;

    let o = price;
    let c = (price + change + swing).max(1.0);
    let h = o.max(c) + volatility * 0.5;
    let l = (o.min(c) - volatility * 0.5).max(0.5);

    bars.push(TestBar { d: start + Duration::days(i as i64), o, h, l, c });
    price = c;
  }

  bars
}

fn bench_analyze(c: &mut Criterion) {
  let bars = generate_bars(1000);

  let analyzer = AnalyzerBuilder::new().build().unwrap();

  c.bench_function("analyze_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.analyze(black_box(&bars)));
    })
  });
}

fn bench_analyze_weekly(c: &mut Criterion) {
  let bars = generate_bars(2500);

  let analyzer = AnalyzerBuilder::new().timeframe(Timeframe::Weekly).build().unwrap();

  c.bench_function("analyze_weekly_2500_bars", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.analyze(black_box(&bars)));
    })
  });
}

fn bench_scaling(c: &mut Criterion) {
  let analyzer = AnalyzerBuilder::new().build().unwrap();

  let mut group = c.benchmark_group("scaling");

  for size in [100, 250, 500, 1000, 2000].iter() {
    let bars = generate_bars(*size);

    group.bench_with_input(BenchmarkId::new("analyze", size), size, |b, _| {
      b.iter(|| {
        let _ = black_box(analyzer.analyze(black_box(&bars)));
      })
    });
  }

  group.finish();
}

fn bench_reversals(c: &mut Criterion) {
  let bars = generate_bars(1000);

  let analyzer = AnalyzerBuilder::new().build().unwrap();

  c.bench_function("reversals_1000_bars", |b| {
    b.iter(|| {
      let _ = black_box(analyzer.reversals(black_box(&bars)));
    })
  });
}

fn bench_weigh_pairs(c: &mut Criterion) {
  let bars = generate_bars(1000);

  let analyzer = AnalyzerBuilder::new().build().unwrap();
  let reversals = analyzer.reversals(&bars).unwrap();
  let axis = DayAxis::new(bars[0].d, bars[bars.len() - 1].d);
  let noise = Tolerance::new(0.05).unwrap();

  c.bench_function("weigh_pairs_bottoms", |b| {
    b.iter(|| {
      let _ = black_box(weigh_pairs(black_box(&reversals.bottoms), &axis, noise));
    })
  });
}

criterion_group!(
  benches,
  bench_analyze,
  bench_analyze_weekly,
  bench_scaling,
  bench_reversals,
  bench_weigh_pairs,
);

criterion_main!(benches);
