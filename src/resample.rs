//! Bar cleaning and timeframe aggregation.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::{Candle, OHLCVExt, Result, TrendError, OHLCV};

/// Timeframe the analysis runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Bars as given
    #[default]
    Daily,
    /// Weeks ending on Friday
    Weekly,
    /// Calendar months
    Monthly,
}

impl Timeframe {
    /// Returns a short label for this timeframe.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Daily => "1d",
            Timeframe::Weekly => "1w",
            Timeframe::Monthly => "1M",
        }
    }

    /// Date that labels the bucket `date` falls into.
    ///
    /// Weekly buckets are labelled with their Friday, monthly buckets with the
    /// last day of the month.
    pub fn bucket_end(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Timeframe::Daily => date,
            Timeframe::Weekly => {
                let friday = Weekday::Fri.num_days_from_monday();
                let weekday = date.weekday().num_days_from_monday();
                let ahead = (friday + 7 - weekday) % 7;
                date.checked_add_days(Days::new(u64::from(ahead)))
                    .unwrap_or(NaiveDate::MAX)
            }
            Timeframe::Monthly => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                NaiveDate::from_ymd_opt(year, month, 1)
                    .and_then(|first| first.pred_opt())
                    .unwrap_or(NaiveDate::MAX)
            }
        }
    }
}

/// Drop bars with a missing (NaN) or infinite OHLC value.
///
/// Fails with `NoValidData` when nothing is left.
pub fn clean<T: OHLCV>(bars: &[T]) -> Result<Vec<Candle>> {
    let cleaned: Vec<Candle> = bars
        .iter()
        .filter(|bar| bar.is_finite())
        .map(Candle::from_bar)
        .collect();

    if cleaned.is_empty() {
        return Err(TrendError::NoValidData);
    }
    Ok(cleaned)
}

/// Aggregate chronologically ordered bars into a larger timeframe.
///
/// Open is the first open, high the max, low the min, close the last close
/// and volume the sum. Each bar carries its bucket's end date; buckets with no
/// input bars are never produced.
pub fn resample<T: OHLCV>(bars: &[T], timeframe: Timeframe) -> Vec<Candle> {
    let mut aggregated: Vec<Candle> = Vec::new();
    let mut current: Option<Candle> = None;

    for bar in bars {
        let bucket = timeframe.bucket_end(bar.date());

        match current {
            Some(ref mut agg) if agg.date == bucket => {
                agg.high = agg.high.max(bar.high());
                agg.low = agg.low.min(bar.low());
                agg.close = bar.close();
                agg.volume += bar.volume();
            }
            _ => {
                if let Some(agg) = current.take() {
                    aggregated.push(agg);
                }
                current = Some(Candle {
                    date: bucket,
                    ..Candle::from_bar(bar)
                });
            }
        }
    }

    if let Some(agg) = current {
        aggregated.push(agg);
    }

    aggregated
}
