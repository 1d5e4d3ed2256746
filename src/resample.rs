use chrono::{Datelike, Duration, NaiveDate};
use itertools::Itertools;

use crate::data::Bar;

/// Monday of the ISO week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Aggregate daily bars into weekly bars (Monday-anchored).
///
/// Aggregation is first(open) / max(high) / min(low) / last(close); each
/// weekly bar is labeled with its week's Monday. Input must be ordered by
/// date, which keeps the output dates strictly increasing.
pub fn resample_weekly(bars: &[Bar]) -> Vec<Bar> {
    let groups = bars.iter().group_by(|bar| week_start(bar.date));
    let mut weekly = Vec::new();
    for (monday, group) in &groups {
        if let Some(bar) = aggregate_week(monday, group) {
            weekly.push(bar);
        }
    }
    weekly
}

fn aggregate_week<'a>(monday: NaiveDate, group: impl Iterator<Item = &'a Bar>) -> Option<Bar> {
    let mut week: Option<Bar> = None;
    for bar in group {
        match week.as_mut() {
            None => {
                week = Some(Bar {
                    date: monday,
                    ..bar.clone()
                })
            }
            Some(acc) => {
                acc.high = acc.high.max(bar.high);
                acc.low = acc.low.min(bar.low);
                acc.close = bar.close;
            }
        }
    }
    week
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn aggregates_one_week_first_max_min_last() {
        // Mon Jan 8 through Fri Jan 12, 2024.
        let daily = vec![
            bar(2024, 1, 8, 10.0, 12.0, 9.5, 11.0),
            bar(2024, 1, 9, 11.0, 15.0, 10.5, 14.0),
            bar(2024, 1, 10, 14.0, 14.5, 8.0, 9.0),
            bar(2024, 1, 12, 9.0, 10.0, 8.5, 9.5),
        ];
        let weekly = resample_weekly(&daily);
        assert_eq!(weekly.len(), 1);
        let week = &weekly[0];
        assert_eq!(week.date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(week.open, 10.0);
        assert_eq!(week.high, 15.0);
        assert_eq!(week.low, 8.0);
        assert_eq!(week.close, 9.5);
    }

    #[test]
    fn splits_weeks_on_monday_and_keeps_order() {
        let daily = vec![
            bar(2024, 1, 5, 10.0, 11.0, 9.0, 10.5),  // Friday, week of Jan 1
            bar(2024, 1, 8, 11.0, 12.0, 10.0, 11.5), // Monday, next week
            bar(2024, 1, 9, 11.5, 13.0, 11.0, 12.5),
        ];
        let weekly = resample_weekly(&daily);
        assert_eq!(weekly.len(), 2);
        assert_eq!(weekly[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(weekly[1].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert!(weekly[0].date < weekly[1].date);
        assert_eq!(weekly[1].close, 12.5);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(resample_weekly(&[]).is_empty());
    }
}
