//! Consumption-trend chart data.

use chrono::{Duration, NaiveDate};
use ei_core::EnergyRecord;
use ei_core::format::{format_month_day, parse_date};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::Year => "1y",
        }
    }

    /// `(span in days, label step in days)`
    pub fn span(self) -> (i64, i64) {
        match self {
            TimeRange::Week => (7, 1),
            TimeRange::Month => (30, 5),
            TimeRange::Quarter => (90, 15),
            TimeRange::Year => (365, 30),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == raw)
    }
}

/// Bucket start dates from `today - days` forward by `interval`, oldest first.
pub fn bucket_dates(range: TimeRange, today: NaiveDate) -> Vec<NaiveDate> {
    let (days, interval) = range.span();
    (0..=days / interval)
        .map(|step| today - Duration::days(days - step * interval))
        .collect()
}

/// Axis labels such as `"Mar 15"`.
pub fn date_labels(range: TimeRange, today: NaiveDate) -> Vec<String> {
    bucket_dates(range, today)
        .into_iter()
        .map(format_month_day)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionSeries {
    pub labels: Vec<String>,
    pub consumption: Vec<f64>,
    pub cost: Vec<f64>,
}

/// Sum records into the bucket whose start date is the latest one not after
/// the record's date. Records outside `[first bucket, today]` or with an
/// unparseable date are ignored.
pub fn consumption_series<'a>(
    records: impl IntoIterator<Item = &'a EnergyRecord>,
    range: TimeRange,
    today: NaiveDate,
) -> ConsumptionSeries {
    let starts = bucket_dates(range, today);
    let mut consumption = vec![0.0; starts.len()];
    let mut cost = vec![0.0; starts.len()];

    for record in records {
        let Ok(date) = parse_date(&record.date) else {
            continue;
        };
        if date > today {
            continue;
        }
        let bucket = starts.partition_point(|start| *start <= date);
        if bucket == 0 {
            continue;
        }
        consumption[bucket - 1] += record.energy_consumed;
        cost[bucket - 1] += record.cost;
    }

    ConsumptionSeries {
        labels: starts.into_iter().map(format_month_day).collect(),
        consumption,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: &str, kwh: f64) -> EnergyRecord {
        EnergyRecord {
            id: date.into(),
            date: date.into(),
            sector: "Residential".into(),
            location: "Texas".into(),
            energy_consumed: kwh,
            cost: kwh / 10.0,
            created_by: "u1".into(),
            created_at: date.into(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn label_counts_per_range() {
        let today = day(2024, 3, 31);
        assert_eq!(date_labels(TimeRange::Week, today).len(), 8);
        assert_eq!(date_labels(TimeRange::Month, today).len(), 7);
        assert_eq!(date_labels(TimeRange::Quarter, today).len(), 7);
        assert_eq!(date_labels(TimeRange::Year, today).len(), 13);
    }

    #[test]
    fn week_labels_end_today() {
        let labels = date_labels(TimeRange::Week, day(2024, 3, 10));
        assert_eq!(labels.first().map(String::as_str), Some("Mar 3"));
        assert_eq!(labels.last().map(String::as_str), Some("Mar 10"));
    }

    #[test]
    fn records_fall_into_buckets() {
        let today = day(2024, 3, 31);
        // buckets start Mar 1, 6, 11, 16, 21, 26, 31
        let records = [
            record("2024-03-01", 10.0),
            record("2024-03-05", 5.0),
            record("2024-03-31T08:00:00Z", 7.0),
            record("2024-02-01", 100.0),
            record("not a date", 1.0),
        ];
        let series = consumption_series(&records, TimeRange::Month, today);
        assert_eq!(series.labels[0], "Mar 1");
        assert_eq!(series.consumption[0], 15.0);
        assert_eq!(series.consumption[6], 7.0);
        assert_eq!(series.consumption.iter().sum::<f64>(), 22.0);
        assert_eq!(series.cost[0], 1.5);
    }

    #[test]
    fn parse_round_trips_labels() {
        for range in TimeRange::ALL {
            assert_eq!(TimeRange::parse(range.label()), Some(range));
        }
    }
}
