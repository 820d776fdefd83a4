// src/gantt/scale.rs — Timeline scales and header ticks

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::infra::errors::OrionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineScale {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimelineScale {
    pub const ALL: [TimelineScale; 5] = [
        TimelineScale::Day,
        TimelineScale::Week,
        TimelineScale::Month,
        TimelineScale::Quarter,
        TimelineScale::Year,
    ];

    pub fn px_per_day(&self) -> f64 {
        match self {
            TimelineScale::Day => 40.0,
            TimelineScale::Week => 16.0,
            TimelineScale::Month => 8.0,
            TimelineScale::Quarter => 3.0,
            TimelineScale::Year => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineScale::Day => "day",
            TimelineScale::Week => "week",
            TimelineScale::Month => "month",
            TimelineScale::Quarter => "quarter",
            TimelineScale::Year => "year",
        }
    }

    /// Next coarser scale, saturating at year.
    pub fn zoom_out(&self) -> Self {
        match self {
            TimelineScale::Day => TimelineScale::Week,
            TimelineScale::Week => TimelineScale::Month,
            TimelineScale::Month => TimelineScale::Quarter,
            TimelineScale::Quarter | TimelineScale::Year => TimelineScale::Year,
        }
    }

    /// Next finer scale, saturating at day.
    pub fn zoom_in(&self) -> Self {
        match self {
            TimelineScale::Day | TimelineScale::Week => TimelineScale::Day,
            TimelineScale::Month => TimelineScale::Week,
            TimelineScale::Quarter => TimelineScale::Month,
            TimelineScale::Year => TimelineScale::Quarter,
        }
    }

    /// Tick dates inside `[start, end]` aligned to this scale's boundaries.
    pub fn ticks(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut cursor = self.align_up(start);
        while let Some(d) = cursor {
            if d > end {
                break;
            }
            out.push(d);
            cursor = self.step(d);
        }
        out
    }

    pub fn tick_label(&self, date: NaiveDate) -> String {
        match self {
            TimelineScale::Day => date.format("%d").to_string(),
            TimelineScale::Week => date.format("%b %d").to_string(),
            TimelineScale::Month => date.format("%b %Y").to_string(),
            TimelineScale::Quarter => format!("Q{} {}", date.month0() / 3 + 1, date.year()),
            TimelineScale::Year => date.year().to_string(),
        }
    }

    /// First boundary on or after `date`.
    fn align_up(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimelineScale::Day => Some(date),
            TimelineScale::Week => {
                let back = i64::from(date.weekday().num_days_from_monday());
                if back == 0 {
                    Some(date)
                } else {
                    Some(date + Duration::days(7 - back))
                }
            }
            TimelineScale::Month => align_to_months(date, 1),
            TimelineScale::Quarter => align_to_months(date, 3),
            TimelineScale::Year => align_to_months(date, 12),
        }
    }

    fn step(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimelineScale::Day => date.succ_opt(),
            TimelineScale::Week => Some(date + Duration::days(7)),
            TimelineScale::Month => add_months(date, 1),
            TimelineScale::Quarter => add_months(date, 3),
            TimelineScale::Year => add_months(date, 12),
        }
    }
}

/// First day of the first `every`-month period starting on or after `date`.
fn align_to_months(date: NaiveDate, every: u32) -> Option<NaiveDate> {
    let period_month0 = date.month0() / every * every;
    let period_start = NaiveDate::from_ymd_opt(date.year(), period_month0 + 1, 1)?;
    if period_start == date {
        Some(date)
    } else {
        add_months(period_start, every)
    }
}

/// Add whole months to a first-of-month date.
fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.year() * 12 + date.month0() as i32 + months as i32;
    NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1)
}

impl fmt::Display for TimelineScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimelineScale {
    type Err = OrionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimelineScale::Day),
            "week" => Ok(TimelineScale::Week),
            "month" => Ok(TimelineScale::Month),
            "quarter" => Ok(TimelineScale::Quarter),
            "year" => Ok(TimelineScale::Year),
            _ => Err(OrionError::InvalidScale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_px_per_day() {
        assert_eq!(TimelineScale::Month.px_per_day(), 8.0);
        assert!(TimelineScale::Day.px_per_day() > TimelineScale::Week.px_per_day());
        assert!(TimelineScale::Quarter.px_per_day() > TimelineScale::Year.px_per_day());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Week".parse::<TimelineScale>().unwrap(), TimelineScale::Week);
        assert!("fortnight".parse::<TimelineScale>().is_err());
    }

    #[test]
    fn test_week_ticks_are_mondays() {
        // 2026-01-01 is a Thursday
        let ticks = TimelineScale::Week.ticks(d(2026, 1, 1), d(2026, 1, 31));
        assert_eq!(ticks.first(), Some(&d(2026, 1, 5)));
        assert_eq!(ticks.len(), 4);
        assert!(ticks.iter().all(|t| t.weekday() == chrono::Weekday::Mon));
    }

    #[test]
    fn test_month_ticks_cross_year() {
        let ticks = TimelineScale::Month.ticks(d(2025, 11, 15), d(2026, 2, 1));
        assert_eq!(ticks, vec![d(2025, 12, 1), d(2026, 1, 1), d(2026, 2, 1)]);
    }

    #[test]
    fn test_quarter_ticks_and_labels() {
        let ticks = TimelineScale::Quarter.ticks(d(2026, 1, 1), d(2026, 12, 31));
        assert_eq!(ticks.len(), 4);
        assert_eq!(TimelineScale::Quarter.tick_label(ticks[2]), "Q3 2026");
    }

    #[test]
    fn test_year_ticks_align_forward() {
        let ticks = TimelineScale::Year.ticks(d(2026, 3, 1), d(2028, 6, 1));
        assert_eq!(ticks, vec![d(2027, 1, 1), d(2028, 1, 1)]);
    }

    #[test]
    fn test_zoom_saturates() {
        assert_eq!(TimelineScale::Day.zoom_in(), TimelineScale::Day);
        assert_eq!(TimelineScale::Year.zoom_out(), TimelineScale::Year);
        assert_eq!(TimelineScale::Month.zoom_out(), TimelineScale::Quarter);
    }
}
