//! Time-of-use calendar: expands schedule configuration into one pricing
//! period per hour of the year.

use crate::config::ScheduleConfig;
use crate::sim::types::Period;

/// Days per month for the simulated non-leap year.
const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const DAYS_PER_YEAR: usize = 365;

/// Expands a [`ScheduleConfig`] into per-hour pricing periods.
///
/// Weekday hours inside the configured window are peak during the summer
/// season and intermediate otherwise; the shoulder hours on either side of
/// the window are intermediate year-round. Weekends (optionally) and all
/// remaining hours are off-peak. The calendar assumes a 365-day year and
/// wraps for any hours past it.
#[derive(Debug, Clone)]
pub struct TouSchedule {
    config: ScheduleConfig,
}

impl TouSchedule {
    /// Creates a schedule from validated configuration.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Returns the pricing period for the given hour of the year.
    pub fn period_at(&self, hour_of_year: usize) -> Period {
        let c = &self.config;
        let day = (hour_of_year / 24) % DAYS_PER_YEAR;
        let hour_of_day = (hour_of_year % 24) as u8;

        let weekday = (c.year_starts_on as usize + day) % 7;
        if c.weekend_off_peak && weekday >= 5 {
            return Period::OffPeak;
        }

        let month = month_of_day(day);
        let in_summer = (c.summer_start_month..=c.summer_end_month).contains(&month);

        if (c.peak_start_hour..c.peak_end_hour).contains(&hour_of_day) {
            if in_summer {
                Period::Peak
            } else {
                Period::Intermediate
            }
        } else if (c.peak_start_hour - c.shoulder_hours..c.peak_start_hour)
            .contains(&hour_of_day)
            || (c.peak_end_hour..c.peak_end_hour + c.shoulder_hours).contains(&hour_of_day)
        {
            Period::Intermediate
        } else {
            Period::OffPeak
        }
    }

    /// Expands the schedule into one period per hour.
    pub fn year(&self, hours: usize) -> Vec<Period> {
        (0..hours).map(|h| self.period_at(h)).collect()
    }
}

/// Month (1-12) containing the given zero-based day of the year.
fn month_of_day(day: usize) -> u8 {
    let mut remaining = day as u32;
    for (i, &len) in MONTH_DAYS.iter().enumerate() {
        if remaining < len {
            return (i + 1) as u8;
        }
        remaining -= len;
    }
    12
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;

    /// Default calendar: peak 14-19, shoulders 2h, summer Jun-Sep,
    /// January 1 on a Wednesday.
    fn schedule() -> TouSchedule {
        TouSchedule::from_config(&ScheduleConfig::default())
    }

    /// Hour index for a given zero-based day and hour of day.
    fn at(day: usize, hour: usize) -> usize {
        day * 24 + hour
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(month_of_day(0), 1);
        assert_eq!(month_of_day(30), 1);
        assert_eq!(month_of_day(31), 2);
        assert_eq!(month_of_day(58), 2); // Feb 28
        assert_eq!(month_of_day(59), 3); // Mar 1, non-leap
        assert_eq!(month_of_day(364), 12);
    }

    #[test]
    fn summer_weekday_afternoon_is_peak() {
        // Day 180 is late June; (2 + 180) % 7 == 0, a Monday.
        let s = schedule();
        assert_eq!(s.period_at(at(180, 16)), Period::Peak);
    }

    #[test]
    fn winter_weekday_afternoon_is_intermediate() {
        // Day 12 is mid-January, (2 + 12) % 7 == 0, a Monday.
        let s = schedule();
        assert_eq!(s.period_at(at(12, 16)), Period::Intermediate);
    }

    #[test]
    fn shoulder_hours_are_intermediate() {
        let s = schedule();
        // Summer Monday: 12 and 13 lead into the 14-19 window, 19 and 20 trail it.
        assert_eq!(s.period_at(at(180, 12)), Period::Intermediate);
        assert_eq!(s.period_at(at(180, 13)), Period::Intermediate);
        assert_eq!(s.period_at(at(180, 19)), Period::Intermediate);
        assert_eq!(s.period_at(at(180, 20)), Period::Intermediate);
    }

    #[test]
    fn night_hours_are_off_peak() {
        let s = schedule();
        assert_eq!(s.period_at(at(180, 2)), Period::OffPeak);
        assert_eq!(s.period_at(at(180, 23)), Period::OffPeak);
    }

    #[test]
    fn weekends_are_off_peak() {
        let s = schedule();
        // Day 3 is the first Saturday ((2 + 3) % 7 == 5), day 4 the first Sunday.
        assert_eq!(s.period_at(at(3, 16)), Period::OffPeak);
        assert_eq!(s.period_at(at(4, 16)), Period::OffPeak);
    }

    #[test]
    fn weekend_peak_applies_when_weekend_rule_disabled() {
        let config = ScheduleConfig {
            weekend_off_peak: false,
            ..ScheduleConfig::default()
        };
        let s = TouSchedule::from_config(&config);
        // Summer Saturday: day 185, (2 + 185) % 7 == 5.
        assert_eq!(s.period_at(at(185, 16)), Period::Peak);
    }

    #[test]
    fn year_expansion_has_requested_length() {
        let s = schedule();
        let periods = s.year(8760);
        assert_eq!(periods.len(), 8760);
    }

    #[test]
    fn year_contains_all_three_periods() {
        let s = schedule();
        let periods = s.year(8760);
        assert!(periods.contains(&Period::Peak));
        assert!(periods.contains(&Period::Intermediate));
        assert!(periods.contains(&Period::OffPeak));
    }

    #[test]
    fn hours_past_year_end_wrap() {
        let s = schedule();
        assert_eq!(s.period_at(0), s.period_at(365 * 24));
    }

    #[test]
    fn expansion_is_deterministic() {
        let s = schedule();
        assert_eq!(s.year(1000), s.year(1000));
    }
}
