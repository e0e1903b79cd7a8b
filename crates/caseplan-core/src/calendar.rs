//! Business-day calendar collaborator and adjustment helpers.
//!
//! The scheduling engine never decides what a working day is; it consumes a
//! [`BusinessCalendar`] predicate supplied by the caller. [`HolidayCalendar`]
//! is the stock implementation (weekends plus an explicit holiday set) used
//! by the CLI and the tests.

use std::collections::BTreeSet;

use jiff::civil::{Date, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Upper bound on how far a date may be shifted looking for a business day.
///
/// A real-world calendar never needs more than a week; hitting this bound
/// means the calendar itself is malformed.
pub const MAX_ADJUSTMENT_DAYS: u32 = 14;

/// Direction in which a non-business date is shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustDirection {
    /// Shift toward later dates
    Forward,
    /// Shift toward earlier dates
    Backward,
}

/// Externally supplied predicate answering whether a date is a working day.
pub trait BusinessCalendar {
    /// Returns true when `date` is neither a weekend day nor a holiday.
    fn is_business_day(&self, date: Date) -> bool;
}

impl<F> BusinessCalendar for F
where
    F: Fn(Date) -> bool,
{
    fn is_business_day(&self, date: Date) -> bool {
        self(date)
    }
}

/// Calendar that treats Saturdays, Sundays, and an explicit holiday set as
/// non-business days.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a weekends-only calendar with no holidays.
    pub fn weekends_only() -> Self {
        Self::default()
    }

    /// Creates a calendar from an iterator of holiday dates.
    pub fn with_holidays(holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Returns true when `date` is in the holiday set.
    pub fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date)
    }
}

impl BusinessCalendar for HolidayCalendar {
    fn is_business_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) && !self.is_holiday(date)
    }
}

/// Shifts `date` in `direction`, one day at a time, until the calendar
/// reports a business day.
///
/// Returns [`ScheduleError::CalendarAdjustmentExhausted`] after
/// [`MAX_ADJUSTMENT_DAYS`] shifts without finding one.
pub fn adjust_to_business_day<C: BusinessCalendar>(
    date: Date,
    direction: AdjustDirection,
    calendar: &C,
) -> Result<Date> {
    let mut current = date;
    for _ in 0..=MAX_ADJUSTMENT_DAYS {
        if calendar.is_business_day(current) {
            return Ok(current);
        }
        let shifted = match direction {
            AdjustDirection::Forward => current.tomorrow(),
            AdjustDirection::Backward => current.yesterday(),
        };
        current = shifted.map_err(|_| ScheduleError::DateOverflow {
            date: current,
            offset_days: match direction {
                AdjustDirection::Forward => 1,
                AdjustDirection::Backward => -1,
            },
        })?;
    }
    Err(ScheduleError::CalendarAdjustmentExhausted {
        date,
        attempted_days: MAX_ADJUSTMENT_DAYS,
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn test_weekends_are_not_business_days() {
        let calendar = HolidayCalendar::weekends_only();
        // 2025-01-04 is a Saturday, 2025-01-05 a Sunday, 2025-01-06 a Monday
        assert!(!calendar.is_business_day(date(2025, 1, 4)));
        assert!(!calendar.is_business_day(date(2025, 1, 5)));
        assert!(calendar.is_business_day(date(2025, 1, 6)));
    }

    #[test]
    fn test_holiday_shifts_forward_past_new_year() {
        // 2025-01-01 is a Wednesday holiday; forward adjustment lands on
        // Thursday the 2nd, never on the holiday itself.
        let calendar = HolidayCalendar::with_holidays([date(2025, 1, 1)]);
        let adjusted =
            adjust_to_business_day(date(2025, 1, 1), AdjustDirection::Forward, &calendar)
                .expect("adjustment succeeds");
        assert_eq!(adjusted, date(2025, 1, 2));
    }

    #[test]
    fn test_holiday_shifts_backward_to_previous_year() {
        let calendar = HolidayCalendar::with_holidays([date(2025, 1, 1)]);
        let adjusted =
            adjust_to_business_day(date(2025, 1, 1), AdjustDirection::Backward, &calendar)
                .expect("adjustment succeeds");
        // 2024-12-31 is a Tuesday
        assert_eq!(adjusted, date(2024, 12, 31));
    }

    #[test]
    fn test_business_day_is_returned_unchanged() {
        let calendar = HolidayCalendar::weekends_only();
        let monday = date(2025, 3, 31);
        let adjusted = adjust_to_business_day(monday, AdjustDirection::Forward, &calendar)
            .expect("adjustment succeeds");
        assert_eq!(adjusted, monday);
    }

    #[test]
    fn test_adjustment_exhaustion_on_degenerate_calendar() {
        let never_open = |_date: Date| false;
        let result =
            adjust_to_business_day(date(2025, 1, 1), AdjustDirection::Forward, &never_open);
        assert!(matches!(
            result,
            Err(ScheduleError::CalendarAdjustmentExhausted { attempted_days, .. })
                if attempted_days == MAX_ADJUSTMENT_DAYS
        ));
    }

    #[test]
    fn test_closure_calendar_is_accepted() {
        let weekdays = |d: Date| !matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday);
        // Saturday 2025-01-11 shifts forward to Monday the 13th
        let adjusted =
            adjust_to_business_day(date(2025, 1, 11), AdjustDirection::Forward, &weekdays)
                .expect("adjustment succeeds");
        assert_eq!(adjusted, date(2025, 1, 13));
    }
}
