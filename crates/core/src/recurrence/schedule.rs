//! Pure schedule arithmetic.

use chrono::{Days, Months, NaiveDate};

use super::rule::Frequency;

/// Computes the occurrence that follows `from` for the given frequency.
///
/// Monthly and yearly advances are calendar-aware: the target day is clamped
/// to the last day of a shorter month, so Jan 31 → Feb 29 in a leap year and
/// Feb 28 otherwise. Schedules always advance from the scheduled occurrence,
/// not from the time a cycle happens to run, so a late cycle does not drift
/// the calendar alignment.
#[must_use]
pub fn next_occurrence(frequency: Frequency, from: NaiveDate) -> NaiveDate {
    let next = match frequency {
        Frequency::Daily => from.checked_add_days(Days::new(1)),
        Frequency::Weekly => from.checked_add_days(Days::new(7)),
        Frequency::Monthly => from.checked_add_months(Months::new(1)),
        Frequency::Yearly => from.checked_add_months(Months::new(12)),
    };
    // Only fails at the end of representable time.
    next.unwrap_or(NaiveDate::MAX)
}
