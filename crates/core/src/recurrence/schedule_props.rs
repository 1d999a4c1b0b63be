//! Property-based tests for schedule arithmetic.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;

use super::rule::Frequency;
use super::schedule::next_occurrence;

/// Strategy for dates between 1990 and 2090.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1990i32..2090i32, 1u32..=12u32, 1u32..=31u32).prop_filter_map(
        "valid calendar date",
        |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d),
    )
}

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Yearly),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The next occurrence is always strictly after the current one, so a
    /// materialized rule always leaves the due window.
    #[test]
    fn prop_next_occurrence_strictly_advances(
        frequency in frequency_strategy(),
        from in date_strategy(),
    ) {
        prop_assert!(next_occurrence(frequency, from) > from);
    }

    /// Daily and weekly advances are exact day offsets.
    #[test]
    fn prop_fixed_offsets(from in date_strategy()) {
        prop_assert_eq!(
            next_occurrence(Frequency::Daily, from) - from,
            chrono::Duration::days(1)
        );
        prop_assert_eq!(
            next_occurrence(Frequency::Weekly, from) - from,
            chrono::Duration::days(7)
        );
    }

    /// A monthly advance lands in the following calendar month on a day no
    /// later than the source day (clamped months only shrink the day).
    #[test]
    fn prop_monthly_lands_next_month_clamped(from in date_strategy()) {
        let next = next_occurrence(Frequency::Monthly, from);
        let expected_month = if from.month() == 12 { 1 } else { from.month() + 1 };
        prop_assert_eq!(next.month(), expected_month);
        prop_assert!(next.day() <= from.day());
    }

    /// A yearly advance lands in the same month of the following year.
    #[test]
    fn prop_yearly_lands_same_month_next_year(from in date_strategy()) {
        let next = next_occurrence(Frequency::Yearly, from);
        prop_assert_eq!(next.year(), from.year() + 1);
        prop_assert_eq!(next.month(), from.month());
        prop_assert!(next.day() <= from.day());
    }

    /// Schedule arithmetic is a pure function.
    #[test]
    fn prop_deterministic(
        frequency in frequency_strategy(),
        from in date_strategy(),
    ) {
        prop_assert_eq!(
            next_occurrence(frequency, from),
            next_occurrence(frequency, from)
        );
    }
}
