//! Works out when a recurring transaction is due.

use time::{Date, Duration, Month};

use crate::recurrence::{Frequency, RecurrenceRule};

/// The date `months` calendar months after `date`.
///
/// The day is clamped to the last day of the target month, so 31 January
/// plus one month is 28 (or 29) February.
fn add_months(date: Date, months: u32) -> Option<Date> {
    let month_index = date.month() as i64 - 1 + months as i64;
    let year = date.year() as i64 + month_index / 12;
    let year = i32::try_from(year).ok()?;
    let month = Month::try_from((month_index % 12 + 1) as u8).ok()?;

    clamped_date(year, month, date.day())
}

/// The date `years` calendar years after `date`. 29 February becomes 28
/// February in years that are not leap years.
fn add_years(date: Date, years: u32) -> Option<Date> {
    let year = date.year().checked_add(i32::try_from(years).ok()?)?;

    clamped_date(year, date.month(), date.day())
}

fn clamped_date(year: i32, month: Month, day: u8) -> Option<Date> {
    (1..=day)
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
}

/// The `n`th occurrence (counting from zero) of a schedule that starts on `start_date`.
///
/// Occurrences are counted from the start date rather than from the previous
/// occurrence, so a monthly rule starting on the 31st lands on the last day of
/// short months without drifting to the 28th for the rest of the year.
///
/// Returns `None` if the date is out of range.
pub fn nth_occurrence(start_date: Date, frequency: Frequency, n: u32) -> Option<Date> {
    match frequency {
        Frequency::Weekly => start_date.checked_add(Duration::weeks(n as i64)),
        Frequency::Monthly => add_months(start_date, n),
        Frequency::Yearly => add_years(start_date, n),
    }
}

/// The occurrences of `rule` that are due on or before `today` and have not
/// been generated yet, in chronological order.
///
/// Occurrences after the rule's end date are never due.
pub fn due_occurrences(rule: &RecurrenceRule, today: Date) -> Vec<Date> {
    let until = match rule.end_date {
        Some(end_date) if end_date < today => end_date,
        _ => today,
    };

    let mut due = Vec::new();

    for n in 0.. {
        let Some(date) = nth_occurrence(rule.start_date, rule.frequency, n) else {
            break;
        };

        if date > until {
            break;
        }

        if rule
            .last_generated_date
            .is_none_or(|last_generated| date > last_generated)
        {
            due.push(date);
        }
    }

    due
}
