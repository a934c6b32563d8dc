//! Calendar dimension derivation.
//!
//! All attributes are pure functions of the date; no clock or RNG is involved.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::records::CalendarDate;

/// First day of the warehouse calendar.
pub const CALENDAR_START: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(date) => date,
    None => panic!("calendar start must be a valid date"),
};

/// Last day of the warehouse calendar, inclusive.
pub const CALENDAR_END: NaiveDate = match NaiveDate::from_ymd_opt(2023, 12, 31) {
    Some(date) => date,
    None => panic!("calendar end must be a valid date"),
};

impl CalendarDate {
    /// Derives every calendar attribute from `date`.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use lms_data::CalendarDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2023, 12, 31).expect("valid date");
    /// let row = CalendarDate::from_date(date);
    ///
    /// assert_eq!(row.day_name, "Sunday");
    /// assert_eq!(row.quarter, 4);
    /// assert!(row.is_weekend);
    /// ```
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let weekday = date.weekday();
        Self {
            full_date: date,
            day_of_week: to_i32(weekday.number_from_monday()),
            day_name: date.format("%A").to_string(),
            day_of_month: to_i32(date.day()),
            day_of_year: to_i32(date.ordinal()),
            week_of_year: to_i32(date.iso_week().week()),
            month_number: to_i32(date.month()),
            month_name: date.format("%B").to_string(),
            quarter: quarter_of(date.month()),
            year: date.year(),
            is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
        }
    }
}

/// Yields one calendar row per day from `start` to `end`, both inclusive.
pub fn calendar_dates(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = CalendarDate> {
    start
        .iter_days()
        .take_while(move |date| *date <= end)
        .map(CalendarDate::from_date)
}

/// Yields the warehouse calendar, 2020-01-01 through 2023-12-31.
pub fn warehouse_calendar() -> impl Iterator<Item = CalendarDate> {
    calendar_dates(CALENDAR_START, CALENDAR_END)
}

const fn quarter_of(month: u32) -> i32 {
    match month {
        1..=3 => 1,
        4..=6 => 2,
        7..=9 => 3,
        _ => 4,
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
    }

    #[test]
    fn warehouse_calendar_has_one_row_per_day() {
        let rows: Vec<_> = warehouse_calendar().collect();
        assert_eq!(rows.len(), 1461);
        assert_eq!(rows.first().map(|r| r.full_date), Some(CALENDAR_START));
        assert_eq!(rows.last().map(|r| r.full_date), Some(CALENDAR_END));
        assert!(
            rows.windows(2)
                .all(|pair| matches!(pair, [a, b] if a.full_date.succ_opt() == Some(b.full_date)))
        );
    }

    #[test]
    fn weekend_flag_matches_saturday_and_sunday() {
        for row in warehouse_calendar() {
            let expected = row.day_of_week >= 6;
            assert_eq!(row.is_weekend, expected, "mismatch on {}", row.full_date);
        }
    }

    #[rstest]
    #[case(date(2020, 1, 1), 3, "Wednesday", 1, "January", 1)]
    #[case(date(2020, 2, 29), 6, "Saturday", 9, "February", 1)]
    #[case(date(2021, 7, 4), 7, "Sunday", 26, "July", 3)]
    #[case(date(2023, 10, 2), 1, "Monday", 40, "October", 4)]
    fn derives_attributes(
        #[case] day: NaiveDate,
        #[case] day_of_week: i32,
        #[case] day_name: &str,
        #[case] week_of_year: i32,
        #[case] month_name: &str,
        #[case] quarter: i32,
    ) {
        let row = CalendarDate::from_date(day);
        assert_eq!(row.day_of_week, day_of_week);
        assert_eq!(row.day_name, day_name);
        assert_eq!(row.week_of_year, week_of_year);
        assert_eq!(row.month_name, month_name);
        assert_eq!(row.quarter, quarter);
        assert_eq!(row.year, day.year());
    }

    #[test]
    fn iso_week_wraps_at_year_start() {
        // 2021-01-01 belongs to ISO week 53 of 2020.
        assert_eq!(CalendarDate::from_date(date(2021, 1, 1)).week_of_year, 53);
    }

    #[test]
    fn leap_day_has_ordinal_sixty() {
        assert_eq!(CalendarDate::from_date(date(2020, 2, 29)).day_of_year, 60);
    }

    #[test]
    fn inverted_range_is_empty() {
        assert_eq!(calendar_dates(date(2021, 1, 2), date(2021, 1, 1)).count(), 0);
    }
}
