// =============================================================================
// Forecast horizon — future business days
// =============================================================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Monday to Friday. Exchange holidays are not modelled.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Business days in `(last, last + horizon_days]`, ascending.
pub fn business_days_after(last: NaiveDate, horizon_days: u32) -> Vec<NaiveDate> {
    (1..=i64::from(horizon_days))
        .filter_map(|offset| last.checked_add_signed(Duration::days(offset)))
        .filter(|d| is_business_day(*d))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn skips_weekends() {
        // 2021-12-30 is a Thursday.
        let days = business_days_after(date(2021, 12, 30), 7);
        assert_eq!(
            days,
            vec![
                date(2021, 12, 31),
                date(2022, 1, 3),
                date(2022, 1, 4),
                date(2022, 1, 5),
                date(2022, 1, 6),
            ]
        );
        assert!(days.iter().all(|d| is_business_day(*d)));
    }

    #[test]
    fn last_date_is_excluded_and_end_is_included() {
        // Monday + 4 days: Tue..Fri.
        let days = business_days_after(date(2022, 1, 3), 4);
        assert_eq!(days.first(), Some(&date(2022, 1, 4)));
        assert_eq!(days.last(), Some(&date(2022, 1, 7)));
        assert_eq!(days.len(), 4);
    }

    #[test]
    fn ninety_day_horizon_has_about_sixty_four_days() {
        let days = business_days_after(date(2021, 12, 30), 90);
        // 90 calendar days span 12 full weeks plus 6 days.
        assert_eq!(days.len(), 64);
        assert!(days.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn zero_horizon_is_empty() {
        assert!(business_days_after(date(2022, 1, 3), 0).is_empty());
    }

    #[test]
    fn weekend_only_horizon_is_empty() {
        // Friday + 2 days covers Sat and Sun only.
        assert!(business_days_after(date(2022, 1, 7), 2).is_empty());
    }
}
