use chrono::{Months, NaiveDateTime, Utc};

/// Current instant as a naive UTC timestamp, the representation used for
/// listing observation times throughout the crate.
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Returns the instant `months` calendar months before `at`.
///
/// Month arithmetic clamps to the last day of shorter months
/// (e.g. 31 August minus 6 months is 28/29 February).
pub fn months_before(at: NaiveDateTime, months: u32) -> NaiveDateTime {
    at.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDateTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_months_before_same_day() {
        assert_eq!(months_before(ts(2024, 7, 15), 6), ts(2024, 1, 15));
        assert_eq!(months_before(ts(2024, 7, 15), 1), ts(2024, 6, 15));
    }

    #[test]
    fn test_months_before_clamps_to_month_end() {
        assert_eq!(months_before(ts(2024, 8, 31), 6), ts(2024, 2, 29));
    }

    #[test]
    fn test_months_before_crosses_year() {
        assert_eq!(months_before(ts(2024, 3, 10), 5), ts(2023, 10, 10));
    }
}
