//! Retention-window arithmetic.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::error::RetentionError;

/// Last day of the retention window for an entity deleted at `deleted_at`.
///
/// The statutory period runs from the end of the calendar year of deletion,
/// so everything deleted in one year expires together on December 31st,
/// `retention_years` later.
#[must_use]
pub fn retention_expiry(deleted_at: DateTime<Utc>, retention_years: i32) -> NaiveDate {
    let expiry_year = deleted_at.date_naive().year() + retention_years;
    // December 31st exists in every year.
    NaiveDate::from_ymd_opt(expiry_year, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// True when the retention window has fully elapsed as of `as_of`.
///
/// The window is inclusive of its last day: an entity becomes purgeable
/// strictly after its expiry date, never on it.
#[must_use]
pub fn is_purgeable(deleted_at: DateTime<Utc>, as_of: NaiveDate, retention_years: i32) -> bool {
    as_of > retention_expiry(deleted_at, retention_years)
}

/// Checks that an entity may be hard-deleted.
///
/// # Errors
///
/// Returns `NotDeleted` for a live entity and `StillRetained` for one whose
/// window has not elapsed.
pub fn ensure_purgeable(
    deleted_at: Option<DateTime<Utc>>,
    as_of: NaiveDate,
    retention_years: i32,
) -> Result<(), RetentionError> {
    let deleted_at = deleted_at.ok_or(RetentionError::NotDeleted)?;
    let expires_on = retention_expiry(deleted_at, retention_years);
    if as_of <= expires_on {
        return Err(RetentionError::StillRetained { expires_on });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn deleted(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_expiry_is_year_end_based() {
        // January and December deletions in the same year expire together.
        assert_eq!(retention_expiry(deleted(2020, 1, 2), 10), day(2030, 12, 31));
        assert_eq!(
            retention_expiry(deleted(2020, 12, 31), 10),
            day(2030, 12, 31)
        );
    }

    #[rstest]
    // Deleted on the last day of 2020: window ends 2030-12-31, so the first
    // purgeable day is 2031-01-01.
    #[case(deleted(2020, 12, 31), day(2030, 12, 31), false)]
    #[case(deleted(2020, 12, 31), day(2031, 1, 1), true)]
    // Deleted one day later, in 2021: a full extra year of retention.
    #[case(deleted(2021, 1, 1), day(2031, 1, 1), false)]
    #[case(deleted(2021, 1, 1), day(2032, 1, 1), true)]
    fn test_purgeability_boundary(
        #[case] deleted_at: DateTime<Utc>,
        #[case] as_of: NaiveDate,
        #[case] expected: bool,
    ) {
        assert_eq!(is_purgeable(deleted_at, as_of, 10), expected);
    }

    #[test]
    fn test_ensure_purgeable_names_the_expiry() {
        assert_eq!(
            ensure_purgeable(Some(deleted(2024, 6, 15)), day(2031, 1, 1), 10),
            Err(RetentionError::StillRetained {
                expires_on: day(2034, 12, 31)
            })
        );
        assert_eq!(
            ensure_purgeable(Some(deleted(2020, 6, 15)), day(2031, 1, 1), 10),
            Ok(())
        );
    }

    #[test]
    fn test_live_entity_is_never_purgeable() {
        assert_eq!(
            ensure_purgeable(None, day(2099, 1, 1), 10),
            Err(RetentionError::NotDeleted)
        );
    }
}
