use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Result, TaskError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a stored due date. Plain calendar dates resolve to midnight UTC;
/// full timestamps must be RFC 3339.
pub fn parse_due(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Ascending by instant; tasks without a usable date go last.
pub fn cmp_due(a: &str, b: &str) -> Ordering {
    match (parse_due(a), parse_due(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn is_upcoming(raw: &str, now: DateTime<Utc>) -> bool {
    parse_due(raw).is_some_and(|due| due > now)
}

pub fn display_due(raw: &str) -> String {
    match parse_due(raw) {
        Some(due) => due.format(DATE_FORMAT).to_string(),
        None if raw.trim().is_empty() => "—".to_string(),
        None => raw.trim().to_string(),
    }
}

/// Boundary check for entry points that accept free text.
pub fn validate_due(raw: &str) -> Result<()> {
    if raw.trim().is_empty() || parse_due(raw).is_some() {
        Ok(())
    } else {
        Err(TaskError::validation(
            "due date",
            format!("`{}` is not a YYYY-MM-DD date", raw.trim()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn calendar_dates_are_midnight_utc() {
        let due = parse_due("2099-01-01").expect("date parses");
        assert_eq!(
            due,
            Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0)
                .single()
                .expect("valid instant")
        );
    }

    #[test]
    fn rfc3339_timestamps_are_accepted() {
        let due = parse_due("2024-05-01T10:30:00.000Z").expect("timestamp parses");
        assert_eq!(display_due("2024-05-01T10:30:00.000Z"), "2024-05-01");
        assert_eq!(due.format("%H:%M").to_string(), "10:30");
    }

    #[test]
    fn undated_tasks_sort_last() {
        assert_eq!(cmp_due("2000-01-01", ""), Ordering::Less);
        assert_eq!(cmp_due("garbage", "2000-01-01"), Ordering::Greater);
        assert_eq!(cmp_due("", "garbage"), Ordering::Equal);
    }

    #[test]
    fn due_exactly_now_is_not_upcoming() {
        let now = Utc
            .with_ymd_and_hms(2030, 6, 1, 0, 0, 0)
            .single()
            .expect("valid instant");
        assert!(!is_upcoming("2030-06-01", now));
        assert!(is_upcoming("2030-06-02", now));
        assert!(!is_upcoming("", now));
    }

    #[test]
    fn validate_due_rejects_free_text() {
        assert!(validate_due("").is_ok());
        assert!(validate_due("2030-06-01").is_ok());
        assert!(validate_due("next friday").is_err());
    }
}
