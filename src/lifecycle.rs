//! Item lifecycle rules: the status state machine and the timestamp
//! conventions the sweep and the date filters rely on.
//!
//! Stored timestamps are RFC 3339 UTC strings. Rows imported from the
//! predecessor database may carry timezone-naive ISO-8601 values instead;
//! those are treated as UTC. Anything else counts as malformed and is
//! skipped by callers rather than failing a whole pass.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    Lost,
    Collected,
    Archived,
}

impl ItemStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Collected => "collected",
            Self::Archived => "archived",
        }
    }

    pub const ALL: [Self; 3] = [Self::Lost, Self::Collected, Self::Archived];

    /// Whether the state machine allows `self -> to`.
    ///
    /// Only three edges exist: `lost -> collected`, `lost -> archived`
    /// (sweep or staff) and `archived -> lost` (restore). Deletion removes
    /// the row and is not a transition.
    #[must_use]
    pub const fn can_become(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Lost, Self::Collected | Self::Archived) | (Self::Archived, Self::Lost)
        )
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown item status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ItemStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lost" => Ok(Self::Lost),
            "collected" => Ok(Self::Collected),
            "archived" => Ok(Self::Archived),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Parse a stored timestamp string into a UTC instant.
///
/// Accepts RFC 3339 first, then timezone-naive ISO-8601 (with or without a
/// fractional part) interpreted as UTC.
pub fn parse_stored_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").map(|naive| naive.and_utc())
        })
}

/// Calendar date (UTC) of a stored timestamp, for inclusive date-range
/// filtering. `None` for malformed values, which date filters exclude.
#[must_use]
pub fn stored_date(value: &str) -> Option<NaiveDate> {
    parse_stored_timestamp(value).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_round_trip() {
        for status in ItemStatus::ALL {
            assert_eq!(status.as_str().parse::<ItemStatus>().unwrap(), status);
        }
        assert!("misplaced".parse::<ItemStatus>().is_err());
        assert!("Lost".parse::<ItemStatus>().is_err());
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(ItemStatus::Lost.can_become(ItemStatus::Collected));
        assert!(ItemStatus::Lost.can_become(ItemStatus::Archived));
        assert!(ItemStatus::Archived.can_become(ItemStatus::Lost));
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(!ItemStatus::Collected.can_become(ItemStatus::Lost));
        assert!(!ItemStatus::Collected.can_become(ItemStatus::Archived));
        assert!(!ItemStatus::Archived.can_become(ItemStatus::Collected));
        for status in ItemStatus::ALL {
            assert!(!status.can_become(status));
        }
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_stored_timestamp("2026-03-14T09:26:53.589793+00:00").unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(parsed.date_naive(), expected.date_naive());
        assert_eq!(parsed.timestamp(), expected.timestamp());
    }

    #[test]
    fn test_parse_naive_legacy() {
        // The predecessor stored naive isoformat strings.
        let parsed = parse_stored_timestamp("2024-11-02T17:05:00.123456").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2024, 11, 2).unwrap());

        let no_fraction = parse_stored_timestamp("2024-11-02T17:05:00").unwrap();
        assert_eq!(no_fraction.timestamp(), parsed.timestamp());
    }

    #[test]
    fn test_parse_malformed() {
        assert!(parse_stored_timestamp("not-a-date").is_err());
        assert!(parse_stored_timestamp("").is_err());
        assert!(stored_date("2024-13-99").is_none());
    }
}
