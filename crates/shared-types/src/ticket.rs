//! # Ticket Entity
//!
//! The central value of the system. A ticket is immutable once constructed;
//! "updating" one means building a new value.
//!
//! ## Expiry
//!
//! Expiry is a pure function of `issued_at + validity_days * 24h` compared
//! against the evaluation time. No other field takes part in it, and a
//! creation date that cannot be parsed always counts as expired.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text format of `creationDate`: fixed width and lexically sortable.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Issuance timestamp with second resolution, kept in its textual form.
///
/// Tokens carry the date as text, so a hand-crafted token may hold a value
/// that does not parse. Keeping the raw text lets such a ticket round-trip
/// unchanged while [`Ticket::is_expired`] still fails safe on it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketTimestamp(String);

impl TicketTimestamp {
    /// Format a UTC instant, truncating to whole seconds.
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.format(TIMESTAMP_FORMAT).to_string())
    }

    /// Wrap raw text without checking it (used by loaders and decoders).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into a UTC instant, `None` if the text is not in [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.0, TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

impl fmt::Display for TicketTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An access ticket.
///
/// Field order is the canonical serialization order; the token encoding
/// depends on it being stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ledger key. Never empty for an issued ticket.
    #[serde(rename = "ticketId")]
    pub id: String,

    /// Assigned at creation, immutable thereafter.
    #[serde(rename = "creationDate")]
    pub issued_at: TicketTimestamp,

    /// Length of the validity window in days. Negative values are
    /// structurally valid but never valid for admission.
    #[serde(rename = "validityDays")]
    pub validity_days: i32,

    /// Route/service the ticket authorizes. Opaque to validation.
    #[serde(rename = "lineNumber")]
    pub line_number: i32,
}

impl Ticket {
    /// Build a ticket issued at `issued_at`.
    pub fn new(
        id: impl Into<String>,
        issued_at: DateTime<Utc>,
        validity_days: i32,
        line_number: i32,
    ) -> Self {
        Self {
            id: id.into(),
            issued_at: TicketTimestamp::from_datetime(issued_at),
            validity_days,
            line_number,
        }
    }

    /// The instant after which the ticket is expired.
    ///
    /// `None` when the creation date does not parse or the arithmetic
    /// leaves chrono's representable range.
    #[must_use]
    pub fn valid_until(&self) -> Option<DateTime<Utc>> {
        let issued = self.issued_at.to_datetime()?;
        let window = Duration::try_days(i64::from(self.validity_days))?;
        issued.checked_add_signed(window)
    }

    /// `now > issued_at + validity_days * 24h`.
    ///
    /// An unparsable creation date counts as expired.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.valid_until() {
            Some(until) => now > until,
            None => true,
        }
    }

    /// Non-empty id, positive validity, and not expired.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.id.is_empty() && self.validity_days > 0 && !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_timestamp_format_is_fixed_width() {
        let ts = TicketTimestamp::from_datetime(at(2024, 1, 7, 9, 5, 3));
        assert_eq!(ts.as_str(), "2024-01-07T09:05:03");
        assert_eq!(ts.as_str().len(), 19);
        assert_eq!(ts.to_datetime(), Some(at(2024, 1, 7, 9, 5, 3)));
    }

    #[test]
    fn test_timestamp_truncates_subseconds() {
        let instant = at(2024, 1, 7, 9, 5, 3) + Duration::milliseconds(999);
        let ts = TicketTimestamp::from_datetime(instant);
        assert_eq!(ts.to_datetime(), Some(at(2024, 1, 7, 9, 5, 3)));
    }

    #[test]
    fn test_fresh_ticket_is_valid() {
        let now = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("TKT-1", now, 7, 3);
        assert!(!ticket.is_expired(now));
        assert!(ticket.is_valid(now));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let issued = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("TKT-1", issued, 1, 3);
        let boundary = issued + Duration::days(1);
        assert!(!ticket.is_expired(boundary));
        assert!(ticket.is_expired(boundary + Duration::seconds(1)));
    }

    #[test]
    fn test_zero_days_never_valid() {
        let now = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("TKT-1", now, 0, 3);
        assert!(!ticket.is_valid(now));
        assert!(ticket.is_expired(now + Duration::seconds(1)));
    }

    #[test]
    fn test_negative_days_never_valid() {
        let now = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("TKT-1", now, -3, 3);
        assert!(ticket.is_expired(now));
        assert!(!ticket.is_valid(now));
    }

    #[test]
    fn test_empty_id_never_valid() {
        let now = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("", now, 30, 3);
        assert!(!ticket.is_expired(now));
        assert!(!ticket.is_valid(now));
    }

    #[test]
    fn test_unparsable_date_is_expired() {
        let ticket = Ticket {
            id: "TKT-1".into(),
            issued_at: TicketTimestamp::from_raw("yesterday-ish"),
            validity_days: 365,
            line_number: 1,
        };
        assert!(ticket.is_expired(at(2000, 1, 1, 0, 0, 0)));
        assert!(!ticket.is_valid(at(2000, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn test_ten_year_old_ticket_is_expired() {
        let now = at(2034, 6, 1, 0, 0, 0);
        let ticket = Ticket::new("TKT-1", at(2024, 6, 1, 0, 0, 0), 1, 3);
        assert!(ticket.is_expired(now));
    }

    #[test]
    fn test_huge_validity_does_not_overflow() {
        let now = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("TKT-1", now, i32::MAX, 3);
        // Past chrono's representable range: fails safe.
        assert!(ticket.is_expired(now));
    }

    #[test]
    fn test_long_duration_valid() {
        let now = at(2024, 1, 7, 12, 0, 0);
        let ticket = Ticket::new("TKT-1", now, 3650, 3);
        assert!(ticket.is_valid(now + Duration::days(3000)));
    }

    proptest! {
        #[test]
        fn prop_expiry_is_monotonic(
            issued_secs in 0i64..4_000_000_000,
            validity_days in -400i32..400,
            probe_offset in -100_000_000i64..100_000_000,
            later_by in 0i64..100_000_000,
        ) {
            let issued = Utc.timestamp_opt(issued_secs, 0).unwrap();
            let ticket = Ticket::new("TKT-1", issued, validity_days, 1);
            let probe = issued + Duration::seconds(probe_offset);
            if ticket.is_expired(probe) {
                prop_assert!(ticket.is_expired(probe + Duration::seconds(later_by)));
            }
        }

        #[test]
        fn prop_non_positive_validity_never_valid(
            issued_secs in 0i64..4_000_000_000,
            validity_days in i32::MIN..=0,
            probe_offset in -100_000i64..100_000,
        ) {
            let issued = Utc.timestamp_opt(issued_secs, 0).unwrap();
            let ticket = Ticket::new("TKT-1", issued, validity_days, 1);
            prop_assert!(!ticket.is_valid(issued + Duration::seconds(probe_offset)));
        }
    }
}
