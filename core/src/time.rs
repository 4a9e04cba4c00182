//! Time related utils.
//!
//! Tuppari needs two renderings of the same instant: the compact ISO 8601
//! form that goes into the string to sign, and the HTTP date that goes into
//! the `X-Tuppari-Date` header.

use std::fmt::Debug;

use chrono::Utc;

use crate::Error;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime with current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into ISO 8601 basic format: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse time from RFC2822.
///
/// All of them are valid time:
///
/// - `Sat, 13 Jul 2024 15:09:59 -0400`
/// - `Mon, 15 Aug 2022 16:50:12 GMT`
pub fn parse_rfc2822(s: &str) -> crate::Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc2822(s).map_err(|e| {
        Error::invalid_argument(format!("invalid rfc2822 time: {s}")).with_source(e)
    })?;

    Ok(t.with_timezone(&Utc))
}

/// Clock is the time source used while signing requests.
///
/// Signing always reads the current time from the clock carried by
/// [`Context`](crate::Context), so tests can pin the time without touching
/// any process wide state.
pub trait Clock: Debug + Send + Sync + 'static {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime;
}

/// SystemClock reads the wall clock of current system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        now()
    }
}

/// FixedClock always returns the same instant.
///
/// This is useful for testing or for reproducing a signature.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime);

impl FixedClock {
    /// Create a clock pinned at given time.
    pub fn new(time: DateTime) -> Self {
        Self(time)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime {
        self.0
    }
}
