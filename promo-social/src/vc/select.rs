//! Rules for picking today's promo thread out of a timeline page.
use chrono::{DateTime, Datelike, TimeZone};

use crate::vc::types::Entry;

/// Exact title of the weekly self-promo thread.
pub const PROMO_TITLE: &str = "Субботний самопиар на vc.ru";

/// Why an entry was, or was not, picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Matched,
    WrongDate,
    WrongTitle,
}

impl Verdict {
    pub fn reason(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::WrongDate => "wrong date",
            Self::WrongTitle => "title mismatch",
        }
    }
}

/// Classify `entry` against the calendar day of `now`, in `now`'s time zone.
///
/// The date check runs first, so an old post with the right title reports
/// `WrongDate`. Titles compare byte for byte.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use promo_social::vc::{classify, Entry, Verdict, PROMO_TITLE};
///
/// let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
/// let entry = Entry { id: 1, title: PROMO_TITLE.into(), timestamp: now.timestamp() - 3600 };
/// assert_eq!(classify(&entry, &now), Verdict::Matched);
/// ```
pub fn classify<Tz: TimeZone>(entry: &Entry, now: &DateTime<Tz>) -> Verdict {
    let Some(published) = local_time(entry.timestamp, &now.timezone()) else {
        return Verdict::WrongDate;
    };

    if published.year() != now.year() || published.ordinal() != now.ordinal() {
        return Verdict::WrongDate;
    }

    if entry.title != PROMO_TITLE {
        return Verdict::WrongTitle;
    }

    Verdict::Matched
}

/// Render `timestamp` in `tz`, or `None` when it is out of chrono's range.
pub fn local_time<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_opt(timestamp, 0).single()
}
