use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use std::fmt;

/// Allowance added to every deadline before it counts as expired. The
/// hosted workflow tolerates the same lag, so the countdown shown here
/// and the upstream enforcement flip at the same instant. Keep the
/// trigger payload (`DeadlineTriggerPayload::grace_seconds`) on this
/// constant.
pub const GRACE_SECONDS: i64 = 60;

pub fn grace() -> Duration {
    Duration::seconds(GRACE_SECONDS)
}

// ==================================================
// ERRORS
// ==================================================

#[derive(Debug)]
pub enum DeadlineError {
    Empty,
    Unparseable(String),
    OutOfRange(String),
}

impl fmt::Display for DeadlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineError::Empty => write!(f, "deadline is empty"),
            DeadlineError::Unparseable(raw) => write!(f, "unparseable deadline: {:?}", raw),
            DeadlineError::OutOfRange(raw) => {
                write!(f, "deadline has no representable calendar date: {:?}", raw)
            }
        }
    }
}

impl std::error::Error for DeadlineError {}

// ==================================================
// PARSER
// ==================================================

/// Parses a server-supplied deadline string in either of the two shapes
/// the service writes: `YYYY-MM-DD HH:MM AM/PM` or `DD-MM-YYYY HH:MM AM/PM`.
/// The only disambiguator is the length of the first numeric run: 4
/// digits means year-first. Years below 1000 cannot be expressed in the
/// year-first shape without zero-padding — `999-03-21 ...` classifies as
/// day-first and is rejected (day 999).
pub fn parse_deadline(raw: &str) -> Result<NaiveDateTime, DeadlineError> {
    let tokens: Vec<&str> = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() < 5 {
        return parse_fallback(raw);
    }

    let nums = tokens[..5]
        .iter()
        .map(|t| t.parse::<u32>())
        .collect::<Result<Vec<u32>, _>>()
        .map_err(|_| DeadlineError::Unparseable(raw.to_string()))?;

    let (year, month, day, hour, minute) = if tokens[0].len() == 4 {
        (nums[0] as i32, nums[1], nums[2], nums[3], nums[4])
    } else {
        (nums[2] as i32, nums[1], nums[0], nums[3], nums[4])
    };

    let upper = raw.to_ascii_uppercase();
    let hour = if upper.contains("PM") && hour != 12 {
        hour + 12
    } else if upper.contains("AM") && hour == 12 {
        0
    } else {
        hour
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| DeadlineError::OutOfRange(raw.to_string()))
}

// Fewer than 5 numeric runs means the positional layout cannot apply —
// month-name dates and bare dates land here. A fixed set of unambiguous
// formats is tried; anything else is Invalid, never a defaulted date.
fn parse_fallback(raw: &str) -> Result<NaiveDateTime, DeadlineError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DeadlineError::Empty);
    }

    for fmt in ["%B %d, %Y %I:%M %p", "%B %d, %Y %H:%M", "%d %B %Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%B %d, %Y", "%d %B %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Ok(dt);
            }
        }
    }

    Err(DeadlineError::Unparseable(trimmed.to_string()))
}

/// Writes the year-first DeadlineString shape the update endpoint stores.
/// Round-trips through `parse_deadline` to the same calendar instant.
pub fn format_db_deadline(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %I:%M %p").to_string()
}

// ==================================================
// COUNTDOWN
// ==================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Expired,
    Active {
        hours: i64,
        minutes: i64,
        seconds: i64,
    },
}

impl Countdown {
    pub fn is_expired(&self) -> bool {
        matches!(self, Countdown::Expired)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Expired => write!(f, "Expired"),
            Countdown::Active {
                hours: 0,
                minutes,
                seconds,
            } => write!(f, "{}m {}s", minutes, seconds),
            Countdown::Active {
                hours,
                minutes,
                seconds,
            } => write!(f, "{}h {}m {}s", hours, minutes, seconds),
        }
    }
}

/// Time left until `parsed` (plus the grace allowance) as seen at `now`.
/// The boundary is inclusive: at the buffered instant itself the deadline
/// is already Expired.
pub fn remaining(parsed: NaiveDateTime, now: NaiveDateTime) -> Countdown {
    let diff = (parsed + grace()) - now;
    let secs = diff.num_seconds();

    if secs <= 0 {
        return Countdown::Expired;
    }

    Countdown::Active {
        hours: secs / 3600,
        minutes: (secs / 60) % 60,
        seconds: secs % 60,
    }
}

pub fn remaining_now(parsed: NaiveDateTime) -> Countdown {
    remaining(parsed, Local::now().naive_local())
}
