use std::{fmt, sync::LazyLock};

use chrono::{NaiveTime, Timelike};
use regex::Regex;

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]{1,2}):([0-5][0-9])\s*(am|pm)?$").expect("Pattern is valid.")
});

static STRICT_24_HOUR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("Pattern is valid."));

/// Wall-clock time of a reminder with minute precision.
///
/// This is the canonical representation used for every scheduling comparison.
/// The 12-hour rendering is derived on demand so it can never drift from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderTime(NaiveTime);

impl ReminderTime {
    pub fn midnight() -> Self {
        Self(NaiveTime::default())
    }

    pub fn new(inner: NaiveTime) -> Self {
        let normalized_time = inner
            .with_nanosecond(0)
            .and_then(|t| t.with_second(0))
            .expect("Will never fail.");
        Self(normalized_time)
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn time(&self) -> &NaiveTime {
        &self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Zero-padded 24-hour `HH:MM`.
    pub fn canonical(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// 12-hour `H:MM AM|PM`, hour not padded.
    pub fn display(&self) -> String {
        let (hour12, meridiem) = to_12_hour(self.hour());
        format!("{}:{:02} {}", hour12, self.minute(), meridiem)
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Meridiem::Am => f.write_str("AM"),
            Meridiem::Pm => f.write_str("PM"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    Parsed,
    /// Input was empty or unrecognised and midnight was substituted.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedTime {
    pub time: ReminderTime,
    pub outcome: NormalizeOutcome,
}

impl NormalizedTime {
    pub fn fallback() -> Self {
        Self {
            time: ReminderTime::midnight(),
            outcome: NormalizeOutcome::Fallback,
        }
    }

    fn parsed(hour24: u32, minute: u32) -> Self {
        match ReminderTime::from_hm(hour24, minute) {
            Some(time) => Self {
                time,
                outcome: NormalizeOutcome::Parsed,
            },
            None => Self::fallback(),
        }
    }

    pub fn display(&self) -> String {
        self.time.display()
    }

    pub fn canonical(&self) -> String {
        self.time.canonical()
    }

    pub fn used_fallback(&self) -> bool {
        self.outcome == NormalizeOutcome::Fallback
    }
}

/// Maps a loosely formatted time string onto its canonical form.
///
/// Accepts `H:MM`/`HH:MM` with an optional case-insensitive `am`/`pm` suffix.
/// Never fails: empty or unrecognised input yields midnight tagged as
/// [`NormalizeOutcome::Fallback`].
pub fn normalize_time(raw: Option<&str>) -> NormalizedTime {
    let Some(trimmed) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return NormalizedTime::fallback();
    };

    let Some(captures) = TIME_PATTERN.captures(trimmed) else {
        return NormalizedTime::fallback();
    };

    let (Ok(hour), Ok(minute)) = (captures[1].parse::<u32>(), captures[2].parse::<u32>()) else {
        return NormalizedTime::fallback();
    };

    let meridiem = captures.get(3).map(|suffix| {
        if suffix.as_str().eq_ignore_ascii_case("pm") {
            Meridiem::Pm
        } else {
            Meridiem::Am
        }
    });

    let hour24 = match meridiem {
        Some(meridiem) => from_12_hour(wrap_to_12_hour(hour), meridiem),
        None if hour <= 23 => hour,
        None => from_12_hour(wrap_to_12_hour(hour), Meridiem::Am),
    };

    NormalizedTime::parsed(hour24, minute)
}

/// Strict `HH:MM` 24-hour check applied to user input before it reaches the store.
pub fn is_strict_24_hour(raw: &str) -> bool {
    STRICT_24_HOUR_PATTERN.is_match(raw)
}

fn wrap_to_12_hour(hour: u32) -> u32 {
    if hour == 0 { 12 } else { (hour - 1) % 12 + 1 }
}

fn from_12_hour(hour12: u32, meridiem: Meridiem) -> u32 {
    match meridiem {
        Meridiem::Am => hour12 % 12,
        Meridiem::Pm => hour12 % 12 + 12,
    }
}

fn to_12_hour(hour24: u32) -> (u32, Meridiem) {
    let meridiem = if hour24 >= 12 { Meridiem::Pm } else { Meridiem::Am };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    (hour12, meridiem)
}
