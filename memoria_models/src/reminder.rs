use std::fmt;

use chrono::{DateTime, Utc};

use crate::time::ReminderTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderId(String);

impl ReminderId {
    pub fn new(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReminderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ReminderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub id: ReminderId,
    pub title: String,
    pub description: String,
    pub time: ReminderTime,
    pub enabled: bool,
}

impl Reminder {
    /// 24-hour `HH:MM` used for trigger matching.
    pub fn canonical_time(&self) -> String {
        self.time.canonical()
    }

    /// 12-hour rendering, e.g. `8:00 AM`.
    pub fn display_time(&self) -> String {
        self.time.display()
    }
}

/// Hands out millisecond-timestamp ids that are strictly increasing for the
/// lifetime of the generator, even when asked twice within one millisecond.
#[derive(Debug, Default)]
pub struct ReminderIdGenerator {
    last: i64,
}

impl ReminderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> ReminderId {
        let millis = now.timestamp_millis().max(self.last + 1);
        self.last = millis;
        ReminderId(millis.to_string())
    }
}
