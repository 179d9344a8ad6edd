use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of the local wall-clock time reminders are matched against.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }
}

#[cfg(test)]
pub struct ManualClock {
    now: std::sync::Mutex<NaiveDateTime>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.lock() += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        self.now
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}
