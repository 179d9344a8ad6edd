use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use memoria_models::{
    reminder::{Reminder, ReminderId},
    time::ReminderTime,
};

/// Remembers which reminders already fired on the current day.
///
/// The day rolls over lazily: the first poll that observes a new date clears
/// the fired set. Firing is keyed by id and date only, so toggling a reminder
/// off and on again does not make it fire twice on the same day.
#[derive(Debug, Clone)]
pub struct DailyTriggerState {
    date: NaiveDate,
    fired: HashSet<ReminderId>,
}

impl DailyTriggerState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            fired: HashSet::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn has_fired(&self, id: &ReminderId) -> bool {
        self.fired.contains(id)
    }

    /// Returns the enabled reminders scheduled for the minute of `now` that
    /// have not fired yet today, and marks them as fired.
    pub fn due(&mut self, now: NaiveDateTime, reminders: &[Reminder]) -> Vec<Reminder> {
        let today = now.date();
        if today != self.date {
            log::debug!("Day rolled over from {} to {}", self.date, today);
            self.date = today;
            self.fired.clear();
        }

        let current = ReminderTime::new(now.time());
        let mut due = Vec::new();
        for reminder in reminders {
            if !reminder.enabled || reminder.time != current {
                continue;
            }

            if self.fired.insert(reminder.id.clone()) {
                due.push(reminder.clone());
            }
        }

        due
    }
}
