use memoria_models::{
    reminder::{Reminder, ReminderId},
    time::normalize_time,
};

/// Draft accepted by [`crate::ReminderRepository::add`]. The raw time is
/// normalised on insert, so any accepted spelling works here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub id: ReminderId,
    pub title: String,
    pub description: String,
    pub time: Option<String>,
    pub enabled: bool,
}

impl NewReminder {
    pub(crate) fn into_reminder(self) -> Reminder {
        let time = normalize_time(self.time.as_deref());
        if time.used_fallback() {
            log::debug!(
                "Time {:?} of reminder {} was not recognised, using midnight",
                self.time,
                self.id
            );
        }

        Reminder {
            id: self.id,
            title: self.title,
            description: self.description,
            time: time.time,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReminder {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time: Option<String>,
    pub enabled: Option<bool>,
}

impl UpdateReminder {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.time.is_none()
            && self.enabled.is_none()
    }

    pub(crate) fn apply_to(self, reminder: &mut Reminder) {
        if let Some(title) = self.title {
            reminder.title = title;
        }
        if let Some(description) = self.description {
            reminder.description = description;
        }
        if let Some(enabled) = self.enabled {
            reminder.enabled = enabled;
        }
        if let Some(raw_time) = self.time {
            reminder.time = normalize_time(Some(&raw_time)).time;
        }
    }
}
