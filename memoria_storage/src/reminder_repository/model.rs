use memoria_models::{
    reminder::{Reminder, ReminderId},
    time::normalize_time,
};
use serde::{Deserialize, Serialize};

/// On-disk shape of a single reminder inside the reminders blob.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredReminder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub time24: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
}

impl From<&Reminder> for StoredReminder {
    fn from(value: &Reminder) -> Self {
        Self {
            id: value.id.as_str().to_owned(),
            title: value.title.clone(),
            time: Some(value.display_time()),
            time24: Some(value.canonical_time()),
            description: Some(value.description.clone()),
            enabled: value.enabled,
        }
    }
}

impl From<StoredReminder> for Reminder {
    fn from(value: StoredReminder) -> Self {
        let raw_time = value.time.as_deref().or(value.time24.as_deref());
        let time = normalize_time(raw_time);
        if time.used_fallback() {
            log::warn!(
                "Stored reminder {} has unreadable time {:?}, defaulting to midnight",
                value.id,
                raw_time
            );
        }

        Self {
            id: ReminderId::new(value.id),
            title: value.title,
            description: value.description.unwrap_or_default(),
            time: time.time,
            enabled: value.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_time_wins_over_time24_when_both_are_present() {
        let stored: StoredReminder = serde_json::from_str(
            r#"{"id":"7","title":"Walk","time":"6:30 PM","time24":"06:30","description":"","enabled":true}"#,
        )
        .unwrap();

        let reminder = Reminder::from(stored);

        assert_eq!(reminder.canonical_time(), "18:30");
    }

    #[test]
    fn time24_is_used_when_display_time_is_missing() {
        let stored: StoredReminder =
            serde_json::from_str(r#"{"id":"7","title":"Walk","time24":"21:05"}"#).unwrap();

        let reminder = Reminder::from(stored);

        assert_eq!(reminder.canonical_time(), "21:05");
        assert_eq!(reminder.display_time(), "9:05 PM");
        assert_eq!(reminder.description, "");
        assert!(!reminder.enabled);
    }

    #[test]
    fn null_description_reads_as_empty() {
        let stored: StoredReminder = serde_json::from_str(
            r#"{"id":"3","title":"Walk","time":"07:00","description":null,"enabled":true}"#,
        )
        .unwrap();

        let reminder = Reminder::from(stored);

        assert_eq!(reminder.description, "");
        assert_eq!(reminder.canonical_time(), "07:00");
    }

    #[test]
    fn serialized_record_carries_both_time_forms() {
        let reminder = Reminder::from(StoredReminder {
            id: "1".to_owned(),
            title: "Take morning medication".to_owned(),
            time: Some("08:00".to_owned()),
            time24: None,
            description: Some("Blood pressure medication".to_owned()),
            enabled: true,
        });

        let json = serde_json::to_value(StoredReminder::from(&reminder)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "1",
                "title": "Take morning medication",
                "time": "8:00 AM",
                "time24": "08:00",
                "description": "Blood pressure medication",
                "enabled": true
            })
        );
    }
}
