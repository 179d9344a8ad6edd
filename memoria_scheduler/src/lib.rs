pub mod clock;
pub mod daily_trigger;
pub mod notifier;
pub mod trigger_scheduler;

pub use clock::{Clock, SystemClock};
pub use daily_trigger::DailyTriggerState;
pub use notifier::ReminderNotifier;
pub use trigger_scheduler::{DEFAULT_POLL_INTERVAL, TriggerScheduler, TriggerSchedulerHandle};
