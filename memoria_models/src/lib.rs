pub mod reminder;
pub mod settings;
pub mod time;

pub use chrono;
pub use chrono_tz;
