use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

/// Local wall-clock time of the daily reminder (no timezone attached;
/// the profile's fixed offset decides what "local" means).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderTime {
    pub hour: u32,
    pub minute: u32,
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub telegram_id: i64,
    /// Fixed offset from UTC in minutes, -840..=840.
    pub timezone_offset_min: i32,
    pub reminder_time: Option<ReminderTime>,
    /// Local calendar date of the last delivered reminder; the
    /// once-per-local-day idempotence marker.
    pub last_reminder_local_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// One user the reminder loop should notify, plus the local date to stamp
/// as delivered afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    pub telegram_id: i64,
    pub local_date: NaiveDate,
}
