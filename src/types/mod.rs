use chrono::{DateTime, Utc};

mod reminder;
pub use reminder::*;

/// One logged workout. Entries are append-only; only the most recent one
/// can be deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    pub id: i64,
    pub telegram_id: i64,
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight_kg: Option<f64>,
    /// Denormalized sets * reps * weight (2dp), 0 for bodyweight work.
    pub volume_kg: f64,
    pub template: Option<String>,
    pub notes: Option<String>,
    pub performed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub workouts: u32,
    pub total_reps: u64,
    pub total_volume_kg: f64,
    pub top_exercise: Option<String>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise: String,
    pub best_weight_kg: f64,
}
