use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::parsers::round_2dp;
use crate::types::{
    DueReminder, PersonalRecord, ReminderTime, UserProfile, WeeklyStats, WorkoutEntry,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS user_profiles (
    telegram_id              INTEGER PRIMARY KEY,
    timezone_offset_min      INTEGER NOT NULL DEFAULT 0,
    reminder_hour            INTEGER,
    reminder_minute          INTEGER,
    last_reminder_local_date TEXT,
    created_at               TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS workout_entries (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    telegram_id  INTEGER NOT NULL
                 REFERENCES user_profiles (telegram_id) ON DELETE CASCADE,
    exercise     TEXT NOT NULL,
    sets         INTEGER NOT NULL,
    reps         INTEGER NOT NULL,
    weight_kg    REAL,
    volume_kg    REAL NOT NULL DEFAULT 0,
    template     TEXT,
    notes        TEXT,
    performed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS ix_workout_entries_user_performed
    ON workout_entries (telegram_id, performed_at);
";

const ENTRY_SELECT: &str = "SELECT id, telegram_id, exercise, sets, reps, weight_kg, volume_kg, \
                            template, notes, performed_at FROM workout_entries";

const PROFILE_SELECT: &str = "SELECT telegram_id, timezone_offset_min, reminder_hour, \
                              reminder_minute, last_reminder_local_date, created_at \
                              FROM user_profiles";

/// SQLite-backed record store. Every operation takes the connection lock
/// for one short statement batch; nothing holds it across user turns.
pub struct WorkoutStore {
    conn: Mutex<Connection>,
}

impl WorkoutStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts the profile row if it does not exist yet.
    pub async fn ensure_profile(&self, telegram_id: i64) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        insert_profile_if_absent(&conn, telegram_id)?;
        Ok(())
    }

    pub async fn profile(&self, telegram_id: i64) -> Result<Option<UserProfile>, StoreError> {
        let conn = self.conn.lock().await;
        let profile = conn
            .query_row(
                &format!("{PROFILE_SELECT} WHERE telegram_id = ?1"),
                params![telegram_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    pub async fn create_workout(
        &self,
        telegram_id: i64,
        exercise: &str,
        sets: u32,
        reps: u32,
        weight_kg: Option<f64>,
        template: Option<&str>,
        notes: Option<&str>,
    ) -> Result<WorkoutEntry, StoreError> {
        self.create_workout_at(
            telegram_id,
            exercise,
            sets,
            reps,
            weight_kg,
            template,
            notes,
            Utc::now(),
        )
        .await
    }

    /// Same as `create_workout` with an explicit timestamp (backdated
    /// entries and deterministic tests).
    #[allow(clippy::too_many_arguments)]
    pub async fn create_workout_at(
        &self,
        telegram_id: i64,
        exercise: &str,
        sets: u32,
        reps: u32,
        weight_kg: Option<f64>,
        template: Option<&str>,
        notes: Option<&str>,
        performed_at: DateTime<Utc>,
    ) -> Result<WorkoutEntry, StoreError> {
        let volume_kg = match weight_kg {
            Some(weight) => round_2dp(f64::from(sets) * f64::from(reps) * weight),
            None => 0.0,
        };

        let conn = self.conn.lock().await;
        insert_profile_if_absent(&conn, telegram_id)?;
        conn.execute(
            "INSERT INTO workout_entries (telegram_id, exercise, sets, reps, weight_kg, \
             volume_kg, template, notes, performed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                telegram_id,
                exercise,
                sets,
                reps,
                weight_kg,
                volume_kg,
                template,
                notes,
                performed_at
            ],
        )?;

        Ok(WorkoutEntry {
            id: conn.last_insert_rowid(),
            telegram_id,
            exercise: exercise.to_string(),
            sets,
            reps,
            weight_kg,
            volume_kg,
            template: template.map(str::to_string),
            notes: notes.map(str::to_string),
            performed_at,
        })
    }

    /// Most recent first; same-instant entries fall back to insertion order.
    pub async fn recent_workouts(
        &self,
        telegram_id: i64,
        limit: u32,
    ) -> Result<Vec<WorkoutEntry>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "{ENTRY_SELECT} WHERE telegram_id = ?1 \
             ORDER BY performed_at DESC, id DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![telegram_id, limit], entry_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Deletes the single most recent entry; false when there is none.
    pub async fn delete_last_workout(&self, telegram_id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let latest: Option<i64> = conn
            .query_row(
                "SELECT id FROM workout_entries WHERE telegram_id = ?1 \
                 ORDER BY performed_at DESC, id DESC LIMIT 1",
                params![telegram_id],
                |row| row.get(0),
            )
            .optional()?;

        match latest {
            None => Ok(false),
            Some(id) => {
                conn.execute("DELETE FROM workout_entries WHERE id = ?1", params![id])?;
                Ok(true)
            }
        }
    }

    /// Aggregates over [start of day six days before `now`, `now`],
    /// both ends inclusive.
    pub async fn weekly_stats(
        &self,
        telegram_id: i64,
        now_utc: DateTime<Utc>,
    ) -> Result<WeeklyStats, StoreError> {
        let window_start = start_of_day(now_utc - Duration::days(6));

        let workouts = {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(&format!(
                "{ENTRY_SELECT} WHERE telegram_id = ?1 \
                 AND performed_at >= ?2 AND performed_at <= ?3 \
                 ORDER BY performed_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map(params![telegram_id, window_start, now_utc], entry_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        if workouts.is_empty() {
            return Ok(WeeklyStats {
                workouts: 0,
                total_reps: 0,
                total_volume_kg: 0.0,
                top_exercise: None,
                window_start,
                window_end: now_utc,
            });
        }

        let total_reps: u64 = workouts
            .iter()
            .map(|entry| u64::from(entry.sets) * u64::from(entry.reps))
            .sum();
        let total_volume_kg = round_2dp(workouts.iter().map(|entry| entry.volume_kg).sum());

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in &workouts {
            *counts.entry(entry.exercise.as_str()).or_insert(0) += 1;
        }
        // Ties go to the exercise encountered first in most-recent-first order.
        let mut top_exercise: Option<&str> = None;
        let mut top_count = 0usize;
        for entry in &workouts {
            let count = counts[entry.exercise.as_str()];
            if count > top_count {
                top_count = count;
                top_exercise = Some(entry.exercise.as_str());
            }
        }

        Ok(WeeklyStats {
            workouts: workouts.len() as u32,
            total_reps,
            total_volume_kg,
            top_exercise: top_exercise.map(str::to_string),
            window_start,
            window_end: now_utc,
        })
    }

    /// Best recorded weight per exercise, heaviest first, name as tiebreak.
    pub async fn personal_records(
        &self,
        telegram_id: i64,
        limit: u32,
    ) -> Result<Vec<PersonalRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT exercise, MAX(weight_kg) AS best_weight FROM workout_entries \
             WHERE telegram_id = ?1 AND weight_kg IS NOT NULL \
             GROUP BY exercise ORDER BY best_weight DESC, exercise ASC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![telegram_id, limit], |row| {
            Ok(PersonalRecord {
                exercise: row.get(0)?,
                best_weight_kg: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Full history as CSV, most recent first; `None` when the user has
    /// no entries at all.
    pub async fn export_csv_bytes(&self, telegram_id: i64) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = {
            let conn = self.conn.lock().await;
            let mut stmt = conn.prepare(&format!(
                "{ENTRY_SELECT} WHERE telegram_id = ?1 ORDER BY performed_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map(params![telegram_id], entry_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        if entries.is_empty() {
            return Ok(None);
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in &entries {
            writer.serialize(ExportRow {
                performed_at_utc: entry.performed_at.to_rfc3339(),
                exercise: &entry.exercise,
                sets: entry.sets,
                reps: entry.reps,
                weight_kg: entry.weight_kg,
                volume_kg: entry.volume_kg,
                template: entry.template.as_deref(),
                notes: entry.notes.as_deref(),
            })?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| StoreError::Io(err.into_error()))?;
        Ok(Some(bytes))
    }

    /// Stores the reminder config and clears the delivered marker, so a
    /// reminder reconfigured for today can still fire today.
    pub async fn set_reminder(
        &self,
        telegram_id: i64,
        offset_minutes: i32,
        time: ReminderTime,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        insert_profile_if_absent(&conn, telegram_id)?;
        conn.execute(
            "UPDATE user_profiles SET timezone_offset_min = ?2, reminder_hour = ?3, \
             reminder_minute = ?4, last_reminder_local_date = NULL WHERE telegram_id = ?1",
            params![telegram_id, offset_minutes, time.hour, time.minute],
        )?;
        Ok(())
    }

    /// Clears the reminder; false when none was active.
    pub async fn disable_reminder(&self, telegram_id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.lock().await;
        let active: Option<bool> = conn
            .query_row(
                "SELECT reminder_hour IS NOT NULL FROM user_profiles WHERE telegram_id = ?1",
                params![telegram_id],
                |row| row.get(0),
            )
            .optional()?;

        if !matches!(active, Some(true)) {
            return Ok(false);
        }

        conn.execute(
            "UPDATE user_profiles SET reminder_hour = NULL, reminder_minute = NULL, \
             last_reminder_local_date = NULL WHERE telegram_id = ?1",
            params![telegram_id],
        )?;
        Ok(true)
    }

    /// Stamps the delivery date; idempotent for repeated calls with the
    /// same date.
    pub async fn mark_reminded(
        &self,
        telegram_id: i64,
        local_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "UPDATE user_profiles SET last_reminder_local_date = ?2 WHERE telegram_id = ?1",
            params![telegram_id, local_date],
        )?;
        Ok(())
    }

    /// All profiles with a configured reminder time.
    pub async fn reminder_profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!("{PROFILE_SELECT} WHERE reminder_hour IS NOT NULL"))?;
        let rows = stmt.query_map([], profile_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn find_due_reminders(
        &self,
        now_utc: DateTime<Utc>,
    ) -> Result<Vec<DueReminder>, StoreError> {
        let profiles = self.reminder_profiles().await?;
        Ok(due_reminders_at(&profiles, now_utc))
    }
}

/// Pure due computation: a profile is due when its local wall clock matches
/// the configured hour/minute exactly and no delivery happened yet on that
/// local calendar date. `now_utc` is expected truncated to the minute.
pub fn due_reminders_at(profiles: &[UserProfile], now_utc: DateTime<Utc>) -> Vec<DueReminder> {
    let mut due = Vec::new();
    for profile in profiles {
        let Some(time) = profile.reminder_time else {
            continue;
        };

        let local_now = now_utc + Duration::minutes(i64::from(profile.timezone_offset_min));
        if local_now.hour() != time.hour || local_now.minute() != time.minute {
            continue;
        }

        let local_date = local_now.date_naive();
        if profile.last_reminder_local_date == Some(local_date) {
            continue;
        }

        due.push(DueReminder {
            telegram_id: profile.telegram_id,
            local_date,
        });
    }
    due
}

pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(instant)
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn insert_profile_if_absent(conn: &Connection, telegram_id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO user_profiles (telegram_id, created_at) VALUES (?1, ?2)",
        params![telegram_id, Utc::now()],
    )?;
    Ok(())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<WorkoutEntry> {
    Ok(WorkoutEntry {
        id: row.get(0)?,
        telegram_id: row.get(1)?,
        exercise: row.get(2)?,
        sets: row.get(3)?,
        reps: row.get(4)?,
        weight_kg: row.get(5)?,
        volume_kg: row.get(6)?,
        template: row.get(7)?,
        notes: row.get(8)?,
        performed_at: row.get(9)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let hour: Option<u32> = row.get(2)?;
    let minute: Option<u32> = row.get(3)?;
    let reminder_time = match (hour, minute) {
        (Some(hour), Some(minute)) => Some(ReminderTime { hour, minute }),
        _ => None,
    };

    Ok(UserProfile {
        telegram_id: row.get(0)?,
        timezone_offset_min: row.get(1)?,
        reminder_time,
        last_reminder_local_date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[derive(Serialize)]
struct ExportRow<'a> {
    performed_at_utc: String,
    exercise: &'a str,
    sets: u32,
    reps: u32,
    weight_kg: Option<f64>,
    volume_kg: f64,
    template: Option<&'a str>,
    notes: Option<&'a str>,
}
