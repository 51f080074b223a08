use chrono::{Duration, NaiveDate, TimeZone, Utc};
use gym_progress_bot::*;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[tokio::test]
async fn test_open_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("workouts.db");
    let store = WorkoutStore::open(&path).unwrap();

    store.ensure_profile(1).await.unwrap();
    assert!(path.exists());
    assert!(store.profile(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_ensure_profile_is_idempotent() {
    let store = WorkoutStore::open_in_memory().unwrap();

    store.ensure_profile(42).await.unwrap();
    let first = store.profile(42).await.unwrap().unwrap();

    store.ensure_profile(42).await.unwrap();
    let second = store.profile(42).await.unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.timezone_offset_min, 0);
    assert_eq!(first.reminder_time, None);
}

#[tokio::test]
async fn test_create_workout_volume_invariant() {
    let store = WorkoutStore::open_in_memory().unwrap();

    let weighted = store
        .create_workout(1, "Bench Press", 3, 10, Some(60.0), None, None)
        .await
        .unwrap();
    assert_eq!(weighted.volume_kg, 1800.0);

    let bodyweight = store
        .create_workout(1, "Pull Ups", 4, 12, None, None, None)
        .await
        .unwrap();
    assert_eq!(bodyweight.volume_kg, 0.0);

    let fractional = store
        .create_workout(1, "Row", 3, 10, Some(60.333), None, None)
        .await
        .unwrap();
    assert!((fractional.volume_kg - 1809.99).abs() < 1e-9);
}

#[tokio::test]
async fn test_recent_and_delete_last_ordering() {
    let store = WorkoutStore::open_in_memory().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

    // Same timestamp on purpose: insertion order must break the tie.
    let first = store
        .create_workout_at(7, "Squat", 3, 5, Some(100.0), None, None, at)
        .await
        .unwrap();
    let second = store
        .create_workout_at(7, "Bench", 3, 5, Some(80.0), None, None, at)
        .await
        .unwrap();
    let third = store
        .create_workout_at(7, "Deadlift", 1, 5, Some(140.0), None, None, at + Duration::hours(1))
        .await
        .unwrap();

    let rows = store.recent_workouts(7, 10).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let rows = store.recent_workouts(7, 2).await.unwrap();
    assert_eq!(rows.len(), 2);

    assert!(store.delete_last_workout(7).await.unwrap());
    let rows = store.recent_workouts(7, 10).await.unwrap();
    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    assert!(store.delete_last_workout(7).await.unwrap());
    assert!(store.delete_last_workout(7).await.unwrap());
    assert!(!store.delete_last_workout(7).await.unwrap());
}

#[tokio::test]
async fn test_weekly_stats_window_boundaries() {
    let store = WorkoutStore::open_in_memory().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
    // Window starts at 2024-01-04 00:00:00 UTC.
    let lower_bound = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();

    store
        .create_workout_at(1, "At Bound", 2, 10, Some(50.0), None, None, lower_bound)
        .await
        .unwrap();
    store
        .create_workout_at(
            1,
            "Too Old",
            2,
            10,
            Some(50.0),
            None,
            None,
            lower_bound - Duration::microseconds(1),
        )
        .await
        .unwrap();
    store
        .create_workout_at(1, "At Now", 3, 10, Some(60.0), None, None, now)
        .await
        .unwrap();
    store
        .create_workout_at(1, "Future", 3, 10, Some(60.0), None, None, now + Duration::seconds(1))
        .await
        .unwrap();

    let stats = store.weekly_stats(1, now).await.unwrap();
    assert_eq!(stats.workouts, 2);
    assert_eq!(stats.total_reps, 2 * 10 + 3 * 10);
    assert_eq!(stats.total_volume_kg, 1000.0 + 1800.0);
    assert_eq!(stats.window_start, lower_bound);
    assert_eq!(stats.window_end, now);
}

#[tokio::test]
async fn test_weekly_stats_top_exercise_tiebreak() {
    let store = WorkoutStore::open_in_memory().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    store
        .create_workout_at(1, "Older", 3, 10, None, None, None, now - Duration::hours(2))
        .await
        .unwrap();
    store
        .create_workout_at(1, "Newer", 3, 10, None, None, None, now - Duration::hours(1))
        .await
        .unwrap();

    // Both appear once; the most recent one wins the tie.
    let stats = store.weekly_stats(1, now).await.unwrap();
    assert_eq!(stats.top_exercise.as_deref(), Some("Newer"));

    store
        .create_workout_at(1, "Older", 3, 10, None, None, None, now - Duration::hours(3))
        .await
        .unwrap();
    let stats = store.weekly_stats(1, now).await.unwrap();
    assert_eq!(stats.top_exercise.as_deref(), Some("Older"));
}

#[tokio::test]
async fn test_weekly_stats_empty() {
    let store = WorkoutStore::open_in_memory().unwrap();
    let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();

    let stats = store.weekly_stats(1, now).await.unwrap();
    assert_eq!(stats.workouts, 0);
    assert_eq!(stats.total_reps, 0);
    assert_eq!(stats.total_volume_kg, 0.0);
    assert_eq!(stats.top_exercise, None);
}

#[tokio::test]
async fn test_personal_records_ordering() {
    let store = WorkoutStore::open_in_memory().unwrap();

    store
        .create_workout(1, "Bench Press", 3, 10, Some(60.0), None, None)
        .await
        .unwrap();
    store
        .create_workout(1, "Bench Press", 3, 5, Some(80.0), None, None)
        .await
        .unwrap();
    store
        .create_workout(1, "Squat", 3, 5, Some(80.0), None, None)
        .await
        .unwrap();
    // Bodyweight entries never produce a record.
    store
        .create_workout(1, "Pull Ups", 4, 12, None, None, None)
        .await
        .unwrap();

    let records = store.personal_records(1, 7).await.unwrap();
    assert_eq!(
        records,
        vec![
            PersonalRecord {
                exercise: "Bench Press".to_string(),
                best_weight_kg: 80.0,
            },
            PersonalRecord {
                exercise: "Squat".to_string(),
                best_weight_kg: 80.0,
            },
        ]
    );

    let records = store.personal_records(1, 1).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].exercise, "Bench Press");
}

#[tokio::test]
async fn test_export_csv_shape() {
    let store = WorkoutStore::open_in_memory().unwrap();

    assert!(store.export_csv_bytes(1).await.unwrap().is_none());

    let at = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
    store
        .create_workout_at(1, "Bench Press", 3, 10, Some(60.0), None, None, at)
        .await
        .unwrap();

    let bytes = store.export_csv_bytes(1).await.unwrap().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "performed_at_utc,exercise,sets,reps,weight_kg,volume_kg,template,notes"
    );
    assert_eq!(
        lines[1],
        "2024-01-01T07:00:00+00:00,Bench Press,3,10,60.0,1800.0,,"
    );
}

#[tokio::test]
async fn test_export_csv_is_most_recent_first() {
    let store = WorkoutStore::open_in_memory().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();

    store
        .create_workout_at(1, "First", 3, 10, None, Some("Push Day"), Some("ok"), at)
        .await
        .unwrap();
    store
        .create_workout_at(1, "Second", 3, 10, None, None, None, at + Duration::hours(1))
        .await
        .unwrap();

    let bytes = store.export_csv_bytes(1).await.unwrap().unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Second"));
    assert!(lines[2].contains("First"));
    assert!(lines[2].ends_with("Push Day,ok"));
}

#[tokio::test]
async fn test_set_reminder_resets_delivery_marker() {
    let store = WorkoutStore::open_in_memory().unwrap();
    let time = ReminderTime { hour: 7, minute: 0 };

    store.set_reminder(5, 180, time).await.unwrap();
    let profile = store.profile(5).await.unwrap().unwrap();
    assert_eq!(profile.timezone_offset_min, 180);
    assert_eq!(profile.reminder_time, Some(time));
    assert_eq!(profile.last_reminder_local_date, None);

    store.mark_reminded(5, date(2024, 1, 1)).await.unwrap();
    let profile = store.profile(5).await.unwrap().unwrap();
    assert_eq!(profile.last_reminder_local_date, Some(date(2024, 1, 1)));

    // Reconfiguring clears the marker so today's reminder can still fire.
    store.set_reminder(5, 180, time).await.unwrap();
    let profile = store.profile(5).await.unwrap().unwrap();
    assert_eq!(profile.last_reminder_local_date, None);
}

#[tokio::test]
async fn test_disable_reminder() {
    let store = WorkoutStore::open_in_memory().unwrap();

    assert!(!store.disable_reminder(5).await.unwrap());

    store
        .set_reminder(5, 0, ReminderTime { hour: 7, minute: 0 })
        .await
        .unwrap();
    assert!(store.disable_reminder(5).await.unwrap());
    assert!(!store.disable_reminder(5).await.unwrap());

    let profile = store.profile(5).await.unwrap().unwrap();
    assert_eq!(profile.reminder_time, None);
    assert_eq!(profile.last_reminder_local_date, None);
}

#[test]
fn test_due_computation_offsets() {
    let profile = |offset: i32, hour: u32, minute: u32| UserProfile {
        telegram_id: 1,
        timezone_offset_min: offset,
        reminder_time: Some(ReminderTime { hour, minute }),
        last_reminder_local_date: None,
        created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
    };

    // UTC+5:30, reminder 18:30 local -> due at 13:00 UTC.
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
    let due = due_reminders_at(&[profile(330, 18, 30)], now);
    assert_eq!(
        due,
        vec![DueReminder {
            telegram_id: 1,
            local_date: date(2024, 1, 1),
        }]
    );

    // Local date lags UTC for negative offsets across midnight.
    let now = Utc.with_ymd_and_hms(2024, 1, 2, 1, 30, 0).unwrap();
    let due = due_reminders_at(&[profile(-120, 23, 30)], now);
    assert_eq!(due[0].local_date, date(2024, 1, 1));

    // Minute mismatch -> not due.
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 13, 1, 0).unwrap();
    assert!(due_reminders_at(&[profile(330, 18, 30)], now).is_empty());
}

#[test]
fn test_due_computation_respects_delivery_marker() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
    let mut profile = UserProfile {
        telegram_id: 9,
        timezone_offset_min: 0,
        reminder_time: Some(ReminderTime { hour: 7, minute: 0 }),
        last_reminder_local_date: Some(date(2024, 1, 1)),
        created_at: now,
    };

    assert!(due_reminders_at(&[profile.clone()], now).is_empty());

    profile.last_reminder_local_date = Some(date(2023, 12, 31));
    assert_eq!(due_reminders_at(&[profile], now).len(), 1);
}

#[tokio::test]
async fn test_due_reminders_end_to_end() {
    let store = WorkoutStore::open_in_memory().unwrap();
    store
        .set_reminder(3, 0, ReminderTime { hour: 7, minute: 0 })
        .await
        .unwrap();

    let jan1 = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap();
    let due = store.find_due_reminders(jan1).await.unwrap();
    assert_eq!(
        due,
        vec![DueReminder {
            telegram_id: 3,
            local_date: date(2024, 1, 1),
        }]
    );

    store.mark_reminded(3, date(2024, 1, 1)).await.unwrap();
    // Marking twice with the same date is harmless.
    store.mark_reminded(3, date(2024, 1, 1)).await.unwrap();

    assert!(store.find_due_reminders(jan1).await.unwrap().is_empty());
    let jan1_0701 = Utc.with_ymd_and_hms(2024, 1, 1, 7, 1, 0).unwrap();
    assert!(store.find_due_reminders(jan1_0701).await.unwrap().is_empty());

    let jan2 = Utc.with_ymd_and_hms(2024, 1, 2, 7, 0, 0).unwrap();
    let due = store.find_due_reminders(jan2).await.unwrap();
    assert_eq!(due[0].local_date, date(2024, 1, 2));
}

#[test]
fn test_truncate_to_minute() {
    let instant = Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 59).unwrap();
    assert_eq!(
        truncate_to_minute(instant),
        Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap()
    );
}
