use chrono::{DateTime, Utc};

/// Canonical `UTC±H[:MM]` form; round-trips through
/// `parse_utc_offset_to_minutes`.
pub fn format_utc_offset(minutes: i32) -> String {
    let sign = if minutes >= 0 { '+' } else { '-' };
    let absolute = minutes.abs();
    let hours = absolute / 60;
    let remainder = absolute % 60;
    if remainder != 0 {
        format!("UTC{sign}{hours}:{remainder:02}")
    } else {
        format!("UTC{sign}{hours}")
    }
}

pub fn format_weight(weight_kg: Option<f64>) -> String {
    match weight_kg {
        None => "bodyweight".to_string(),
        Some(weight) => format!("{weight:.1} kg"),
    }
}

pub fn format_volume(volume_kg: f64) -> String {
    format!("{volume_kg:.1} kg")
}

pub fn format_dt_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M UTC").to_string()
}
