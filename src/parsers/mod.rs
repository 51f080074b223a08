//! Pure input parsing for the guided flows. Malformed input is an `Option`
//! miss (or a `false` flag for weights), never an error.

use crate::types::ReminderTime;

pub fn parse_positive_int(value: &str, min_value: u32, max_value: u32) -> Option<u32> {
    let text = value.trim();
    if !is_digits(text) {
        return None;
    }

    let parsed: u32 = text.parse().ok()?;
    if parsed < min_value || parsed > max_value {
        return None;
    }

    Some(parsed)
}

/// Returns `(accepted, weight)`. The tokens `-`, `skip`, `none` and `no`
/// are accepted as "explicitly bodyweight"; otherwise the text must be a
/// decimal number (comma allowed as separator) in (0, 2000], rounded to 2dp.
pub fn parse_optional_weight(value: &str) -> (bool, Option<f64>) {
    let text = value.trim().to_lowercase().replace(',', ".");
    if matches!(text.as_str(), "-" | "skip" | "none" | "no") {
        return (true, None);
    }

    let parsed: f64 = match text.parse() {
        Ok(parsed) => parsed,
        Err(_) => return (false, None),
    };

    if !parsed.is_finite() || parsed <= 0.0 || parsed > 2000.0 {
        return (false, None);
    }

    (true, Some(round_2dp(parsed)))
}

/// Parses `[UTC]±H[:MM]` (case-insensitive prefix, mandatory sign) into
/// signed minutes. Compact forms like `+530` and `+0530` read as H:MM.
pub fn parse_utc_offset_to_minutes(value: &str) -> Option<i32> {
    let mut rest = value.trim();
    if let Some(prefix) = rest.get(..3) {
        if prefix.eq_ignore_ascii_case("utc") {
            rest = rest[3..].trim_start();
        }
    }

    let sign = match rest.chars().next()? {
        '+' => 1,
        '-' => -1,
        _ => return None,
    };
    rest = rest[1..].trim_start();

    let (hours, minutes): (i32, i32) = match rest.split_once(':') {
        Some((hours_raw, minutes_raw)) => {
            if hours_raw.is_empty()
                || hours_raw.len() > 2
                || !is_digits(hours_raw)
                || minutes_raw.len() != 2
                || !is_digits(minutes_raw)
            {
                return None;
            }
            (hours_raw.parse().ok()?, minutes_raw.parse().ok()?)
        }
        None => {
            if !is_digits(rest) {
                return None;
            }
            match rest.len() {
                1 | 2 => (rest.parse().ok()?, 0),
                3 | 4 => {
                    let split = rest.len() - 2;
                    (rest[..split].parse().ok()?, rest[split..].parse().ok()?)
                }
                _ => return None,
            }
        }
    };

    if hours > 14 || minutes >= 60 {
        return None;
    }

    Some(sign * (hours * 60 + minutes))
}

pub fn parse_hhmm(value: &str) -> Option<ReminderTime> {
    let text = value.trim();
    let (hour_raw, minute_raw) = text.split_once(':')?;
    if !is_digits(hour_raw) || !is_digits(minute_raw) {
        return None;
    }

    let hour: u32 = hour_raw.parse().ok()?;
    let minute: u32 = minute_raw.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    Some(ReminderTime { hour, minute })
}

/// Trims free text; `""` and `-` mean absent; anything longer than
/// `max_len` characters is truncated silently.
pub fn normalize_optional_text(value: &str, max_len: usize) -> Option<String> {
    let text = value.trim();
    if text.is_empty() || text == "-" {
        return None;
    }

    Some(text.chars().take(max_len).collect())
}

pub fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit())
}
