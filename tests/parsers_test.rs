use gym_progress_bot::*;

#[test]
fn test_parse_positive_int_bounds() {
    assert_eq!(parse_positive_int("12", 1, 100), Some(12));
    assert_eq!(parse_positive_int(" 7 ", 1, 100), Some(7));
    assert_eq!(parse_positive_int("1", 1, 100), Some(1));
    assert_eq!(parse_positive_int("100", 1, 100), Some(100));

    assert_eq!(parse_positive_int("0", 1, 100), None);
    assert_eq!(parse_positive_int("101", 1, 100), None);
    assert_eq!(parse_positive_int("abc", 1, 100), None);
    assert_eq!(parse_positive_int("-3", 1, 100), None);
    assert_eq!(parse_positive_int("1e2", 1, 100), None);
    assert_eq!(parse_positive_int("3.5", 1, 100), None);
    assert_eq!(parse_positive_int("", 1, 100), None);
}

#[test]
fn test_parse_optional_weight() {
    assert_eq!(parse_optional_weight("-"), (true, None));
    assert_eq!(parse_optional_weight("skip"), (true, None));
    assert_eq!(parse_optional_weight("NONE"), (true, None));
    assert_eq!(parse_optional_weight("no"), (true, None));

    assert_eq!(parse_optional_weight("80"), (true, Some(80.0)));
    assert_eq!(parse_optional_weight("80,5"), (true, Some(80.5)));
    assert_eq!(parse_optional_weight("60.5"), (true, Some(60.5)));
    assert_eq!(parse_optional_weight("2000"), (true, Some(2000.0)));
    // Rounded to two decimals.
    assert_eq!(parse_optional_weight("80.555"), (true, Some(80.56)));

    assert_eq!(parse_optional_weight("-10"), (false, None));
    assert_eq!(parse_optional_weight("0"), (false, None));
    assert_eq!(parse_optional_weight("2000.01"), (false, None));
    assert_eq!(parse_optional_weight("heavy"), (false, None));
    assert_eq!(parse_optional_weight("nan"), (false, None));
    assert_eq!(parse_optional_weight("inf"), (false, None));
}

#[test]
fn test_parse_utc_offset_to_minutes() {
    assert_eq!(parse_utc_offset_to_minutes("UTC+3"), Some(180));
    assert_eq!(parse_utc_offset_to_minutes("utc-5:30"), Some(-330));
    assert_eq!(parse_utc_offset_to_minutes("+2"), Some(120));
    assert_eq!(parse_utc_offset_to_minutes("UTC + 2"), Some(120));
    assert_eq!(parse_utc_offset_to_minutes("+530"), Some(330));
    assert_eq!(parse_utc_offset_to_minutes("+0530"), Some(330));
    assert_eq!(parse_utc_offset_to_minutes("UTC+14"), Some(840));
    assert_eq!(parse_utc_offset_to_minutes("UTC-14"), Some(-840));
    assert_eq!(parse_utc_offset_to_minutes("+0"), Some(0));

    assert_eq!(parse_utc_offset_to_minutes("UTC+99"), None);
    assert_eq!(parse_utc_offset_to_minutes("UTC+15"), None);
    assert_eq!(parse_utc_offset_to_minutes("UTC+2:60"), None);
    assert_eq!(parse_utc_offset_to_minutes("UTC+2:5"), None);
    assert_eq!(parse_utc_offset_to_minutes("UTC5"), None);
    assert_eq!(parse_utc_offset_to_minutes("5:30"), None);
    assert_eq!(parse_utc_offset_to_minutes("UTC+"), None);
    assert_eq!(parse_utc_offset_to_minutes(""), None);
}

#[test]
fn test_offset_round_trip() {
    for minutes in [330, 120, -330, 0, 840, -840, 45, -45] {
        let canonical = format_utc_offset(minutes);
        assert_eq!(
            parse_utc_offset_to_minutes(&canonical),
            Some(minutes),
            "round trip failed for {canonical}"
        );
    }

    assert_eq!(format_utc_offset(330), "UTC+5:30");
    assert_eq!(format_utc_offset(120), "UTC+2");
    assert_eq!(format_utc_offset(-330), "UTC-5:30");
    assert_eq!(format_utc_offset(0), "UTC+0");
}

#[test]
fn test_parse_hhmm() {
    assert_eq!(
        parse_hhmm("07:45"),
        Some(ReminderTime { hour: 7, minute: 45 })
    );
    assert_eq!(parse_hhmm("7:5"), Some(ReminderTime { hour: 7, minute: 5 }));
    assert_eq!(
        parse_hhmm("23:59"),
        Some(ReminderTime { hour: 23, minute: 59 })
    );
    assert_eq!(parse_hhmm("00:00"), Some(ReminderTime { hour: 0, minute: 0 }));

    assert_eq!(parse_hhmm("25:10"), None);
    assert_eq!(parse_hhmm("07:60"), None);
    assert_eq!(parse_hhmm("0745"), None);
    assert_eq!(parse_hhmm("aa:bb"), None);
    assert_eq!(parse_hhmm("7:45:30"), None);
    assert_eq!(parse_hhmm(""), None);
}

#[test]
fn test_normalize_optional_text() {
    assert_eq!(
        normalize_optional_text("  hello  ", 20),
        Some("hello".to_string())
    );
    assert_eq!(normalize_optional_text("-", 20), None);
    assert_eq!(normalize_optional_text("", 20), None);
    assert_eq!(normalize_optional_text("   ", 20), None);
    assert_eq!(
        normalize_optional_text(&"a".repeat(300), 10),
        Some("a".repeat(10))
    );
}

#[test]
fn test_format_helpers() {
    assert_eq!(format_weight(None), "bodyweight");
    assert_eq!(format_weight(Some(80.5)), "80.5 kg");
    assert_eq!(format_volume(1800.0), "1800.0 kg");
}
