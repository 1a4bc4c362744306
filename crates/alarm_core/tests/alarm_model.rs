use alarm_core::{Alarm, AlarmId, AlarmValidationError, FireTime};
use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike};
use std::collections::HashSet;

#[test]
fn alarm_new_sets_defaults() {
    let alarm = Alarm::new(FireTime::new(25_200).unwrap(), "Wake up");

    assert!(!alarm.id().as_str().is_empty());
    assert_eq!(alarm.name(), "Wake up");
    assert_eq!(alarm.fire_time().seconds(), 25_200);
    assert!(alarm.is_enabled());
}

#[test]
fn alarm_ids_are_unique() {
    let ids: HashSet<AlarmId> = (0..64)
        .map(|_| Alarm::new(FireTime::MIDNIGHT, "x").id().clone())
        .collect();
    assert_eq!(ids.len(), 64);
}

#[test]
fn equality_is_identifier_based() {
    let id = AlarmId::parse("alarm-1").unwrap();
    let morning = Alarm::with_id(id.clone(), FireTime::new(25_200).unwrap(), "morning");
    let evening = Alarm::with_id(id, FireTime::new(72_000).unwrap(), "evening");
    let other = Alarm::new(FireTime::new(25_200).unwrap(), "morning");

    assert_eq!(morning, evening);
    assert_ne!(morning, other);
}

#[test]
fn fire_time_rejects_full_day_and_wraps_signed_offsets() {
    assert_eq!(
        FireTime::new(86_400).unwrap_err(),
        AlarmValidationError::FireTimeOutOfRange(86_400)
    );
    assert_eq!(FireTime::new(86_399).unwrap().seconds(), 86_399);
    assert_eq!(FireTime::wrapping(-3_600).seconds(), 82_800);
    assert_eq!(FireTime::wrapping(90_000).seconds(), 3_600);
    assert_eq!(FireTime::wrapping(25_200).seconds(), 25_200);
    assert_eq!(FireTime::from_hms(7, 30, 0).unwrap().seconds(), 27_000);
}

#[test]
fn alarm_id_parse_rejects_blank() {
    assert_eq!(AlarmId::parse("  ").unwrap_err(), AlarmValidationError::EmptyId);
    assert_eq!(AlarmId::parse(" abc ").unwrap().as_str(), "abc");
}

#[test]
fn fire_date_from_adds_offset_to_start_of_day() {
    let zone = FixedOffset::east_opt(2 * 3600).unwrap();
    let start = zone
        .from_local_datetime(
            &NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
        .single()
        .unwrap();
    let alarm = Alarm::new(FireTime::new(21_600 + 15 * 60).unwrap(), "early");

    let fire_date = alarm.fire_date_from(&start);
    assert_eq!(fire_date.date_naive(), start.date_naive());
    assert_eq!(fire_date.hour(), 6);
    assert_eq!(fire_date.minute(), 15);
}

#[test]
fn fire_time_as_string_and_notification_request_follow_fire_date() {
    let alarm = Alarm::new(FireTime::new(25_200).unwrap(), "Wake up");

    let fire_date = alarm.fire_date().unwrap();
    let request = alarm.notification_request().unwrap();
    assert_eq!(request.id, *alarm.id());
    assert_eq!(request.title, "Alarm");
    assert_eq!(request.body, "Wake up");
    assert_eq!(request.trigger, fire_date.time());
    assert!(request.repeats_daily);
    assert_eq!(
        alarm.fire_time_as_string().unwrap(),
        fire_date.format("%-I:%M %p").to_string()
    );
}

#[test]
fn serialization_uses_exact_record_fields() {
    let alarm = Alarm::with_id(
        AlarmId::parse("5A0C2F3E-1111-4222-8333-444455556666").unwrap(),
        FireTime::new(25_200).unwrap(),
        "Wake up",
    );

    let json = serde_json::to_value(&alarm).unwrap();
    let object = json.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["enabled", "fireTimeFromMidnight", "id", "name"]);
    assert_eq!(json["id"], "5A0C2F3E-1111-4222-8333-444455556666");
    assert_eq!(json["name"], "Wake up");
    assert_eq!(json["fireTimeFromMidnight"], 25_200);
    assert_eq!(json["enabled"], true);

    let decoded: Alarm = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.id(), alarm.id());
    assert_eq!(decoded.name(), alarm.name());
    assert_eq!(decoded.fire_time(), alarm.fire_time());
    assert_eq!(decoded.is_enabled(), alarm.is_enabled());
}

#[test]
fn deserialize_defaults_missing_enabled_to_true() {
    let value = serde_json::json!({
        "id": "legacy",
        "name": "Old alarm",
        "fireTimeFromMidnight": 3600
    });

    let alarm: Alarm = serde_json::from_value(value).unwrap();
    assert!(alarm.is_enabled());
    assert_eq!(alarm.fire_time().seconds(), 3_600);
}

#[test]
fn deserialize_rejects_out_of_range_fire_time_and_empty_id() {
    let out_of_range = serde_json::json!({
        "id": "late",
        "name": "too late",
        "fireTimeFromMidnight": 86_400,
        "enabled": true
    });
    let err = serde_json::from_value::<Alarm>(out_of_range).unwrap_err();
    assert!(
        err.to_string().contains("must be < 86400"),
        "unexpected error: {err}"
    );

    let empty_id = serde_json::json!({
        "id": "",
        "name": "nameless",
        "fireTimeFromMidnight": 0,
        "enabled": false
    });
    let err = serde_json::from_value::<Alarm>(empty_id).unwrap_err();
    assert!(err.to_string().contains("must not be empty"), "unexpected error: {err}");
}

#[test]
fn deserialize_truncates_fractional_fire_time_and_rejects_negative() {
    let fractional = serde_json::json!({
        "id": "frac",
        "name": "fractional",
        "fireTimeFromMidnight": 25_200.9
    });
    let alarm: Alarm = serde_json::from_value(fractional).unwrap();
    assert_eq!(alarm.fire_time().seconds(), 25_200);

    let negative = serde_json::json!({
        "id": "neg",
        "name": "negative",
        "fireTimeFromMidnight": -1.0
    });
    let err = serde_json::from_value::<Alarm>(negative).unwrap_err();
    assert!(err.to_string().contains("non-negative"), "unexpected error: {err}");

    assert_eq!(
        FireTime::try_from(f64::NAN).unwrap_err(),
        AlarmValidationError::FireTimeNotRepresentable("NaN".to_string())
    );
}

#[test]
fn alarm_id_parse_keeps_value_verbatim() {
    assert_eq!(AlarmId::parse(" A ").unwrap().as_str(), " A ");
    assert_eq!(AlarmId::parse("   ").unwrap_err(), AlarmValidationError::EmptyId);
}
