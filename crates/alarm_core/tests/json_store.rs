use alarm_core::{
    Alarm, AlarmController, AlarmStore, FireTime, InMemoryNotificationCenter, JsonFileAlarmStore,
    StoreError, StoreFailure,
};

fn sample_alarms() -> Vec<Alarm> {
    let mut controller = AlarmController::with_alarms(
        InMemoryNotificationCenter::new(),
        alarm_core::InMemoryAlarmStore::new(),
        Vec::new(),
    );
    controller.add(FireTime::new(25_200).unwrap(), "Wake up");
    let gym = controller.add(FireTime::new(64_800).unwrap(), "Gym");
    controller.add(FireTime::new(0).unwrap(), "Midnight");
    controller.toggle_enabled(gym.id());
    controller.alarms().to_vec()
}

fn tuples(alarms: &[Alarm]) -> Vec<(String, String, u32, bool)> {
    alarms
        .iter()
        .map(|alarm| {
            (
                alarm.id().to_string(),
                alarm.name().to_string(),
                alarm.fire_time().seconds(),
                alarm.is_enabled(),
            )
        })
        .collect()
}

#[test]
fn save_then_load_preserves_records_and_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());
    let alarms = sample_alarms();

    store.save(&alarms).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(tuples(&loaded), tuples(&alarms));
    assert!(store.path().ends_with("Task.json"));
}

#[test]
fn save_replaces_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());
    let alarms = sample_alarms();

    store.save(&alarms).unwrap();
    store.save(&alarms[..1]).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(tuples(&loaded), tuples(&alarms[..1]));
    assert!(!dir.path().join("Task.json.tmp").exists());
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path().join("nested").join("app"));

    store.save(&sample_alarms()).unwrap();
    assert_eq!(store.load().unwrap().len(), 3);
}

#[test]
fn persisted_file_is_array_of_alarm_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());
    store.save(&sample_alarms()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
    let records = raw.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["name"], "Wake up");
    assert_eq!(records[0]["fireTimeFromMidnight"], 25_200);
    assert_eq!(records[1]["enabled"], false);
    assert!(records[0].get("fireDate").is_none());
}

#[test]
fn load_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::Read(StoreFailure::Missing(_))), "{err}");
}

#[test]
fn load_malformed_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());
    std::fs::write(store.path(), br#"[{"id": "a", "name": 3}]"#).unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, StoreError::Read(StoreFailure::Malformed(_))), "{err}");
}

#[test]
fn save_into_unwritable_location_is_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = JsonFileAlarmStore::in_dir(&blocker);

    let err = store.save(&sample_alarms()).unwrap_err();
    assert!(matches!(err, StoreError::Write(StoreFailure::Io { .. })), "{err}");
}

#[test]
fn load_accepts_fractional_fire_time_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        br#"[
            {"id": "A", "name": "Wake up", "fireTimeFromMidnight": 25200.0, "enabled": true},
            {"id": "B", "name": "Nap", "fireTimeFromMidnight": 3600.75, "enabled": false},
            {"id": "C", "name": "Late", "fireTimeFromMidnight": 86399.9, "enabled": true}
        ]"#,
    )
    .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(
        tuples(&loaded),
        vec![
            ("A".to_string(), "Wake up".to_string(), 25_200, true),
            ("B".to_string(), "Nap".to_string(), 3_600, false),
            ("C".to_string(), "Late".to_string(), 86_399, true),
        ]
    );

    let controller = AlarmController::open(InMemoryNotificationCenter::new(), store);
    assert_eq!(controller.len(), 3);
}

#[test]
fn ids_with_surrounding_whitespace_survive_reload_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileAlarmStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        br#"[{"id": " A ", "name": "Padded", "fireTimeFromMidnight": 60, "enabled": true}]"#,
    )
    .unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded[0].id().as_str(), " A ");

    store.save(&loaded).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded[0].id().as_str(), " A ");

    let controller = AlarmController::open(InMemoryNotificationCenter::new(), store);
    controller.resync_notifications();
    let registered = controller.scheduler().pending();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0].id.as_str(), " A ");
}
