use alarm_core::{
    open_store, Alarm, AlarmController, AlarmStore, FireTime, InMemoryNotificationCenter,
    SqliteAlarmStore, StoreBackend, StoreConfig, StoreError, StoreFailure,
};

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
fn empty_database_loads_empty_collection() {
    let store = SqliteAlarmStore::open_in_memory().unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn controller_roundtrip_preserves_order_and_flags() {
    let mut controller = AlarmController::open(
        InMemoryNotificationCenter::new(),
        SqliteAlarmStore::open_in_memory().unwrap(),
    );
    controller.add(FireTime::new(64_800).unwrap(), "Gym");
    let wake = controller.add(FireTime::new(25_200).unwrap(), "Wake up");
    controller.add(FireTime::new(43_200).unwrap(), "Lunch");
    controller.toggle_enabled(wake.id());

    let loaded = controller.store().load().unwrap();
    assert_eq!(tuples(&loaded), tuples(controller.alarms()));

    controller.delete(wake.id());
    let loaded = controller.store().load().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(tuples(&loaded), tuples(controller.alarms()));
}

#[test]
fn reopening_file_database_restores_alarms() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(StoreBackend::Sqlite, dir.path());

    let saved = {
        let mut controller =
            AlarmController::open(InMemoryNotificationCenter::new(), open_store(&config).unwrap());
        controller.add(FireTime::new(25_200).unwrap(), "Wake up");
        controller.add(FireTime::new(79_200).unwrap(), "Sleep");
        tuples(controller.alarms())
    };

    let controller =
        AlarmController::open(InMemoryNotificationCenter::new(), open_store(&config).unwrap());
    assert_eq!(tuples(controller.alarms()), saved);
    assert!(config.store_path().exists());
}

#[test]
fn invalid_rows_are_rejected_on_load() {
    let store = SqliteAlarmStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO alarms (id, position, name, fire_time_from_midnight, enabled)
             VALUES ('bad', 0, 'broken', 60, 7);",
            [],
        )
        .unwrap_err();
    store
        .connection()
        .execute_batch(
            "PRAGMA ignore_check_constraints = ON;
             INSERT INTO alarms (id, position, name, fire_time_from_midnight, enabled)
             VALUES ('bad', 0, 'broken', 60, 7);",
        )
        .unwrap();

    let err = store.load().unwrap_err();
    assert!(
        matches!(err, StoreError::Read(StoreFailure::InvalidData(_))),
        "{err}"
    );
}

#[test]
fn database_from_newer_layout_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alarms.sqlite3");
    {
        let store = SqliteAlarmStore::open(&path).unwrap();
        store
            .connection()
            .execute_batch("PRAGMA user_version = 9;")
            .unwrap();
    }

    let err = SqliteAlarmStore::open(&path).err().unwrap();
    assert!(matches!(err, StoreFailure::InvalidData(_)), "{err}");
}
