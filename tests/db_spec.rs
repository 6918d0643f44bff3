use plantbot::db::{self, JsonFileStore, PlantStore, SqliteStore, StoreError, StoreKind};
use plantbot::models::PlantState;
use speculate2::speculate;

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
    }

    describe "json file store" {
        it "reports a missing record as a read error" {
            let store = JsonFileStore::new(dir.path().join("data.json"));
            let err = store.load().unwrap_err();
            assert!(matches!(err, StoreError::Missing { .. }));
            assert!(err.is_read());
        }

        it "reads a record written by hand" {
            let path = dir.path().join("data.json");
            std::fs::write(&path, r#"{"life":12,"lastFed":1000,"waterLevel":3}"#).unwrap();

            let state = JsonFileStore::new(&path).load().expect("Failed to load");
            assert_eq!(state, PlantState::new(12, 3, 1000));
        }

        it "reports a corrupt record as a read error" {
            let path = dir.path().join("data.json");
            std::fs::write(&path, "{not json").unwrap();

            let err = JsonFileStore::new(&path).load().unwrap_err();
            assert!(matches!(err, StoreError::Read { .. }));
        }

        it "round-trips a saved record and leaves no staging file" {
            let path = dir.path().join("data.json");
            let store = JsonFileStore::new(&path);
            let state = PlantState::new(99, 120, 1_700_000_000_000);

            store.save(&state).expect("Failed to save");

            assert_eq!(store.load().expect("Failed to load"), state);
            assert!(!dir.path().join("data.json.tmp").exists());
            let raw = std::fs::read_to_string(&path).unwrap();
            assert!(raw.contains("\"lastFed\":1700000000000"));
        }

        it "creates missing parent directories on save" {
            let store = JsonFileStore::new(dir.path().join("nested/deeper/data.json"));
            store.save(&PlantState::new(1, 1, 1)).expect("Failed to save");
            assert_eq!(store.load().unwrap(), PlantState::new(1, 1, 1));
        }

        it "reports an unwritable location as a write error" {
            let blocker = dir.path().join("file");
            std::fs::write(&blocker, "").unwrap();
            let store = JsonFileStore::new(blocker.join("data.json"));

            let err = store.save(&PlantState::new(1, 1, 1)).unwrap_err();
            assert!(matches!(err, StoreError::Write { .. }));
        }
    }

    describe "sqlite store" {
        it "starts without a record" {
            let store = SqliteStore::open_memory().expect("Failed to open");
            assert!(matches!(store.load(), Err(StoreError::Missing { .. })));
        }

        it "overwrites the single record on every save" {
            let store = SqliteStore::open_memory().expect("Failed to open");
            store.save(&PlantState::new(100, 50, 1)).unwrap();
            store.save(&PlantState::new(80, 20, 2)).unwrap();

            assert_eq!(store.load().unwrap(), PlantState::new(80, 20, 2));
        }

        it "persists across reopen" {
            let path = dir.path().join("plant.db");
            SqliteStore::open(&path)
                .expect("Failed to open")
                .save(&PlantState::new(7, 8, 9))
                .unwrap();

            let reopened = SqliteStore::open(&path).expect("Failed to reopen");
            assert_eq!(reopened.load().unwrap(), PlantState::new(7, 8, 9));
        }
    }

    describe "open" {
        it "builds the requested backend" {
            let json = db::open(StoreKind::Json, &dir.path().join("a.json")).unwrap();
            let sqlite = db::open(StoreKind::Sqlite, &dir.path().join("a.db")).unwrap();

            json.save(&PlantState::new(5, 5, 5)).unwrap();
            sqlite.save(&PlantState::new(6, 6, 6)).unwrap();

            assert_eq!(json.load().unwrap().life, 5);
            assert_eq!(sqlite.load().unwrap().life, 6);
            assert!(sqlite.describe().starts_with("sqlite:"));
        }
    }
}
