use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gtfs_to_json::config::{AgencyDescriptor, Config};
use gtfs_to_json::infra::gtfs::GtfsImporter;
use gtfs_to_json::infra::sqlite::schema::{ROUTES, STOP_TIMES, STOPS, TRIPS};
use gtfs_to_json::infra::sqlite::{Store, TableLoad};
use gtfs_to_json::logging::LogFn;
use gtfs_to_json::services::feed_importer::{FeedImporter, ImportRequest};
use gtfs_to_json::{Error, ImportError, gtfs_to_json, run};
use serde_json::Value;

fn write_fixture_feed(dir: &Path) {
    let files = [
        (
            "routes.txt",
            "route_id,agency_id,route_short_name,route_long_name,route_type\n\
             r10a,m,10,Uptown,3\n\
             r10b,m,10,Downtown,3\n\
             r2,m,2,Harbor,3\n\
             rA,m,A,Airport Express,3\n",
        ),
        (
            "stops.txt",
            "stop_id,stop_name,stop_lat,stop_lon\n\
             s1,Main St,40.10,-75.10\n\
             s2,Elm St,40.20,-75.20\n\
             s3,Main St,40.11,-75.11\n\
             s4,Terminal,40.40,-75.40\n",
        ),
        (
            "trips.txt",
            "route_id,service_id,trip_id\n\
             r10a,wk,t1\n\
             r10a,wk,t2\n\
             r2,wk,t3\n",
        ),
        (
            "stop_times.txt",
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
             t1,08:00:00,08:00:00,s1,1\n\
             t1,08:05:00,08:05:00,s2,2\n\
             t2,09:00:00,09:00:00,s3,1\n\
             t2,09:05:00,09:05:00,s2,2\n\
             t3,10:00:00,10:00:00,s4,1\n",
        ),
    ];

    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

fn capture_log() -> (LogFn, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let log_fn: LogFn = Arc::new(move |text: &str| sink.lock().unwrap().push(text.to_string()));
    (log_fn, lines)
}

fn agency(key: &str, path: Option<&Path>) -> AgencyDescriptor {
    AgencyDescriptor {
        agency_key: key.to_string(),
        path: path.map(|p| p.display().to_string()),
        ..Default::default()
    }
}

fn read_json(path: &Path) -> Vec<Value> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Fails the test if the pipeline asks for an import.
struct UnusedImporter;

#[async_trait(?Send)]
impl FeedImporter for UnusedImporter {
    async fn import_feed(
        &self,
        _store: &mut Store,
        request: &ImportRequest<'_>,
    ) -> gtfs_to_json::Result<()> {
        panic!("import requested for {}", request.agency.agency_key);
    }
}

/// Loads one route per agency, named after the agency, and records call order.
#[derive(Default)]
struct RecordingImporter {
    calls: RefCell<Vec<String>>,
}

#[async_trait(?Send)]
impl FeedImporter for RecordingImporter {
    async fn import_feed(
        &self,
        store: &mut Store,
        request: &ImportRequest<'_>,
    ) -> gtfs_to_json::Result<()> {
        let key = request.agency.agency_key.clone();
        self.calls.borrow_mut().push(key.clone());

        let mut route = vec![Some(format!("{key}-route")), None, Some(key.clone())];
        route.resize(ROUTES.columns.len(), None);

        store
            .replace_tables(&[
                TableLoad { table: &ROUTES, rows: vec![route] },
                TableLoad { table: &STOPS, rows: vec![] },
                TableLoad { table: &TRIPS, rows: vec![] },
                TableLoad { table: &STOP_TIMES, rows: vec![] },
            ])
            .map_err(|e| Error::Import {
                agency_key: key,
                source: ImportError::Store(e),
            })?;
        Ok(())
    }
}

#[tokio::test]
async fn test_full_pipeline_from_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let feed_dir = tmp.path().join("feed");
    fs::create_dir(&feed_dir).unwrap();
    write_fixture_feed(&feed_dir);

    let (log_fn, lines) = capture_log();
    let config = Config {
        agencies: vec![agency("metro", Some(&feed_dir))],
        export_path: tmp.path().join("json"),
        log_function: Some(log_fn),
        ..Default::default()
    };

    let reports = run(&config, &GtfsImporter::new().unwrap()).await.unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.export_path, tmp.path().join("json").join("metro"));
    assert_eq!(report.stats.routes, 3);
    // r10a: Elm St, Main St; r2: Terminal; rA: none
    assert_eq!(report.stats.stops, 3);

    let routes = read_json(&report.export_path.join("metro.json"));
    let short_names: Vec<_> = routes
        .iter()
        .map(|r| r["route_short_name"].as_str().unwrap())
        .collect();
    assert_eq!(short_names, vec!["2", "10", "A"]);

    let ten = &routes[1];
    assert_eq!(ten["route_id"], "r10a");
    assert_eq!(ten["route_full_name"], "10 - Uptown");
    assert_eq!(ten["agency_id"], "metro");
    assert_eq!(ten["route_type"], 3);
    let stop_names: Vec<_> = ten["stops"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["stop_name"].as_str().unwrap())
        .collect();
    assert_eq!(stop_names, vec!["Elm St", "Main St"]);
    assert_eq!(ten["stops"][0]["stop_lat"], 40.2);
    assert!(routes[2]["stops"].as_array().unwrap().is_empty());

    let log_text = fs::read_to_string(report.export_path.join("log.txt")).unwrap();
    let log_lines: Vec<_> = log_text.lines().collect();
    assert_eq!(log_lines[0], "Feed Version: Unknown");
    assert_eq!(
        log_lines[1],
        format!("GTFS-to-JSON Version: {}", env!("CARGO_PKG_VERSION"))
    );
    assert!(log_lines[2].starts_with("Date Generated: "));
    assert_eq!(log_lines[3], "Route Count: 3");
    assert_eq!(log_lines[4], "Stop Count: 3");
    assert_eq!(log_lines[5], format!("Source: {}", feed_dir.display()));

    let lines = lines.lock().unwrap();
    assert_eq!(lines[0], "Started JSON creation for 1 agencies.");
    assert!(lines.contains(&"Starting JSON creation for metro".to_string()));
    assert!(lines.iter().any(|l| l.starts_with("JSON for metro created at ")));
    assert!(lines.iter().any(|l| l.starts_with("JSON generation required ")));
    // The stats table is hidden from custom log functions
    assert!(!lines.iter().any(|l| l.contains("Routes")));
}

#[tokio::test]
async fn test_skip_import_uses_existing_store() {
    let tmp = tempfile::tempdir().unwrap();
    let feed_dir = tmp.path().join("feed");
    fs::create_dir(&feed_dir).unwrap();
    write_fixture_feed(&feed_dir);

    let db_path = tmp.path().join("gtfs.db").display().to_string();
    let seeding_agency = agency("metro", Some(&feed_dir));
    {
        let mut store = Store::open(&db_path).unwrap();
        GtfsImporter::new()
            .unwrap()
            .import_feed(&mut store, &ImportRequest::new(&seeding_agency))
            .await
            .unwrap();
    }

    let config = Config {
        agencies: vec![agency("metro", None)],
        sqlite_path: db_path,
        skip_import: true,
        verbose: false,
        export_path: tmp.path().join("json"),
        ..Default::default()
    };

    let reports = run(&config, &UnusedImporter).await.unwrap();

    let routes = read_json(&reports[0].export_path.join("metro.json"));
    assert_eq!(routes.len(), 3);
    let log_text = fs::read_to_string(reports[0].export_path.join("log.txt")).unwrap();
    assert!(!log_text.contains("Source:"));
}

#[tokio::test]
async fn test_empty_store_warns_even_when_quiet() {
    let tmp = tempfile::tempdir().unwrap();
    let (log_fn, lines) = capture_log();
    let config = Config {
        agencies: vec![agency("metro", None)],
        skip_import: true,
        verbose: false,
        export_path: tmp.path().join("json"),
        log_function: Some(log_fn),
        ..Default::default()
    };

    let reports = run(&config, &UnusedImporter).await.unwrap();

    assert_eq!(reports[0].stats.routes, 0);
    assert!(read_json(&reports[0].export_path.join("metro.json")).is_empty());
    assert_eq!(*lines.lock().unwrap(), vec!["No routes found for metro"]);
}

#[tokio::test]
async fn test_stale_files_are_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let export_dir = tmp.path().join("json").join("metro");
    fs::create_dir_all(export_dir.join("old")).unwrap();
    fs::write(export_dir.join("stale.json"), "[]").unwrap();
    fs::write(export_dir.join("metro.json"), "stale").unwrap();

    let (log_fn, _) = capture_log();
    let config = Config {
        agencies: vec![agency("metro", None)],
        skip_import: true,
        export_path: tmp.path().join("json"),
        log_function: Some(log_fn),
        ..Default::default()
    };
    let mut store = Store::open_in_memory().unwrap();

    gtfs_to_json(&config, &mut store, &UnusedImporter).await.unwrap();

    let mut entries: Vec<_> = fs::read_dir(&export_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["log.txt", "metro.json"]);
    assert!(read_json(&export_dir.join("metro.json")).is_empty());
}

#[tokio::test]
async fn test_agencies_processed_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let (log_fn, lines) = capture_log();
    let config = Config {
        agencies: vec![
            AgencyDescriptor {
                url: Some("https://first.example/gtfs.zip".to_string()),
                ..agency("first", None)
            },
            agency("second", Some(Path::new("second.zip"))),
        ],
        export_path: tmp.path().to_path_buf(),
        log_function: Some(log_fn),
        ..Default::default()
    };
    let importer = RecordingImporter::default();
    let mut store = Store::open_in_memory().unwrap();

    let reports = gtfs_to_json(&config, &mut store, &importer).await.unwrap();

    assert_eq!(*importer.calls.borrow(), vec!["first", "second"]);
    let keys: Vec<_> = reports.iter().map(|r| r.agency_key.as_str()).collect();
    assert_eq!(keys, vec!["first", "second"]);

    for key in ["first", "second"] {
        let routes = read_json(&tmp.path().join(key).join(format!("{key}.json")));
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0]["route_short_name"], key);
    }

    let starts: Vec<_> = lines
        .lock()
        .unwrap()
        .iter()
        .filter(|l| l.starts_with("Starting JSON creation for "))
        .cloned()
        .collect();
    assert_eq!(
        starts,
        vec!["Starting JSON creation for first", "Starting JSON creation for second"]
    );
}

#[tokio::test]
async fn test_import_failure_aborts_remaining_agencies() {
    let tmp = tempfile::tempdir().unwrap();
    let feed_dir = tmp.path().join("feed");
    fs::create_dir(&feed_dir).unwrap();
    write_fixture_feed(&feed_dir);

    let config = Config {
        agencies: vec![
            agency("broken", Some(&tmp.path().join("missing.zip"))),
            agency("metro", Some(&feed_dir)),
        ],
        verbose: false,
        export_path: tmp.path().join("json"),
        ..Default::default()
    };

    let err = run(&config, &GtfsImporter::new().unwrap()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Import { ref agency_key, source: ImportError::Io { .. } } if agency_key == "broken"
    ));
    assert!(!tmp.path().join("json").join("metro").exists());
}

#[tokio::test]
async fn test_invalid_config_processes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        agencies: vec![agency("metro", None)],
        export_path: tmp.path().join("json"),
        ..Default::default()
    };
    let mut store = Store::open_in_memory().unwrap();

    let err = gtfs_to_json(&config, &mut store, &UnusedImporter)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(!tmp.path().join("json").exists());
}

#[test]
fn test_config_file_round_trip_through_loader() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.json");
    fs::write(
        &path,
        r#"{"agencies": [{"agencyKey": "metro", "url": "https://metro.example/gtfs.zip"}],
            "exportPath": "out"}"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.agencies[0].source(), Some("https://metro.example/gtfs.zip"));
    assert_eq!(config.export_path, Path::new("out"));
    assert!(config.validate().is_ok());

    assert!(matches!(
        Config::load(tmp.path().join("absent.json")),
        Err(Error::Config(_))
    ));
}
