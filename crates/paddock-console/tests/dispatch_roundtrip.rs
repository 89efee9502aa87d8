//! End-to-end dispatcher tests against a live paddock server.

use paddock_console::{forms, send_query, PanelState, QueryCatalog};
use paddock_db::{open_pool, PoolSettings};
use paddock_server::{app, AppState};
use tempfile::TempDir;

/// Starts a server on an ephemeral port and returns its execution-endpoint
/// URL. The TempDir must stay alive for the server's lifetime.
async fn start_server() -> (String, TempDir) {
    let dir = TempDir::new().expect("should create temp dir");
    let db_path = dir.path().join("paddock-test.db");

    let pool = open_pool(&PoolSettings::new(db_path.to_str().unwrap()))
        .expect("pool should open");
    {
        let conn = pool.get().expect("should get a connection");
        paddock_db::run_migrations(&conn).expect("migrations should succeed");
        conn.execute_batch(
            "INSERT INTO Stable (StableID, StableName) VALUES (1, 'Willow Farm');
             INSERT INTO Trainer (TrainerID, FirstName, LastName, StableID) VALUES (1, 'Pat', 'O''Neil', 1);
             INSERT INTO Horse (HorseID, HorseName, Age, StableID, TrainerID) VALUES (1, 'Comet', 4, 1, 1);
             INSERT INTO Owner (OwnerID, FirstName, LastName) VALUES (1, 'Jane', 'Hart');
             INSERT INTO Owns (OwnerID, HorseID, SharePercent) VALUES (1, 1, 100.0);
             INSERT INTO Track (TrackID, TrackName) VALUES (1, 'Ascot');
             INSERT INTO Race (RaceID, RaceName, TrackName) VALUES (1, 'Gold Cup', 'Ascot');
             INSERT INTO RaceResults (RaceID, HorseID, Result, Prize) VALUES (1, 1, 1, 1000.0);",
        )
        .expect("seed should succeed");
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind an ephemeral port");
    let addr = listener.local_addr().expect("should read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app(AppState { pool }))
            .await
            .expect("server error");
    });

    (format!("http://{addr}/"), dir)
}

#[tokio::test]
async fn select_round_trip_renders_success_panel() {
    let (url, _dir) = start_server().await;
    let client = reqwest::Client::new();

    let panel = send_query(&client, &url, "SELECT 1 AS x").await;

    assert_eq!(panel.state, PanelState::Success);
    assert_eq!(panel.message, "Success! Rows affected/returned: 1");
    assert_eq!(panel.query.as_deref(), Some("SELECT 1 AS x"));
    assert_eq!(panel.rows, Some(serde_json::json!([{"x": 1}])));
}

#[tokio::test]
async fn multi_line_query_is_normalized_before_sending() {
    let (url, _dir) = start_server().await;
    let client = reqwest::Client::new();

    let panel = send_query(&client, &url, "SELECT HorseName\n  FROM Horse\n").await;

    assert_eq!(panel.state, PanelState::Success);
    assert_eq!(panel.query.as_deref(), Some("SELECT HorseName FROM Horse"));
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let (url, _dir) = start_server().await;
    let client = reqwest::Client::new();

    let panel = send_query(&client, &url, "SELECT * FROM NoSuchTable").await;

    assert_eq!(panel.state, PanelState::Error);
    assert!(panel.message.contains("NoSuchTable"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = reqwest::Client::new();

    // Nothing listens here.
    let panel = send_query(&client, "http://127.0.0.1:1/", "SELECT 1").await;

    assert_eq!(panel.state, PanelState::Error);
    assert!(!panel.message.is_empty());
}

#[tokio::test]
async fn guest_reports_run_against_seeded_data() {
    let (url, _dir) = start_server().await;
    let client = reqwest::Client::new();
    let catalog = QueryCatalog::embedded();

    let sql = forms::guest_report_query(catalog, "winningTrainers").expect("report should build");
    let panel = send_query(&client, &url, &sql).await;
    assert_eq!(panel.state, PanelState::Success);
    let rows = panel.rows.expect("rows should be present");
    assert_eq!(rows[0]["LastName"], "O'Neil");

    let sql = forms::build_owners_horses_query(catalog, "Hart").expect("query should build");
    let panel = send_query(&client, &url, &sql).await;
    assert_eq!(panel.state, PanelState::Success);
    let rows = panel.rows.expect("rows should be present");
    assert_eq!(rows[0]["HorseName"], "Comet");
}

#[tokio::test]
async fn admin_flow_inserts_through_the_dispatcher() {
    let (url, _dir) = start_server().await;
    let client = reqwest::Client::new();
    let catalog = QueryCatalog::embedded();

    let form = forms::AddRaceForm {
        race_id: "2".to_string(),
        race_name: "Spring Stakes".to_string(),
        track_name: "Ascot".to_string(),
        race_date: "2024-05-04".to_string(),
        race_time: "15:00".to_string(),
        results: vec![forms::RaceResultForm {
            horse_id: "1".to_string(),
            result: "1".to_string(),
            prize: "500".to_string(),
        }],
    };
    let sql = forms::build_add_race_query(catalog, &form).expect("query should build");

    let panel = send_query(&client, &url, &sql).await;
    assert_eq!(panel.state, PanelState::Success);
    assert_eq!(panel.message, "Success! Rows affected/returned: 2");

    let check = send_query(
        &client,
        &url,
        "SELECT RaceName FROM Race WHERE RaceID = 2",
    )
    .await;
    assert_eq!(check.rows, Some(serde_json::json!([{"RaceName": "Spring Stakes"}])));
}
