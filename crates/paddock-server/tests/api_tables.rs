use axum::body::Body;
use axum::http::{Request, StatusCode};
use paddock_db::{open_pool, DbPool, PoolSettings};
use paddock_server::{app, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

fn test_app() -> (axum::Router, DbPool, TempDir) {
    let dir = TempDir::new().expect("should create temp dir");
    let db_path = dir.path().join("paddock-test.db");

    let pool = open_pool(&PoolSettings::new(db_path.to_str().unwrap()))
        .expect("pool should open");
    let conn = pool.get().expect("should get a connection");
    paddock_db::run_migrations(&conn).expect("migrations should succeed");
    drop(conn);

    (app(AppState { pool: pool.clone() }), pool, dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn seed_horses(pool: &DbPool) {
    let conn = pool.get().expect("should get a connection");
    conn.execute_batch(
        "INSERT INTO Stable (StableID, StableName) VALUES (1, 'Willow Farm');
         INSERT INTO Horse (HorseID, HorseName, Age, StableID) VALUES (1, 'Comet', 4, 1);
         INSERT INTO Horse (HorseID, HorseName, Age, StableID) VALUES (2, 'Brisa', 6, 1);",
    )
    .expect("seed should succeed");
}

#[tokio::test]
async fn listing_returns_all_rows() {
    let (app, pool, _dir) = test_app();
    seed_horses(&pool);

    let response = app.oneshot(get("/horses")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["results"], 2);
    assert_eq!(json["data"][0]["HorseName"], "Comet");
    assert_eq!(json["data"][1]["HorseName"], "Brisa");
}

#[tokio::test]
async fn empty_table_lists_as_success_with_no_rows() {
    let (app, _pool, _dir) = test_app();

    let response = app.oneshot(get("/tracks")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["results"], 0);
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn listing_ignores_query_string_input() {
    let (app, pool, _dir) = test_app();
    seed_horses(&pool);

    // Whatever the caller appends, the route still runs SELECT * FROM Horse.
    let response = app
        .oneshot(get("/horses?table=Owner&q=DROP%20TABLE%20Horse"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["results"], 2);
    assert_eq!(json["data"][0]["HorseName"], "Comet");

    // And the table is still there.
    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM Horse", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn listing_rejects_post() {
    let (app, _pool, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/horses")
                .method("POST")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"query":"SELECT 1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn listing_failure_uses_table_specific_message() {
    let (app, pool, _dir) = test_app();

    {
        let conn = pool.get().unwrap();
        conn.execute_batch("DROP TABLE Horse;")
            .expect("drop should succeed");
    }

    let response = app.oneshot(get("/horses")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Failed to fetch Horse");
}

#[tokio::test]
async fn all_listing_routes_resolve() {
    let (app, _pool, _dir) = test_app();

    for uri in [
        "/horses",
        "/owners",
        "/owns",
        "/stables",
        "/trainers",
        "/races",
        "/race-results",
        "/tracks",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri} should be routed");
    }
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, _pool, _dir) = test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
