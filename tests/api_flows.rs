//! End-to-end flows against the full router with an in-memory store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use coral_server::core::{Config, Server, ServerState};
use coral_server::ledger::model::{
    CANCELLED_SHEET, FINAL_SHEET, SERIAL_SHEET, WAITING_SHEET,
};
use coral_server::store::{MemoryStore, RawRow};

const MASTER: &str = "master-1";
const BUDGET: &str = "budget-1";

fn test_config() -> Config {
    Config {
        http_port: 0,
        sheets_api_base: String::new(),
        sheets_api_token: String::new(),
        master_sheet_id: MASTER.to_string(),
        user_cache_ttl_secs: 60,
        request_timeout_ms: 1000,
        max_connections: 16,
        environment: "test".to_string(),
    }
}

/// A 26-column credential row (A..Z). The budget sheet id sits in column F
/// of the first data row only.
fn cred_row(
    username: &str,
    password: &str,
    branch: &str,
    level: &str,
    budget_id: &str,
) -> RawRow {
    let mut row: RawRow = vec![json!(""); 26];
    row[0] = json!(username);
    row[1] = json!(password);
    row[2] = json!(branch);
    row[3] = json!("FALSE");
    row[4] = json!(level);
    row[5] = json!(budget_id);
    row[25] = json!("FALSE");
    row
}

fn header() -> RawRow {
    vec![json!("Date"); 11]
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

async fn seeded_router() -> Router {
    let store = Arc::new(MemoryStore::new());

    // Master credential store: a reserved tab plus two client partitions.
    // "amr" exists in both clients; only the first partition is reachable.
    store
        .seed_sheet(MASTER, "Config", vec![vec![json!("internal")]])
        .await;
    store
        .seed_sheet(
            MASTER,
            "ClientA",
            vec![
                vec![json!("Username"), json!("Password")],
                cred_row("amr", "secret", "Maadi", "L1", BUDGET),
                cred_row("mona", "hunter2", "HQ", "L2", ""),
            ],
        )
        .await;
    store
        .seed_sheet(
            MASTER,
            "ClientB",
            vec![
                vec![json!("Username"), json!("Password")],
                cred_row("amr", "secret", "Alexandria", "L2", "budget-9"),
            ],
        )
        .await;

    // The client's order data store
    for sheet in [WAITING_SHEET, FINAL_SHEET, CANCELLED_SHEET] {
        store.seed_sheet(BUDGET, sheet, vec![header()]).await;
    }
    store
        .seed_sheet(
            BUDGET,
            SERIAL_SHEET,
            vec![vec![json!(""), json!("")], vec![json!(""), json!("")]],
        )
        .await;

    let state = ServerState::with_store(test_config(), store);
    Server::build_router(state)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn call(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_login_returns_partition_data() {
    let router = seeded_router().await;

    let (status, body) = call(
        &router,
        post("/api/validateLogin", json!({"username": "amr", "password": "secret"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["level"], json!("L1"));
    // Duplicate username in ClientB: the first partition wins
    assert_eq!(body["branch"], json!("Maadi"));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let router = seeded_router().await;

    let (status, body) = call(
        &router,
        post("/api/validateLogin", json!({"username": "amr", "password": "wrong"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_l2_endpoints_reject_l1_users() {
    let router = seeded_router().await;

    let (status, body) = call(&router, get("/api/approvalsSummary?username=amr")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_unknown_username_is_rejected() {
    let router = seeded_router().await;

    let (status, body) = call(&router, get("/api/previousOrders?username=ghost")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_l1_cannot_submit_for_another_branch() {
    let router = seeded_router().await;

    let (status, _) = call(
        &router,
        post(
            "/api/submitOrder",
            json!({
                "username": "amr",
                "branch": "HQ",
                "items": [{"productCode": "P1", "productName": "Juice",
                           "unitPrice": 10, "quantity": 3, "category": "Drinks"}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_submit_approve_flow() {
    let router = seeded_router().await;

    // L1 submits for their own branch
    let (status, body) = call(
        &router,
        post(
            "/api/submitOrder",
            json!({
                "username": "amr",
                "branch": "Maadi",
                "items": [{"productCode": "P1", "productName": "Juice",
                           "unitPrice": 10, "quantity": 3, "category": "Drinks"}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderSerial"], json!("AA1"));

    // The L2 dashboard sees the branch total
    let (status, body) = call(&router, get("/api/approvalsSummary?username=mona")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branches"][0]["branchName"], json!("Maadi"));
    assert_eq!(body["branches"][0]["totalAmount"], json!(30.0));
    assert_eq!(body["branches"][0]["lineCount"], json!(1));

    // Approve the serial
    let (status, body) = call(
        &router,
        post("/api/approveOrder", json!({"username": "mona", "serial": "AA1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"], json!(1));

    // The branch now sees it in previous orders
    let (status, body) = call(&router, get("/api/previousOrders?username=amr")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["productCode"], json!("P1"));
    assert_eq!(body["items"][0]["quantity"], json!(3));

    // Approving again finds nothing to move
    let (status, body) = call(
        &router,
        post("/api/approveOrder", json!({"username": "mona", "serial": "AA1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_branches_for_l2() {
    let router = seeded_router().await;

    // mona's partition has no budget id of its own row, but F2 of the
    // partition (amr's row) carries it
    let (status, body) = call(&router, get("/api/branchesForL2?username=mona")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["branches"], json!(["HQ", "Maadi"]));
}

#[tokio::test]
async fn test_export_single_order() {
    let router = seeded_router().await;

    call(
        &router,
        post(
            "/api/submitOrder",
            json!({
                "username": "amr",
                "branch": "Maadi",
                "items": [{"productCode": "P1", "productName": "Juice",
                           "unitPrice": 10, "quantity": 3, "category": "Drinks"}]
            }),
        ),
    )
    .await;

    let resp = router
        .clone()
        .oneshot(get("/api/exportOrderExcel?username=mona&serial=AA1"))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .expect("content type")
            .contains("spreadsheetml")
    );
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn test_health_and_landing_page() {
    let router = seeded_router().await;

    let (status, body) = call(&router, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], json!("coral-server"));

    let resp = router.clone().oneshot(get("/")).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("<!DOCTYPE html>"));
}

#[tokio::test]
async fn test_order_archive_uses_only_current_month() {
    let router = seeded_router().await;

    // Submit now, then verify the summary sees it dated this month
    call(
        &router,
        post(
            "/api/submitOrder",
            json!({
                "username": "amr",
                "branch": "Maadi",
                "items": [{"productCode": "P1", "productName": "Juice",
                           "unitPrice": 10, "quantity": 2, "category": "Drinks"}]
            }),
        ),
    )
    .await;

    let (status, body) = call(&router, get("/api/pendingOrders?username=mona")).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["orders"].as_array().expect("orders");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["serial"], json!("AA1"));
    assert_eq!(orders[0]["total"], json!(20.0));
    let created = orders[0]["createdAt"].as_str().expect("createdAt");
    assert!(created.starts_with(&today()[..7]));
}
