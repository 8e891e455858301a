use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use linentrack::{create_router, store::MemoryStore, utils::create_token, AppState};

const SECRET: &str = "integration-secret";

struct Api {
    router: Router,
    token: String,
}

impl Api {
    fn new() -> Self {
        let state = AppState::new(MemoryStore::new(), SECRET);
        Self {
            router: create_router(state),
            token: create_token(Uuid::new_v4(), SECRET).unwrap(),
        }
    }

    async fn call(&self, method: Method, uri: &str, body: Option<Value>, auth: bool) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if auth {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }
        let body = match body {
            Some(body) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> Value {
        let (status, body) = self.call(Method::GET, uri, None, true).await;
        assert_eq!(status, StatusCode::OK, "GET {} -> {}", uri, body);
        body["data"].clone()
    }

    async fn send(&self, method: Method, uri: &str, body: Value) -> Value {
        let (status, reply) = self.call(method.clone(), uri, Some(body), true).await;
        assert_eq!(status, StatusCode::OK, "{} {} -> {}", method, uri, reply);
        reply["data"].clone()
    }

    async fn linen_type(&self, name: &str) -> String {
        let created = self
            .send(Method::POST, "/api/linen-types", json!({ "name": name, "category": "bed" }))
            .await;
        created["id"].as_str().unwrap().to_string()
    }

    async fn room(&self, number: &str) -> String {
        let created = self
            .send(
                Method::POST,
                "/api/rooms",
                json!({ "number": number, "floor": 1, "type": "double", "capacity": 2 }),
            )
            .await;
        created["id"].as_str().unwrap().to_string()
    }

    async fn item(&self, linen_type_id: &str, room_id: Option<&str>) -> String {
        let created = self
            .send(
                Method::POST,
                "/api/linen-items",
                json!({ "linen_type_id": linen_type_id, "room_id": room_id }),
            )
            .await;
        created["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn requests_without_a_session_are_unauthorized() {
    let api = Api::new();

    let (status, body) = api
        .call(
            Method::POST,
            "/api/rooms",
            Some(json!({ "number": "1", "floor": 1, "type": "single", "capacity": 1 })),
            false,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let (status, _) = api.call(Method::GET, "/api/movements", None, false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let api = Api::new();
    let request = Request::builder()
        .uri("/api/linen-types")
        .header(header::COOKIE, format!("auth_token={}", api.token))
        .body(Body::empty())
        .unwrap();

    let response = api.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn business_errors_use_the_error_envelope() {
    let api = Api::new();

    let (status, body) = api
        .call(Method::GET, &format!("/api/linen-items/{}", Uuid::new_v4()), None, true)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Linen item not found" }));

    let sheet = api.linen_type("Sheet").await;
    let item = api.item(&sheet, None).await;
    let (status, body) = api
        .call(Method::POST, &format!("/api/linen-items/{}/repair", item), Some(json!({})), true)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn entry_then_exit_leaves_item_dirty_and_roomless() {
    let api = Api::new();
    let sheet = api.linen_type("Sheet").await;
    let room = api.room("101").await;
    let item = api.item(&sheet, None).await;

    let moved = api
        .send(
            Method::POST,
            &format!("/api/linen-items/{}/move", item),
            json!({ "to_room_id": room, "movement_type": "entry" }),
        )
        .await;
    assert_eq!(moved["status"], "clean");
    assert_eq!(moved["room_id"], room.as_str());

    let moved = api
        .send(
            Method::POST,
            &format!("/api/linen-items/{}/move", item),
            json!({ "to_room_id": null, "movement_type": "exit" }),
        )
        .await;
    assert_eq!(moved["status"], "dirty");
    assert_eq!(moved["room_id"], Value::Null);

    let movements = api.get("/api/movements").await;
    let types: Vec<_> = movements
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["movement_type"].as_str().unwrap().to_string())
        .collect();
    // Newest first.
    assert_eq!(types, vec!["exit", "entry"]);
}

#[tokio::test]
async fn laundry_cycle_from_room_to_stock() {
    let api = Api::new();
    let towel = api.linen_type("Towel").await;
    let room = api.room("101").await;
    let a = api.item(&towel, Some(room.as_str())).await;
    let b = api.item(&towel, Some(room.as_str())).await;

    let collected = api
        .send(
            Method::POST,
            "/api/laundry/collect",
            json!({ "room_id": room, "item_ids": [a, b] }),
        )
        .await;
    assert_eq!(collected["collected"], 2);

    for id in [&a, &b] {
        let item = api.get(&format!("/api/linen-items/{}", id)).await;
        assert_eq!(item["status"], "in_wash");
        assert_eq!(item["room_id"], Value::Null);
    }
    let washes = api.get(&format!("/api/movements?movement_type=wash&room_id={}", room)).await;
    assert_eq!(washes.as_array().unwrap().len(), 2);

    let laundry_ids: Vec<Value> = collected["laundry"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].clone())
        .collect();
    let washed = api
        .send(Method::POST, "/api/laundry/wash", json!({ "laundry_ids": laundry_ids }))
        .await;
    assert_eq!(washed["washed"], 2);

    let delivered = api
        .send(
            Method::POST,
            "/api/laundry/deliver",
            json!({ "laundry_ids": laundry_ids, "destination": "STOCK" }),
        )
        .await;
    assert_eq!(delivered["delivered"], 2);
    assert_eq!(delivered["destination"], "STOCK");

    let stocked = api.get("/api/linen-items?status=stocked").await;
    assert_eq!(stocked.as_array().unwrap().len(), 2);

    // Delivered rows are no longer eligible for washing.
    let first = laundry_ids[0].clone();
    let (status, body) = api
        .call(
            Method::POST,
            "/api/laundry/wash",
            Some(json!({ "laundry_ids": [first] })),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No collected laundry found");
}

#[tokio::test]
async fn cleaning_session_reconciles_and_releases_room() {
    let api = Api::new();
    let sheet = api.linen_type("Sheet").await;
    let room = api.room("204").await;
    api.send(
        Method::PUT,
        "/api/room-config",
        json!({ "room_type": "double", "linen_type_id": sheet, "quantity": 2 }),
    )
    .await;
    api.item(&sheet, Some(room.as_str())).await;
    let spare = api.item(&sheet, None).await;
    api.send(Method::PUT, &format!("/api/rooms/{}/status", room), json!({ "status": "cleaning" }))
        .await;

    let started = api.send(Method::POST, &format!("/api/rooms/{}/checklist", room), json!({})).await;
    assert_eq!(started["created"], true);
    assert_eq!(started["room_config"].as_array().unwrap().len(), 1);
    let checklist = started["checklist"]["id"].as_str().unwrap().to_string();

    let again = api.send(Method::POST, &format!("/api/rooms/{}/checklist", room), json!({})).await;
    assert_eq!(again["created"], false);
    assert_eq!(again["checklist"]["id"], checklist.as_str());

    for expected_created in [2, 0] {
        let outcome = api
            .send(
                Method::POST,
                &format!("/api/checklists/{}/initialize", checklist),
                json!({ "room_id": room }),
            )
            .await;
        assert_eq!(outcome["items_created"], expected_created);
    }

    api.send(
        Method::POST,
        &format!("/api/checklists/{}/items", checklist),
        json!({ "linen_type_id": sheet, "linen_item_id": spare }),
    )
    .await;

    let detail = api.get(&format!("/api/checklists/{}", checklist)).await;
    assert_eq!(detail["items"].as_array().unwrap().len(), 2);
    assert!(detail["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|entry| entry["status"] == "present"));
    assert_eq!(detail["current_room_items"].as_array().unwrap().len(), 2);

    let done = api
        .send(Method::POST, &format!("/api/checklists/{}/complete", checklist), json!({}))
        .await;
    assert_eq!(done["room_released"], true);
    assert_eq!(done["warnings"], json!({ "missing_items": 0, "damaged_items": 0 }));

    let room_row = api.get(&format!("/api/rooms/{}", room)).await;
    assert_eq!(room_row["status"], "available");
    let current = api.get(&format!("/api/rooms/{}/checklist/current", room)).await;
    assert_eq!(current, Value::Null);

    let (status, _) = api
        .call(
            Method::POST,
            &format!("/api/checklists/{}/complete", checklist),
            Some(json!({})),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn replacement_during_cleaning_swaps_items() {
    let api = Api::new();
    let sheet = api.linen_type("Sheet").await;
    let room = api.room("305").await;
    let worn = api.item(&sheet, Some(room.as_str())).await;
    let fresh = api.item(&sheet, None).await;

    let started = api.send(Method::POST, &format!("/api/rooms/{}/checklist", room), json!({})).await;
    let checklist = started["checklist"]["id"].as_str().unwrap().to_string();
    api.send(
        Method::POST,
        &format!("/api/checklists/{}/initialize", checklist),
        json!({ "room_id": room }),
    )
    .await;
    let detail = api.get(&format!("/api/checklists/{}", checklist)).await;
    let entry = detail["items"][0]["id"].as_str().unwrap().to_string();

    let updated = api
        .send(
            Method::PATCH,
            &format!("/api/checklist-items/{}", entry),
            json!({ "status": "replaced", "replacement_item_id": fresh }),
        )
        .await;
    assert_eq!(updated["status"], "replaced");
    assert_eq!(updated["linen_item_id"], fresh.as_str());

    let worn_row = api.get(&format!("/api/linen-items/{}", worn)).await;
    assert_eq!(worn_row["status"], "damaged");
    assert_eq!(worn_row["room_id"], Value::Null);
    let fresh_row = api.get(&format!("/api/linen-items/{}", fresh)).await;
    assert_eq!(fresh_row["status"], "clean");
    assert_eq!(fresh_row["room_id"], room.as_str());

    let damaged = api.get("/api/linen-items/damaged").await;
    assert_eq!(damaged.as_array().unwrap().len(), 1);

    let (status, _) = api
        .call(
            Method::PATCH,
            &format!("/api/checklist-items/{}", entry),
            Some(json!({ "status": "replaced" })),
            true,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
