//! Shared fixtures for the HTTP integration tests.
//!
//! The event log has four cases:
//!
//! - A, B: CREATE → UPDATE → CLOSE (variant 1)
//! - C: CREATE → CLOSE (variant 2)
//! - D: CREATE → UPDATE → REVIEW → UPDATE → CLOSE (variant 3, one rework)
//!
//! Case A starts on 2024-04-01, B on 2024-04-02, C on 2024-04-03 and D on
//! 2024-04-04, all at 09:00 UTC.
#![allow(dead_code)]

pub mod strategies;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use process_mining::config::AppConfig;
use process_mining::models::{Activity, Bill, Case, OrderItem};
use process_mining::services::AssistantService;
use process_mining::web::{create_app, AppState};
use process_mining::{ActivityName, MemoryProcessStore};

pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, day, 9, 0, 0).unwrap()
}

pub fn case(id: &str, case_type: &str, branch: &str, ramo: &str, broker: &str) -> Case {
    Case {
        id: id.to_string(),
        case_type: case_type.to_string(),
        branch: branch.to_string(),
        ramo: ramo.to_string(),
        broker: broker.to_string(),
        state: "open".to_string(),
        client: "acme".to_string(),
        creator: "alice".to_string(),
        created_at: day(1),
    }
}

pub fn activity(
    id: i64,
    case_id: &str,
    name: ActivityName,
    start: DateTime<Utc>,
    offset_minutes: i64,
) -> Activity {
    Activity {
        id,
        case_id: case_id.to_string(),
        name,
        timestamp: start + Duration::minutes(offset_minutes),
        tpt: 0.0,
        user: "alice".to_string(),
        user_type: if name == ActivityName::Create {
            "system".to_string()
        } else {
            "human".to_string()
        },
        automatic: name == ActivityName::Create,
        rework: false,
        case_index: format!("{case_id}-idx"),
    }
}

pub fn cases() -> Vec<Case> {
    vec![
        case("A", "claim", "north", "auto", "broker-1"),
        case("B", "claim", "south", "home", "broker-2"),
        case("C", "quote", "north", "auto", "broker-1"),
        case("D", "claim", "north", "life", "broker-3"),
    ]
}

pub fn activities() -> Vec<Activity> {
    use ActivityName::*;

    let mut rework = activity(12, "D", Update, day(4), 40);
    rework.rework = true;

    vec![
        activity(1, "A", Create, day(1), 0),
        activity(2, "A", Update, day(1), 10),
        activity(3, "A", Close, day(1), 20),
        activity(4, "B", Create, day(2), 0),
        activity(5, "B", Update, day(2), 30),
        activity(6, "B", Close, day(2), 60),
        activity(7, "C", Create, day(3), 0),
        activity(8, "C", Close, day(3), 5),
        activity(9, "D", Create, day(4), 0),
        activity(10, "D", Update, day(4), 10),
        activity(11, "D", Review, day(4), 20),
        rework,
        activity(13, "D", Close, day(4), 50),
    ]
}

pub fn order_item(id: i64, order_id: &str, free_text: bool, branch: &str) -> OrderItem {
    OrderItem {
        id,
        order_id: order_id.to_string(),
        material_code: if free_text {
            String::new()
        } else {
            format!("MAT-{id}")
        },
        description: format!("item {id}"),
        free_text,
        quantity: 2.0,
        unit_price: 10.5,
        branch: branch.to_string(),
        order_date: day(id as u32),
        contract_used: !free_text,
    }
}

pub fn order_items() -> Vec<OrderItem> {
    vec![
        order_item(1, "PO-1", true, "north"),
        order_item(2, "PO-1", true, "north"),
        order_item(3, "PO-2", false, "south"),
        order_item(4, "PO-3", true, "south"),
    ]
}

pub fn bills() -> Vec<Bill> {
    let bill = |id: i64, case_id: &str, amount: f64, paid: bool| Bill {
        id,
        case_id: case_id.to_string(),
        amount,
        currency: "EUR".to_string(),
        issued_at: day(5),
        paid,
    };
    vec![
        bill(1, "A", 120.0, true),
        bill(2, "B", 80.0, false),
        bill(3, "D", 42.5, true),
    ]
}

pub fn seeded_store() -> MemoryProcessStore {
    let store = MemoryProcessStore::new();
    store.insert_cases(cases());
    store.insert_activities(activities());
    store.insert_order_items(order_items());
    store.insert_bills(bills());
    store
}

pub fn state_with(config: AppConfig, store: MemoryProcessStore) -> AppState {
    AppState::new(config, Arc::new(store)).expect("state should build")
}

pub fn seeded_app() -> Router {
    create_app(state_with(AppConfig::default(), seeded_store()))
}

pub fn app_with_assistant(assistant: AssistantService) -> Router {
    create_app(state_with(AppConfig::default(), seeded_store()).with_assistant(assistant))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn error_message(&self) -> &str {
        self.body["error"]["message"].as_str().unwrap_or_default()
    }

    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }

    pub fn results(&self) -> &Vec<Value> {
        self.body["results"]
            .as_array()
            .expect("response should carry a results array")
    }

    pub fn count(&self) -> u64 {
        self.body["count"].as_u64().expect("response should carry a count")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should not fail");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

pub fn ids(response: &TestResponse) -> Vec<i64> {
    response
        .results()
        .iter()
        .filter_map(|row| row["id"].as_i64())
        .collect()
}
