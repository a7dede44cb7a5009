//! # Order Item and Bill API Tests

mod common;

use axum::http::StatusCode;
use common::*;
use process_mining::config::AppConfig;
use process_mining::web::create_app;

#[tokio::test]
async fn test_free_text_flag_partitions_order_items() {
    let app = seeded_app();

    let all = get(&app, "/api/order-items/").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.count(), 4);
    assert_eq!(all.results()[0]["order"], "PO-1");

    let free_text = get(&app, "/api/order-items/?free_text=true").await;
    let catalog = get(&app, "/api/order-items/?free_text=false").await;
    assert_eq!(ids(&free_text), vec![1, 2, 4]);
    assert_eq!(ids(&catalog), vec![3]);
    assert_eq!(free_text.count() + catalog.count(), all.count());
}

#[tokio::test]
async fn test_order_item_filters() {
    let app = seeded_app();

    let south = get(&app, "/api/order-items/?branch=south").await;
    assert_eq!(ids(&south), vec![3, 4]);

    let order = get(&app, "/api/order-items/?order=PO-1&free_text=true").await;
    assert_eq!(ids(&order), vec![1, 2]);

    let material = get(&app, "/api/order-items/?material_code=MAT-3").await;
    assert_eq!(ids(&material), vec![3]);

    let window = get(&app, "/api/order-items/?start_date=2024-04-02&end_date=2024-04-03").await;
    assert_eq!(ids(&window), vec![2, 3]);
}

#[tokio::test]
async fn test_invalid_free_text_value_is_rejected() {
    let app = seeded_app();

    for uri in [
        "/api/order-items/?free_text=maybe",
        "/api/order-items/?free_text=",
        "/api/order-items/?free_text=TRUE",
        "/api/order-items/?free_text=%20true%20",
        "/api/order-items/?free_text=true&free_text=maybe",
        "/api/order-items/?free_text=true&free_text=false",
        "/api/order-items/free-text-summary?free_text=",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(response.error_message().contains("free_text"), "{uri}");
    }

    let repeated = get(&app, "/api/order-items/?free_text=true&free_text=true").await;
    assert_eq!(ids(&repeated), vec![1, 2, 4]);
}

#[tokio::test]
async fn test_free_text_summary() {
    let app = seeded_app();
    let response = get(&app, "/api/order-items/free-text-summary").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 4);
    assert_eq!(response.body["free_text_items"], 3);
    assert_eq!(response.body["catalog_items"], 1);
    assert_eq!(response.body["free_text_rate"], 75.0);
    assert_eq!(response.body["status"], "free-text-dominant");

    // The flag itself does not narrow the summary
    let flagged = get(&app, "/api/order-items/free-text-summary?free_text=false").await;
    assert_eq!(flagged.body, response.body);

    let south = get(&app, "/api/order-items/free-text-summary?branch=south").await;
    assert_eq!(south.body["total_items"], 2);
    assert_eq!(south.body["free_text_rate"], 50.0);
    assert_eq!(south.body["status"], "catalog-dominant");
}

#[tokio::test]
async fn test_bills_filter_by_case_and_paid() {
    let app = seeded_app();

    let all = get(&app, "/api/bills/").await;
    assert_eq!(all.count(), 3);
    assert_eq!(all.results()[0]["case"], "A");
    assert_eq!(all.results()[0]["amount"], 120.0);

    let paid = get(&app, "/api/bills/?paid=true").await;
    assert_eq!(ids(&paid), vec![1, 3]);

    let unpaid_b = get(&app, "/api/bills/?case=B&paid=false").await;
    assert_eq!(ids(&unpaid_b), vec![2]);

    let invalid = get(&app, "/api/bills/?paid=yes").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contract_usage_without_window_has_no_previous_period() {
    let app = seeded_app();
    let response = get(&app, "/api/order-items/contract-usage").await;

    assert_eq!(response.status, StatusCode::OK);
    let current = &response.body["current"];
    assert_eq!(current["orders"], 3);
    assert_eq!(current["order_items"], 4);
    assert_eq!(current["order_item_value"], 84.0);
    assert_eq!(current["contract_usage_count"], 1);
    assert_eq!(current["contract_usage_eur"], 21.0);
    assert_eq!(current["contract_usage_rate"], 25.0);
    assert_eq!(current["contract_available_but_not_used_count"], 0);
    assert!(response.body["previous"].is_null());
    assert!(response.body["previous_start_date"].is_null());
}

#[tokio::test]
async fn test_contract_usage_compares_with_previous_period() {
    let app = seeded_app();
    let response = get(
        &app,
        "/api/order-items/contract-usage?start_date=2024-04-03&end_date=2024-04-04",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["current"]["order_items"], 2);
    assert_eq!(response.body["current"]["orders"], 2);
    assert_eq!(response.body["current"]["contract_usage_rate"], 50.0);

    assert_eq!(response.body["previous_start_date"], "2024-04-01");
    assert_eq!(response.body["previous_end_date"], "2024-04-02");
    let previous = &response.body["previous"];
    assert_eq!(previous["order_items"], 2);
    assert_eq!(previous["orders"], 1);
    assert_eq!(previous["order_item_value"], 42.0);
    assert_eq!(previous["contract_usage_rate"], 0.0);
}

#[tokio::test]
async fn test_contract_usage_counts_unused_contracts_per_branch() {
    let store = seeded_store();
    let mut unused = order_item(5, "PO-4", false, "north");
    unused.contract_used = false;
    store.insert_order_items([unused]);
    let app = create_app(state_with(AppConfig::default(), store));

    let kpi = get(&app, "/api/order-items/contract-usage").await;
    assert_eq!(kpi.body["current"]["contract_usage_count"], 1);
    assert_eq!(kpi.body["current"]["contract_available_but_not_used_count"], 1);
    assert_eq!(kpi.body["current"]["contract_available_but_not_used_eur"], 21.0);
    assert_eq!(kpi.body["current"]["contract_usage_rate"], 20.0);

    let table = get(&app, "/api/order-items/contract-usage/branches").await;
    assert_eq!(table.status, StatusCode::OK);
    let rows = table.body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["branch"], "north");
    assert_eq!(rows[0]["order_items"], 3);
    assert_eq!(rows[0]["net_order_value"], 63.0);
    assert_eq!(rows[0]["usage_rate"], 0.0);
    assert_eq!(rows[1]["branch"], "south");
    assert_eq!(rows[1]["usage_rate"], 50.0);
    assert_eq!(rows[1]["usage_eur"], 21.0);

    let north = get(&app, "/api/order-items/contract-usage/branches?branch=north").await;
    assert_eq!(north.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_contract_usage_rejects_invalid_filters() {
    let app = seeded_app();

    for uri in [
        "/api/order-items/contract-usage?free_text=",
        "/api/order-items/contract-usage?start_date=2024-04-05&end_date=2024-04-01",
        "/api/order-items/contract-usage/branches?end_date=April",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
    }
}
