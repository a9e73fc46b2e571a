//! Dashboard overview: stats computed from samples of each list.

use axum::http::StatusCode;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::*;

#[tokio::test]
async fn test_dashboard_stats() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                payment_json("pay_1", "succeeded", 1000),
                payment_json("pay_2", "succeeded", 2000),
                payment_json("pay_3", "succeeded", 3000),
                payment_json("pay_4", "failed", 4000),
                payment_json("pay_5", "pending", 5000),
                payment_json("pay_6", "succeeded", 6000),
            ],
            120,
        )))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                subscription_json("sub_1", "active"),
                subscription_json("sub_2", "trialing"),
                subscription_json("sub_3", "canceled"),
            ],
            3,
        )))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/refunds"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 9)))
        .mount(&t.payments)
        .await;

    let response = t.send(get("/dashboard", Some(&signed_in.cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains(r#"<div class="stat">120</div>"#));
    assert!(body.contains("4 succeeded"));
    assert!(body.contains(r#"<div class="stat">2</div>"#));
    assert!(body.contains("66.7%"));
    assert!(body.contains("9 refunds issued"));
    // Only the five most recent payments are listed
    assert!(body.contains("Order pay_5"));
    assert!(!body.contains("Order pay_6"));
}

#[tokio::test]
async fn test_dashboard_shows_error_when_a_list_fails() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/subscriptions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(error_json("unavailable", "try later")))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/refunds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .mount(&t.payments)
        .await;

    let response = t.send(get("/dashboard", Some(&signed_in.cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("API error: try later"));
}
