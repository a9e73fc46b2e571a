//! Payment list, detail and create pages.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::*;

#[tokio::test]
async fn test_list_renders_page_from_service() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .and(query_param("limit", "20"))
        .and(query_param("offset", "0"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                payment_json("pay_alpha", "succeeded", 10000),
                payment_json("pay_beta", "failed", 2500),
            ],
            57,
        )))
        .expect(1)
        .mount(&t.payments)
        .await;

    let response = t.send(get("/dashboard/payments", Some(&signed_in.cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Order pay_alpha"));
    assert!(body.contains("Order pay_beta"));
    assert!(body.contains(r#"href="/dashboard/payments/pay_alpha""#));
    assert!(body.contains("badge-success"));
    assert!(body.contains("Showing 1 to 20 of 57 payments"));
}

#[tokio::test]
async fn test_list_ignores_garbage_offset() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .expect(1)
        .mount(&t.payments)
        .await;

    let response = t
        .send(get("/dashboard/payments?offset=banana", Some(&signed_in.cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("No payments found"));
    assert!(body.contains("Create your first payment to get started"));
}

#[tokio::test]
async fn test_list_search_filters_loaded_page() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                payment_json("pay_alpha", "succeeded", 10000),
                payment_json("pay_beta", "succeeded", 2500),
                payment_json("pay_alphabet", "failed", 100),
            ],
            3,
        )))
        .mount(&t.payments)
        .await;

    let body = body_string(
        t.send(get(
            "/dashboard/payments?q=ALPHA&status=succeeded",
            Some(&signed_in.cookie),
        ))
        .await,
    )
    .await;

    assert!(body.contains("Order pay_alpha<"));
    assert!(!body.contains("Order pay_beta"));
    assert!(!body.contains("Order pay_alphabet"));

    let none = body_string(
        t.send(get("/dashboard/payments?q=espresso", Some(&signed_in.cookie)))
            .await,
    )
    .await;
    assert!(none.contains("No results on this page"));
}

#[tokio::test]
async fn test_list_shows_upstream_error_inline() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_json("internal", "database down")))
        .mount(&t.payments)
        .await;

    let response = t.send(get("/dashboard/payments", Some(&signed_in.cookie))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("API error: database down"));
    assert!(body.contains("role=\"alert\""));
}

#[tokio::test]
async fn test_new_payment_form_carries_csrf_token() {
    let t = test_app().await;
    let signed_in = t.sign_in();

    let body = body_string(t.send(get("/dashboard/payments/new", Some(&signed_in.cookie))).await).await;

    assert!(body.contains(&format!(r#"name="csrf_token" value="{}""#, signed_in.csrf())));
    assert!(body.contains(r#"<option value="stripe" selected>Stripe</option>"#));
    assert!(body.contains(r#"<option value="SEK" selected>SEK</option>"#));
}

#[tokio::test]
async fn test_create_payment_posts_and_redirects() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .and(header_exists("idempotency-key"))
        .and(body_partial_json(json!({
            "provider": "swish",
            "amount": 15000,
            "currency": "SEK",
            "description": "Coffee beans"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(payment_json("pay_new", "pending", 15000)))
        .expect(1)
        .mount(&t.payments)
        .await;

    let response = t
        .send(post_form(
            "/dashboard/payments",
            &signed_in.cookie,
            &[
                ("csrf_token", signed_in.csrf()),
                ("provider", "swish"),
                ("amount", "15000"),
                ("currency", "SEK"),
                ("description", "Coffee beans"),
                ("statement_descriptor", ""),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/payments?notice=created");
}

#[tokio::test]
async fn test_create_payment_validation_rerenders_form() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&t.payments)
        .await;

    let response = t
        .send(post_form(
            "/dashboard/payments",
            &signed_in.cookie,
            &[
                ("csrf_token", signed_in.csrf()),
                ("provider", "stripe"),
                ("amount", "0"),
                ("currency", "EUR"),
                ("description", "Kept <value>"),
            ],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response).await;
    assert!(body.contains("Amount must be greater than 0"));
    assert!(body.contains("Kept &lt;value&gt;"));
    assert!(body.contains(r#"<option value="EUR" selected>EUR</option>"#));
}

#[tokio::test]
async fn test_create_payment_rejects_bad_csrf() {
    let t = test_app().await;
    let signed_in = t.sign_in();

    let response = t
        .send(post_form(
            "/dashboard/payments",
            &signed_in.cookie,
            &[("csrf_token", "forged"), ("amount", "100")],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_payment_upstream_failure_keeps_form() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_json("invalid_amount", "amount too large")))
        .mount(&t.payments)
        .await;

    let response = t
        .send(post_form(
            "/dashboard/payments",
            &signed_in.cookie,
            &[("csrf_token", signed_in.csrf()), ("amount", "999999999")],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_string(response).await;
    assert!(body.contains("API error: amount too large"));
    assert!(body.contains(r#"value="999999999""#));
}

#[tokio::test]
async fn test_create_payment_keeps_rejected_amount() {
    let t = test_app().await;
    let signed_in = t.sign_in();

    for amount in ["-100", "abc"] {
        let response = t
            .send(post_form(
                "/dashboard/payments",
                &signed_in.cookie,
                &[("csrf_token", signed_in.csrf()), ("amount", amount)],
            ))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains(&format!(r#"value="{}""#, amount)));
    }
}

#[tokio::test]
async fn test_create_payment_timeout_rerenders_with_gateway_timeout() {
    let t = test_app_with(|config| config.http_timeout_secs = 1).await;
    let signed_in = t.sign_in();
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(payment_json("pay_slow", "pending", 5000))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&t.payments)
        .await;

    let response = t
        .send(post_form(
            "/dashboard/payments",
            &signed_in.cookie,
            &[("csrf_token", signed_in.csrf()), ("amount", "5000")],
        ))
        .await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    let body = body_string(response).await;
    assert!(body.contains("API error: request timed out"));
    assert!(body.contains(r#"value="5000""#));
}

#[tokio::test]
async fn test_each_create_sends_its_own_idempotency_key() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("POST"))
        .and(path("/api/payments"))
        .and(header_exists("Idempotency-Key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(payment_json("pay_new", "pending", 100)))
        .expect(2)
        .mount(&t.payments)
        .await;

    for _ in 0..2 {
        let response = t
            .send(post_form(
                "/dashboard/payments",
                &signed_in.cookie,
                &[("csrf_token", signed_in.csrf()), ("amount", "100")],
            ))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let keys: Vec<String> = t
        .payments
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.headers.get("idempotency-key"))
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(keys.len(), 2);
    assert_ne!(keys[0], keys[1]);
    assert!(uuid::Uuid::parse_str(&keys[0]).is_ok());
}

#[tokio::test]
async fn test_detail_shows_refunds_and_refund_action() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments/pay_alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_alpha", "succeeded", 10000)))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/pay_alpha/refunds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([refund_json("ref_1", "pay_alpha", 2500)])))
        .mount(&t.payments)
        .await;

    let response = t
        .send(get("/dashboard/payments/pay_alpha", Some(&signed_in.cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Issue refund"));
    assert!(body.contains("/dashboard/refunds/new?payment_id=pay_alpha"));
    assert!(body.contains(r#"href="/dashboard/refunds/ref_1""#));
    assert!(body.contains("Duplicate"));
}

#[tokio::test]
async fn test_detail_of_failed_payment_has_no_refund_action() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments/pay_beta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_beta", "failed", 2500)))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/pay_beta/refunds"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&t.payments)
        .await;

    let body = body_string(t.send(get("/dashboard/payments/pay_beta", Some(&signed_in.cookie))).await).await;

    assert!(!body.contains("Issue refund"));
    assert!(body.contains("No refunds for this payment"));
}

#[tokio::test]
async fn test_detail_not_found() {
    let t = test_app().await;
    let signed_in = t.sign_in();
    Mock::given(method("GET"))
        .and(path("/api/payments/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_json("not_found", "Payment not found")))
        .mount(&t.payments)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/payments/missing/refunds"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&t.payments)
        .await;

    let response = t
        .send(get("/dashboard/payments/missing", Some(&signed_in.cookie)))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Payment not found"));
}
