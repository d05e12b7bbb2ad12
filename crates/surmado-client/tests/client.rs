//! Integration tests for `ReportClient` create/get using wiremock HTTP mocks.

use serde_json::json;
use surmado_client::{ClientError, ReportClient};
use surmado_core::{
    Product, ReportRequest, ReportStatus, ScanRequest, SignalRequest, SolutionsRequest, Tier,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ReportClient {
    ReportClient::with_base_url("test-key", 5, base_url)
        .expect("client construction should not fail")
        .with_retry(0, 0)
}

fn scan_request() -> ReportRequest {
    ScanRequest {
        url: "https://example.com".to_owned(),
        brand_name: "Example Brand".to_owned(),
        email: "you@example.com".to_owned(),
        tier: Tier::Basic,
    }
    .into()
}

fn signal_request() -> ReportRequest {
    SignalRequest {
        url: "https://example.com".to_owned(),
        brand_name: "Example Brand".to_owned(),
        email: "you@example.com".to_owned(),
        industry: "E-commerce".to_owned(),
        location: "United States".to_owned(),
        persona: "Small business owners".to_owned(),
        pain_points: "Finding reliable vendors, managing inventory costs".to_owned(),
        brand_details: "Affordable e-commerce solutions".to_owned(),
        direct_competitors: "Shopify, BigCommerce, WooCommerce".to_owned(),
        tier: Tier::Pro,
    }
    .into()
}

#[tokio::test]
async fn create_scan_report_posts_body_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/scan"))
        .and(header("X-API-Key", "test-key"))
        .and(body_json(json!({
            "url": "https://example.com",
            "brand_name": "Example Brand",
            "email": "you@example.com",
            "tier": "basic"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"report_id": "rpt_abc123", "credits_used": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let handle = client
        .create_report(&scan_request())
        .await
        .expect("should create report");

    assert_eq!(handle.report_id, "rpt_abc123");
    assert_eq!(handle.credits_used, 1);
}

#[tokio::test]
async fn create_signal_report_sends_competitors_as_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/signal"))
        .and(body_json(json!({
            "url": "https://example.com",
            "brand_name": "Example Brand",
            "email": "you@example.com",
            "industry": "E-commerce",
            "location": "United States",
            "persona": "Small business owners",
            "pain_points": "Finding reliable vendors, managing inventory costs",
            "brand_details": "Affordable e-commerce solutions",
            "direct_competitors": "Shopify, BigCommerce, WooCommerce",
            "tier": "pro"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"report_id": "rpt_sig", "credits_used": 2})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let handle = client.create_report(&signal_request()).await.unwrap();
    assert_eq!(handle.credits_used, 2);
}

#[tokio::test]
async fn create_solutions_report_targets_solutions_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/reports/solutions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"report_id": "rpt_sol", "credits_used": 2})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request: ReportRequest = SolutionsRequest {
        brand_name: "Example Brand".to_owned(),
        email: "you@example.com".to_owned(),
        business_story: "Sustainable products, $2M revenue".to_owned(),
        decision: "Launch a subscription box?".to_owned(),
        success: "$500K recurring revenue in 18 months".to_owned(),
        timeline: "6 months to pilot".to_owned(),
        scale_indicator: "50K customers".to_owned(),
    }
    .into();

    let client = test_client(&format!("{}/v1", server.uri()));
    let handle = client.create_report(&request).await.unwrap();
    assert_eq!(handle.report_id, "rpt_sol");
}

#[tokio::test]
async fn invalid_tier_is_rejected_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let request: ReportRequest = ScanRequest {
        url: "https://example.com".to_owned(),
        brand_name: "Example Brand".to_owned(),
        email: "you@example.com".to_owned(),
        tier: Tier::Pro,
    }
    .into();

    let client = test_client(&server.uri());
    let err = client.create_report(&request).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)), "got: {err:?}");
}

#[tokio::test]
async fn create_report_surfaces_api_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/scan"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({"error": "insufficient credits"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.create_report(&scan_request()).await.unwrap_err();

    match err {
        ClientError::Api { status, body } => {
            assert_eq!(status, 402);
            assert_eq!(body, Some(json!({"error": "insufficient credits"})));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn api_error_without_json_body_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/rpt_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_report("rpt_missing").await.unwrap_err();
    assert!(
        matches!(err, ClientError::Api { status: 404, body: None }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn create_report_does_not_retry_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/scan"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(3, 0);
    let err = client.create_report(&scan_request()).await.unwrap_err();
    assert_eq!(err.api_status(), Some(503));
}

#[tokio::test]
async fn get_report_parses_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/rpt_abc123"))
        .and(header("X-API-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "report_id": "rpt_abc123",
            "status": "completed",
            "product": "scan",
            "download_url": "https://files.example/rpt_abc123.pdf",
            "intelligence_download_url": "https://files.example/rpt_abc123.json",
            "completed_at": "2025-01-15T10:45:00Z"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client.get_report("rpt_abc123").await.unwrap();

    assert_eq!(snapshot.status, ReportStatus::Completed);
    assert_eq!(snapshot.product, Some(Product::Scan));
    assert_eq!(snapshot.result.artifacts().len(), 2);
}

#[tokio::test]
async fn get_report_tolerates_naive_completed_at() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/rpt_naive"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "report_id": "rpt_naive",
            "status": "completed",
            "download_url": "https://files.example/rpt_naive.pdf",
            "completed_at": "2025-01-15T10:45:00.123456"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client.get_report("rpt_naive").await.unwrap();

    assert_eq!(snapshot.status, ReportStatus::Completed);
    assert!(snapshot.result.completed_at.is_some());
    assert_eq!(snapshot.result.artifacts().len(), 1);
}

#[tokio::test]
async fn get_report_fills_missing_report_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/rpt_abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let snapshot = client.get_report("rpt_abc123").await.unwrap();
    assert_eq!(snapshot.report_id, "rpt_abc123");
    assert_eq!(snapshot.status, ReportStatus::Pending);
}

#[tokio::test]
async fn create_then_get_returns_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/scan"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"report_id": "rpt_new", "credits_used": 1})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reports/rpt_new"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"report_id": "rpt_new", "status": "processing"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let handle = client.create_report(&scan_request()).await.unwrap();
    let snapshot = client.get_report(&handle.report_id).await.unwrap();
    assert_eq!(snapshot.status, ReportStatus::Processing);
}

#[tokio::test]
async fn get_report_retries_transient_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/rpt_flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reports/rpt_flaky"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"report_id": "rpt_flaky", "status": "processing"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let snapshot = client.get_report("rpt_flaky").await.unwrap();
    assert_eq!(snapshot.status, ReportStatus::Processing);
}

#[tokio::test]
async fn get_report_rejects_malformed_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/rpt_bad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_report("rpt_bad").await.unwrap_err();
    assert!(matches!(err, ClientError::Deserialize { .. }), "got: {err:?}");
}
