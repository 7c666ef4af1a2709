#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary that declares `mod common;`
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Status plus parsed JSON body.
pub async fn json_response(resp: ServiceResponse<BoxBody>) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "response body should be JSON ({e}): {}",
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}

/// Assert the uniform error body `{success: false, error, message, code}`.
pub async fn assert_error_body(
    resp: ServiceResponse<BoxBody>,
    expected_status: u16,
    expected_code: &str,
    expected_message: &str,
) {
    assert!(
        resp.headers().contains_key("x-request-id"),
        "error responses should carry x-request-id"
    );
    let (status, json) = json_response(resp).await;
    assert_eq!(status, expected_status, "unexpected status, body: {json}");
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], expected_status);
    assert_eq!(json["code"], expected_code);
    assert_eq!(json["message"], expected_message);
}
