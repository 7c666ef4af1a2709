mod common;
mod support;

use actix_web::{test, web, HttpResponse};
use coffee_backend::auth::AuthError;
use coffee_backend::AppError;
use common::json_response;
use support::{build_test_state_without_db, create_test_app};

async fn conflict_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::conflict("Example conflict"))
}

async fn auth_handler() -> Result<HttpResponse, AppError> {
    Err(AuthError::token_expired().into())
}

async fn internal_handler() -> Result<HttpResponse, AppError> {
    Err(AppError::internal("connection string leaked here"))
}

fn test_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/_test/conflict", web::get().to(conflict_handler))
        .route("/_test/auth", web::get().to(auth_handler))
        .route("/_test/internal", web::get().to(internal_handler));
}

#[actix_web::test]
async fn test_error_shape() {
    let app = create_test_app(build_test_state_without_db().await)
        .with_routes(test_routes)
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/conflict").to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert!(request_id.is_some_and(|id| !id.is_empty()));
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/json"
    );

    let (status, body) = json_response(resp).await;
    assert_eq!(status, 409);
    assert_eq!(
        body,
        serde_json::json!({
            "success": false,
            "error": 409,
            "message": "Example conflict",
            "code": "conflict"
        })
    );
}

#[actix_web::test]
async fn test_auth_error_keeps_its_status_and_code() {
    let app = create_test_app(build_test_state_without_db().await)
        .with_routes(test_routes)
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/auth").to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], "token_expired");
    assert_eq!(body["message"], "Token expired.");
}

#[actix_web::test]
async fn test_internal_error_hides_detail() {
    let app = create_test_app(build_test_state_without_db().await)
        .with_routes(test_routes)
        .build()
        .await;

    let req = test::TestRequest::get().uri("/_test/internal").to_request();
    let (status, body) = json_response(test::call_service(&app, req).await).await;
    assert_eq!(status, 500);
    assert_eq!(body["message"], "Internal Server Error");
    assert!(!body.to_string().contains("leaked"));
}

#[actix_web::test]
async fn test_request_ids_are_unique() {
    let app = create_test_app(build_test_state_without_db().await)
        .with_routes(test_routes)
        .build()
        .await;

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/_test/conflict").to_request();
        let resp = test::call_service(&app, req).await;
        ids.push(resp.headers().get("x-request-id").unwrap().clone());
    }
    assert_ne!(ids[0], ids[1]);
}
