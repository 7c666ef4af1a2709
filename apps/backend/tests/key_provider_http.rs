mod common;

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use backend_test_support::jwt::{trusted_jwks, SigningKey, TokenBuilder, TEST_AUDIENCE, TEST_ISSUER};
use coffee_backend::auth::keys::{HttpKeySource, KeyProvider, KeySource};
use coffee_backend::auth::{AuthErrorCode, TokenVerifier};
use jsonwebtoken::Algorithm;

/// Local identity-provider stand-in serving JWKS documents.
struct FakeProvider {
    base_url: String,
    hits: Arc<AtomicUsize>,
    handle: ServerHandle,
}

impl FakeProvider {
    fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let port = listener.local_addr().expect("local addr").port();

        let counter = hits.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(counter.clone()))
                .route(
                    "/.well-known/jwks.json",
                    web::get().to(|hits: web::Data<Arc<AtomicUsize>>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        HttpResponse::Ok().json(trusted_jwks())
                    }),
                )
                .route(
                    "/broken",
                    web::get().to(|| async { HttpResponse::InternalServerError().finish() }),
                )
                .route(
                    "/garbage",
                    web::get().to(|| async { HttpResponse::Ok().body("<html>nope</html>") }),
                )
        })
        .workers(1)
        .listen(listener)
        .expect("listen")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            hits,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    async fn stop(self) {
        self.handle.stop(false).await;
    }
}

fn provider_for(url: String) -> KeyProvider {
    KeyProvider::new(Arc::new(HttpKeySource::new(url).expect("http client")))
}

#[actix_web::test]
async fn test_fetches_and_caches_jwks() {
    let idp = FakeProvider::start();
    let keys = provider_for(idp.url("/.well-known/jwks.json"));

    let set = keys.signing_keys().await.unwrap();
    assert!(set.contains_key(SigningKey::Trusted.kid()));

    keys.key_for(SigningKey::Trusted.kid()).await.unwrap();
    assert_eq!(idp.hits(), 1);

    idp.stop().await;
}

#[actix_web::test]
async fn test_unknown_kid_costs_exactly_one_extra_fetch() {
    let idp = FakeProvider::start();
    let keys = provider_for(idp.url("/.well-known/jwks.json"));

    keys.signing_keys().await.unwrap();
    let missing = keys.key_for(SigningKey::Rogue.kid()).await.unwrap();

    assert!(missing.is_none());
    assert_eq!(idp.hits(), 2);

    idp.stop().await;
}

#[actix_web::test]
async fn test_verifier_end_to_end_over_http() {
    let idp = FakeProvider::start();
    let verifier = TokenVerifier::new(
        provider_for(idp.url("/.well-known/jwks.json")),
        TEST_ISSUER,
        TEST_AUDIENCE,
        Algorithm::RS256,
    );

    let token = TokenBuilder::new().permissions(&["post:drinks"]).sign();
    let claims = verifier.verify(&token).await.unwrap();
    assert!(claims.has_permission("post:drinks"));

    idp.stop().await;
}

#[actix_web::test]
async fn test_server_error_is_invalid_header() {
    let idp = FakeProvider::start();

    let source = HttpKeySource::new(idp.url("/broken")).unwrap();
    assert!(source.fetch().await.is_err());

    let err = provider_for(idp.url("/broken"))
        .signing_keys()
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.code(), AuthErrorCode::InvalidHeader);

    idp.stop().await;
}

#[actix_web::test]
async fn test_garbage_document_is_invalid_header() {
    let idp = FakeProvider::start();

    let err = provider_for(idp.url("/garbage"))
        .signing_keys()
        .await
        .unwrap_err();
    assert_eq!(err.code(), AuthErrorCode::InvalidHeader);

    idp.stop().await;
}

#[actix_web::test]
async fn test_unreachable_endpoint_is_invalid_header() {
    // Port 1 on loopback is reserved and closed.
    let err = provider_for("http://127.0.0.1:1/.well-known/jwks.json".to_string())
        .signing_keys()
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.code(), AuthErrorCode::InvalidHeader);
}
