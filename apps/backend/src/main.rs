use actix_web::{web, App, HttpServer};
use coffee_backend::config::auth::AuthSettings;
use coffee_backend::config::db::DbSettings;
use coffee_backend::config::server::ServerSettings;
use coffee_backend::infra::state::build_state;
use coffee_backend::middleware::request_trace::RequestTrace;
use coffee_backend::middleware::structured_logger::StructuredLogger;
use coffee_backend::routes;
use tracing::info;

mod telemetry;

fn exit_with(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("❌ {context}: {err}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker-compose env_file, or `set -a; . ./.env; set +a` locally).
    let server = ServerSettings::from_env().unwrap_or_else(|e| exit_with("server settings", e));
    let auth = AuthSettings::from_env().unwrap_or_else(|e| exit_with("auth settings", e));
    let db = DbSettings::from_env().unwrap_or_else(|e| exit_with("database settings", e));

    info!(
        domain = %auth.domain,
        audience = %auth.audience,
        algorithm = ?auth.algorithm,
        jwks_url = %auth.jwks_url(),
        "auth.configured"
    );

    let app_state = match build_state().with_auth(auth).with_db(db).build().await {
        Ok(state) => state,
        Err(e) => exit_with("Failed to build application state", e),
    };

    let data = web::Data::new(app_state);
    let (host, port) = server.bind_addr();
    info!(%host, port, "server.starting");

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
