use std::time::Duration;

use sea_orm::sea_query::Table;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{info, warn};

use crate::adapters::drinks_sea;
use crate::config::db::DbSettings;
use crate::entities::drinks;
use crate::error::AppError;
use crate::repos::drinks::{create_drink, Ingredient, NewDrink};

/// Get database engine name for logging
fn db_engine(url: &str) -> &'static str {
    if url.starts_with("sqlite:") {
        "sqlite"
    } else {
        "postgresql"
    }
}

fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && url.contains(":memory:")
}

/// Open a connection pool for `url`. Does not touch the schema.
pub async fn connect_db(url: &str) -> Result<DatabaseConnection, AppError> {
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    // Every in-memory SQLite connection is its own database; keep exactly one.
    if is_sqlite_memory(url) {
        options.max_connections(1).min_connections(1);
    }

    let conn = Database::connect(options).await?;
    info!(engine = db_engine(url), "database.connected");
    Ok(conn)
}

/// Create the drinks table from its entity definition if it is missing.
/// With `reset` the table is dropped first.
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C, reset: bool) -> Result<(), AppError> {
    let backend = conn.get_database_backend();

    if reset {
        warn!("database.reset drinks table dropped");
        let drop = Table::drop().table(drinks::Entity).if_exists().to_owned();
        conn.execute(backend.build(&drop)).await?;
    }

    let schema = Schema::new(backend);
    let mut create = schema.create_table_from_entity(drinks::Entity);
    create.if_not_exists();
    conn.execute(backend.build(&create)).await?;
    Ok(())
}

/// Insert the demo drink when the table is empty. Returns whether a row was added.
pub async fn seed_demo<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<bool, AppError> {
    if drinks_sea::count(conn).await? > 0 {
        return Ok(false);
    }

    create_drink(
        conn,
        NewDrink {
            title: "water".to_string(),
            recipe: vec![Ingredient {
                name: "water".to_string(),
                color: "blue".to_string(),
                parts: 1,
            }],
        },
    )
    .await?;
    info!("database.seeded demo drink");
    Ok(true)
}

/// Connect, ensure the schema and optionally seed, per `settings`.
pub async fn bootstrap_db(settings: &DbSettings) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(&settings.url).await?;
    ensure_schema(&conn, settings.reset_on_start).await?;
    if settings.seed_demo {
        seed_demo(&conn).await?;
    }
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::drinks::list_drinks;

    async fn memory_db() -> DatabaseConnection {
        bootstrap_db(&DbSettings::new("sqlite::memory:"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let conn = memory_db().await;
        ensure_schema(&conn, false).await.unwrap();
        assert!(list_drinks(&conn).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_demo_only_once() {
        let conn = memory_db().await;
        assert!(seed_demo(&conn).await.unwrap());
        assert!(!seed_demo(&conn).await.unwrap());

        let drinks = list_drinks(&conn).await.unwrap();
        assert_eq!(drinks.len(), 1);
        assert_eq!(drinks[0].title, "water");
        assert_eq!(drinks[0].recipe[0].color, "blue");
    }

    #[tokio::test]
    async fn test_reset_drops_existing_rows() {
        let conn = memory_db().await;
        seed_demo(&conn).await.unwrap();

        ensure_schema(&conn, true).await.unwrap();
        assert!(list_drinks(&conn).await.unwrap().is_empty());
    }

    #[test]
    fn test_engine_detection() {
        assert_eq!(db_engine("sqlite::memory:"), "sqlite");
        assert_eq!(db_engine("postgresql://u:p@h/db"), "postgresql");
        assert!(is_sqlite_memory("sqlite::memory:"));
        assert!(!is_sqlite_memory("sqlite://coffee.db?mode=rwc"));
    }
}
