//! SQLite connection pool factory and module migration runner.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

/// Shared pool handed to every controller.
pub type Pool = sqlx::SqlitePool;

/// Migration definition contributed by a module.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("invalid database url '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to connect to database")]
    Connect(#[source] sqlx::Error),

    #[error("migration '{module}/{id}' failed")]
    Migration {
        module: String,
        id: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Options used to open the pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Open a pool against the configured database, creating the file when missing.
///
/// Foreign keys are enforced on every connection so association rows can
/// never point at a missing movie or room.
pub async fn connect(config: &PoolConfig) -> Result<Pool, DbError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|source| DbError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(DbError::Connect)?;

    tracing::info!(
        target: "marquee-db",
        max_connections = config.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

/// Open a single-connection in-memory pool.
///
/// The connection is never recycled: an in-memory SQLite database lives
/// exactly as long as the connection that created it.
pub async fn connect_in_memory() -> Result<Pool, DbError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|source| DbError::InvalidUrl {
            url: "sqlite::memory:".to_string(),
            source,
        })?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(DbError::Connect)
}

/// Round-trip a trivial query to verify the pool is usable.
pub async fn health_check(pool: &Pool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply module migrations in the order given, skipping ones already recorded.
///
/// Each migration runs in its own transaction together with its bookkeeping
/// row. Returns how many migrations were applied by this call.
pub async fn migrate(pool: &Pool, migrations: &[(String, Migration)]) -> Result<usize, DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            module TEXT NOT NULL,
            id TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await?;
        if seen.is_some() {
            tracing::debug!(target: "marquee-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let failed = |source: sqlx::Error| DbError::Migration {
            module: module.clone(),
            id: migration.id,
            source,
        };

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await?;

        tracing::info!(target: "marquee-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> Vec<(String, Migration)> {
        vec![(
            "widgets".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE widgets (id TEXT PRIMARY KEY NOT NULL);
                     CREATE INDEX widgets_id ON widgets(id);",
            },
        )]
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let pool = connect_in_memory().await.unwrap();

        assert_eq!(migrate(&pool, &widgets()).await.unwrap(), 1);
        assert_eq!(migrate(&pool, &widgets()).await.unwrap(), 0);

        sqlx::query("INSERT INTO widgets (id) VALUES ('a')")
            .execute(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_migration_is_not_recorded() {
        let pool = connect_in_memory().await.unwrap();
        let broken = vec![(
            "broken".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE ok (id TEXT); THIS IS NOT SQL;",
            },
        )];

        let err = migrate(&pool, &broken).await.unwrap_err();
        assert!(matches!(err, DbError::Migration { id: "001_init", .. }));

        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(recorded, 0);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = connect_in_memory().await.unwrap();
        sqlx::raw_sql(
            "CREATE TABLE parent (id TEXT PRIMARY KEY);
             CREATE TABLE child (parent_id TEXT NOT NULL REFERENCES parent(id));",
        )
        .execute(&pool)
        .await
        .unwrap();

        let orphan = sqlx::query("INSERT INTO child (parent_id) VALUES ('missing')")
            .execute(&pool)
            .await;
        assert!(orphan.is_err());
    }

    #[tokio::test]
    async fn health_check_passes_on_open_pool() {
        let pool = connect_in_memory().await.unwrap();
        health_check(&pool).await.unwrap();
    }
}
