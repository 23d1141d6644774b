use anyhow::Context;
use axum::Router;
use marquee_db::Pool;
use marquee_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// The wired service: settings, the shared pool and every registered module.
pub struct App {
    pub settings: Settings,
    pub pool: Pool,
    pub registry: ModuleRegistry,
}

impl App {
    /// Open the configured database and register all modules against it.
    pub async fn bootstrap(settings: Settings) -> anyhow::Result<Self> {
        let pool = marquee_db::connect(&settings.database.pool_config())
            .await
            .with_context(|| format!("failed to open database '{}'", settings.database.url))?;
        marquee_db::health_check(&pool)
            .await
            .context("database health check failed")?;

        Ok(Self::with_pool(settings, pool))
    }

    /// Register all modules against an already opened pool.
    pub fn with_pool(settings: Settings, pool: Pool) -> Self {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &pool);
        tracing::info!(modules = registry.module_count(), "modules registered");

        Self {
            settings,
            pool,
            registry,
        }
    }

    /// Apply pending module migrations.
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        self.registry.migrate(&self.pool).await
    }

    /// The full HTTP router, middleware included.
    pub fn router(&self) -> Router {
        marquee_http::build_router(&self.registry, &self.settings)
    }

    /// Migrate, run module lifecycles and serve HTTP until shutdown is signalled.
    pub async fn serve(self) -> anyhow::Result<()> {
        self.migrate().await?;

        let ctx = InitCtx {
            settings: &self.settings,
            db: &self.pool,
        };
        self.registry.init_modules(&ctx).await?;
        self.registry.start_modules(&ctx).await?;

        let served = marquee_http::start_server(
            &self.registry,
            &self.settings,
            marquee_http::shutdown_signal(),
        )
        .await;

        self.registry.stop_modules().await?;
        self.pool.close().await;
        tracing::info!("marquee stopped");
        served
    }
}
