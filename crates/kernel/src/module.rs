use async_trait::async_trait;
use axum::Router;

pub use marquee_db::Migration;

/// Everything a module may touch while it boots.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
    /// Pool shared with the module's controllers.
    pub db: &'a marquee_db::Pool,
}

/// A resource area of the API (movies, rooms) plugged into the server.
///
/// The registry drives every hook; modules never call each other's hooks.
#[async_trait]
pub trait Module: Sync + Send {
    /// Path segment and migration namespace, e.g. `"movies"`.
    fn name(&self) -> &'static str;

    /// Runs once the schema is migrated, before the listener binds.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Handlers nested under `/api/v1/{name}`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment with `paths` relative to the module root and
    /// `components.schemas`; merged into the served document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema changes owned by this module, applied once each in id order.
    fn migrations(&self) -> Vec<Migration> {
        Vec::new()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Invoked in reverse registration order on shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
