use anyhow::Context;
use marquee_app::App;
use marquee_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Marquee settings")?;
    marquee_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "marquee-app bootstrap starting"
    );

    App::bootstrap(settings).await?.serve().await
}
