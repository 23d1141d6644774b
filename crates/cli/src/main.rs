use anyhow::Context;
use clap::{Parser, Subcommand};
use marquee_app::App;

#[derive(Debug, Parser)]
#[command(name = "marquee", version, about = "Movies and rooms REST API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = marquee_kernel::settings::Settings::load()
        .with_context(|| "failed to load Marquee settings")?;
    marquee_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "marquee CLI starting");

    let app = App::bootstrap(settings).await?;
    match cli.command {
        Command::Serve => app.serve().await,
        Command::Migrate => {
            let applied = app.migrate().await?;
            tracing::info!(applied, "migrations complete");
            Ok(())
        }
    }
}
