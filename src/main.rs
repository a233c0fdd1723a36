use anyhow::Context;
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        address = %settings.bind_address(),
        "bookshelf-app bootstrap starting"
    );

    bookshelf_app::run(settings).await
}
