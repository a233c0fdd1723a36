use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Books REST service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the merged OpenAPI document
    Openapi,
    /// Print the effective settings
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("failed to load bookshelf settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookshelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookshelf serve starting");
            bookshelf_app::run(settings).await
        }
        Command::Openapi => {
            let registry = bookshelf_app::build_registry(&Database::new()).await?;
            let document = bookshelf_http::openapi::document(&registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["bookshelf"]).unwrap();
        assert!(cli.command.is_none());
    }
}
