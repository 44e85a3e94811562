//! src/main.rs

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::resolve_settings;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => commands::init::handle_init(force).await?,
        Commands::Welcome => commands::render::handle_welcome(),
        Commands::Render { input, output } => {
            commands::render::handle_render(&input, output.as_deref()).await?
        }
        Commands::Review(args) => {
            let settings = resolve_settings(cli.server_url, cli.timeout).await?;
            commands::review::handle_review(&settings, args).await?
        }
        Commands::Selection {
            file,
            start,
            end,
            output,
        } => {
            let settings = resolve_settings(cli.server_url, cli.timeout).await?;
            commands::selection::handle_selection(&settings, &file, start, end, output.as_deref())
                .await?
        }
        Commands::Health => {
            let settings = resolve_settings(cli.server_url, cli.timeout).await?;
            commands::health::handle_health(&settings).await?
        }
    }

    Ok(())
}
