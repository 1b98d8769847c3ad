use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use sidenav::core::config::{self, CliOverrides, SidenavConfig};

#[derive(Parser)]
#[command(name = "sidenav", about = "Conversation navigation panel for assistant chats")]
struct Args {
    /// Where conversations come from
    #[arg(short, long, value_parser = ["http", "local"])]
    source: Option<String>,

    /// Role used for feature access checks
    #[arg(short, long)]
    role: Option<String>,

    /// Display name of the signed-in user
    #[arg(short, long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("sidenav.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Config not loaded, using defaults: {}", e);
        SidenavConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            source: args.source.as_deref(),
            role: args.role.as_deref(),
            user: args.user.as_deref(),
        },
    );

    info!(
        "Sidenav starting up: source={:?}, user={} ({})",
        resolved.source_kind, resolved.user, resolved.role
    );

    sidenav::tui::run(resolved)
}
