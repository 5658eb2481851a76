// Week Planner
// Headless replay of gesture scripts through the draft engine

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use week_planner::services::replay::{self, Script};
use week_planner::services::settings::SettingsService;

const USAGE: &str = "usage: week-planner <script.json> [settings.toml]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let script_path = args.next().map(PathBuf::from).context(USAGE)?;
    let settings_service = match args.next() {
        Some(path) => SettingsService::new(path),
        None => SettingsService::at_default_location(),
    };
    let settings = settings_service.load_or_default();

    log::info!("Replaying {}", script_path.display());
    let data = std::fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script: Script = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse script {}", script_path.display()))?;

    let records = replay::run(settings, script).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    log::info!("Replay produced {} records", records.len());
    Ok(())
}
