mod fetch;
mod output;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use pycon_ical_core::schedule::build_calendar;
use pycon_ical_core::ScheduleConfig;
use tracing::Level;

#[derive(Parser)]
#[command(name = "pycon-ical", version)]
#[command(about = "Download the PyCon 2014 talk list and write it out as an ICS calendar")]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = ScheduleConfig::default();

    let html = fetch::fetch_page(&config.source_url)?;

    let built = build_calendar(&html, &config, Utc::now())
        .with_context(|| format!("Failed to build calendar from {}", config.source_url))?;

    println!(
        "There are {} talks, writing to {} ...",
        built.talk_count(),
        config.output_path.display()
    );

    output::write_calendar(&config.output_path, &built.content)?;

    println!("Done!");

    Ok(())
}
