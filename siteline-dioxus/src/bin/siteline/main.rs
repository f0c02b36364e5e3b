//! Entry point for the siteline binary.

mod tracing_setup;

use anyhow::Result;
use siteline_core::SitelineConfig;

fn main() -> Result<()> {
    let startup = siteline_dioxus::args::parse_args(std::env::args().skip(1));

    let config = startup.load_config().unwrap_or_else(|err| {
        eprintln!("Warning: failed to load siteline.toml: {err:#}");
        eprintln!("Using default configuration");
        SitelineConfig::default()
    });

    // Set up tracing subscriber BEFORE Dioxus to prevent dioxus-logger from setting its own.
    tracing_setup::init(&config.logging);

    log::info!("Starting siteline");

    siteline_dioxus::launch(config)
}
