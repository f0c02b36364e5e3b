//! Siteline Dioxus - desktop frontend for the Siteline construction dashboard.
//!
//! The dialogs are built on `siteline-core`: sizes, focus-trap stepping, the
//! modal stack and every domain form come from there. This crate renders
//! them with Dioxus and performs the DOM side effects (scroll lock, focus
//! save/restore, moving portal containers) through the bundled overlay
//! script.
//!
//! ## Quick Start
//!
//! ```no_run
//! use siteline_core::SitelineConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = SitelineConfig::load_default()?;
//!     siteline_dioxus::launch(config)
//! }
//! ```

use anyhow::Result;
use siteline_core::{OverlaySize, SitelineConfig};

pub mod args;
pub mod components;
pub mod hooks;
pub mod script;

// Internal modules
mod app;
mod demo;

pub use args::StartupArgs;

/// JavaScript helpers backing portals, focus handling and scroll locking.
const OVERLAY_SCRIPT: &str = include_str!("../assets/overlay.js");

/// Overlay settings shared with every component through context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySettings {
    pub portal_root_id: String,
    pub default_size: OverlaySize,
}

impl From<&SitelineConfig> for OverlaySettings {
    fn from(config: &SitelineConfig) -> Self {
        Self {
            portal_root_id: config.overlay.portal_root_id.clone(),
            default_size: config.overlay.default_size,
        }
    }
}

/// Launch the Dioxus desktop application.
pub fn launch(config: SitelineConfig) -> Result<()> {
    let settings = OverlaySettings::from(&config);
    log::info!(
        "Launching with portal root '#{}' and default dialog size {}",
        settings.portal_root_id,
        settings.default_size
    );

    let custom_head = format!("<script>{OVERLAY_SCRIPT}</script>");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title(&config.window.title)
                        .with_inner_size(dioxus::desktop::LogicalSize::new(
                            config.window.width,
                            config.window.height,
                        )),
                )
                .with_custom_head(custom_head),
        )
        .with_context(settings)
        .launch(app::App);

    Ok(())
}
