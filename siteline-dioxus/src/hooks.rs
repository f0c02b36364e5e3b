//! Custom Dioxus hooks for Siteline components.

use chrono::NaiveDate;
use dioxus::prelude::*;
use siteline_core::{FormSchema, FormState, SitelineConfig};

use crate::OverlaySettings;

/// Overlay settings from the launch context, or the defaults when rendered
/// outside of [`crate::launch`] (e.g. in a test harness).
#[must_use]
pub fn use_overlay_settings() -> OverlaySettings {
    try_use_context::<OverlaySettings>().unwrap_or_else(|| OverlaySettings::from(&SitelineConfig::default()))
}

/// Local date, fixed for the lifetime of the component.
#[must_use]
pub fn use_today() -> NaiveDate {
    use_hook(|| chrono::Local::now().date_naive())
}

/// Form state for schema `S`, editing `record` when given.
///
/// The state is created once per component instance. Give the component a
/// `key` derived from the record to start over when the record changes.
#[must_use]
pub fn use_form<S>(record: Option<&S::Record>) -> Signal<FormState<S>>
where
    S: FormSchema + 'static,
{
    let today = use_today();
    use_signal(|| match record {
        Some(record) => FormState::editing(record, today),
        None => FormState::new(today),
    })
}
