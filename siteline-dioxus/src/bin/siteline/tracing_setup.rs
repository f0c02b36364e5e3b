//! Tracing configuration for the siteline binary.
//!
//! Installs the global subscriber with an event formatter that drops lines
//! matching the configured noise patterns (webview selection and pointer
//! chatter). Must run before the Dioxus launch so dioxus-logger does not
//! install its own.

use std::fs::File;
use std::io;
use std::sync::Mutex;

use siteline_core::config::LoggingConfig;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Formatter that swallows events whose rendered line contains a suppressed pattern.
struct FilteringFormatter {
    inner: fmt::format::Format,
    suppressed_patterns: Vec<String>,
}

impl FilteringFormatter {
    fn new(suppressed_patterns: Vec<String>) -> Self {
        Self {
            inner: fmt::format::Format::default(),
            suppressed_patterns,
        }
    }

    fn is_suppressed(&self, line: &str) -> bool {
        self.suppressed_patterns
            .iter()
            .any(|pattern| line.contains(pattern.as_str()))
    }
}

impl<S, N> FormatEvent<S, N> for FilteringFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> std::fmt::Result {
        let mut line = String::new();
        self.inner.format_event(ctx, Writer::new(&mut line), event)?;

        if self.is_suppressed(&line) {
            return Ok(());
        }
        write!(writer, "{line}")
    }
}

/// Initialize the global subscriber from `config`.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// the configured log file, or stderr when it cannot be created.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let suppressed = config.suppressed_patterns.clone();

    let log_file = config.log_file.as_ref().and_then(|path| match File::create(path) {
        Ok(file) => Some((path, file)),
        Err(err) => {
            eprintln!("Cannot create log file {}: {err}", path.display());
            None
        }
    });

    if let Some((path, log_file)) = log_file {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(log_file))
            .event_format(FilteringFormatter::new(suppressed));

        tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

        eprintln!("Logging to {}", path.display());
    } else {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_writer(io::stderr)
            .event_format(FilteringFormatter::new(suppressed));

        tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppression_matches_substrings() {
        let formatter = FilteringFormatter::new(vec!["SelectionDidChange".to_string()]);
        assert!(formatter.is_suppressed("INFO Dispatched SelectionDidChange to webview"));
        assert!(!formatter.is_suppressed("INFO Opened overlay 'Add Project'"));
    }
}
