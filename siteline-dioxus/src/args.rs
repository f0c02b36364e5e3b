//! Command-line argument parsing.

use std::path::PathBuf;

use siteline_core::SitelineConfig;

/// Options given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupArgs {
    /// Explicit config file, replacing the platform default location.
    pub config_path: Option<PathBuf>,
    /// Log level overriding the configured one.
    pub log_level: Option<String>,
}

/// Parse `args`, not including the program name.
///
/// Unknown arguments are logged and skipped.
pub fn parse_args(args: impl IntoIterator<Item = String>) -> StartupArgs {
    let mut parsed = StartupArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => match args.next() {
                Some(path) => parsed.config_path = Some(PathBuf::from(path)),
                None => log::warn!("{arg} expects a file path"),
            },
            "-v" | "--verbose" => parsed.log_level = Some("debug".to_string()),
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    parsed.config_path = Some(PathBuf::from(path));
                } else if let Some(level) = other.strip_prefix("--log-level=") {
                    parsed.log_level = Some(level.to_string());
                } else {
                    log::warn!("Ignoring unknown argument '{other}'");
                }
            }
        }
    }
    parsed
}

impl StartupArgs {
    /// Load the configuration these arguments point at.
    ///
    /// An explicit path must exist and parse; the default location falls
    /// back to built-in defaults when absent.
    pub fn load_config(&self) -> anyhow::Result<SitelineConfig> {
        let config = match &self.config_path {
            Some(path) => SitelineConfig::load_from(path)?,
            None => SitelineConfig::load_default()?,
        };
        Ok(match &self.log_level {
            Some(level) => config.with_log_level(level.clone()),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(parse_args(Vec::new()), StartupArgs::default());
    }

    #[test]
    fn config_path_in_both_forms() {
        let parsed = parse_args(args(&["--config", "/etc/siteline.toml"]));
        assert_eq!(parsed.config_path, Some(PathBuf::from("/etc/siteline.toml")));

        let parsed = parse_args(args(&["--config=/tmp/s.toml", "-v"]));
        assert_eq!(parsed.config_path, Some(PathBuf::from("/tmp/s.toml")));
        assert_eq!(parsed.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn dangling_flag_and_unknown_arguments_are_skipped() {
        let parsed = parse_args(args(&["--frobnicate", "--config"]));
        assert_eq!(parsed, StartupArgs::default());
    }

    #[test]
    fn explicit_config_file_is_loaded_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[window]\ntitle = \"Site office\"").expect("write");

        let startup = StartupArgs {
            config_path: Some(file.path().to_path_buf()),
            log_level: Some("trace".to_string()),
        };
        let config = startup.load_config().expect("should load");
        assert_eq!(config.window.title, "Site office");
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let startup = StartupArgs {
            config_path: Some(PathBuf::from("/nonexistent/siteline.toml")),
            log_level: None,
        };
        assert!(startup.load_config().is_err());
    }
}
