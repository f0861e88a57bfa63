//! Logging initialization for studio_app.
//!
//! File output goes to `./studio_client.log` in the current working directory.

use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use studio_logging::Namespace;

use super::config::{LogConfig, LogDestination};

/// Installs the global logger described by `settings`.
///
/// Problems with the settings are reported on stderr, since no logger
/// exists yet to report them.
pub(crate) fn initialize(settings: &LogConfig) {
    let level = LevelFilter::from_str(&settings.level).unwrap_or_else(|_| {
        eprintln!(
            "Warning: unknown log level {:?}, using info",
            settings.level
        );
        LevelFilter::Info
    });
    let config = build_config(&muted_namespaces(&settings.muted_namespaces));

    let loggers: Vec<Box<dyn SharedLogger>> = match settings.destination {
        LogDestination::File => match create_file_logger(level, config) {
            Some(file_logger) => vec![file_logger],
            None => return,
        },
        LogDestination::Terminal => {
            vec![TermLogger::new(
                level,
                config,
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )]
        }
        LogDestination::Both => {
            let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
                level,
                config.clone(),
                TerminalMode::Stderr,
                ColorChoice::Auto,
            )];
            if let Some(file_logger) = create_file_logger(level, config) {
                loggers.push(file_logger);
            }
            loggers
        }
    };

    let _ = CombinedLogger::init(loggers);
}

fn muted_namespaces(names: &[String]) -> Vec<Namespace> {
    names
        .iter()
        .filter_map(|name| match name.parse::<Namespace>() {
            Ok(ns) => Some(ns),
            Err(err) => {
                eprintln!("Warning: {err}");
                None
            }
        })
        .collect()
}

fn build_config(muted: &[Namespace]) -> Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error);
    for ns in muted {
        builder.add_filter_ignore_str(ns.target());
    }
    builder.build()
}

fn create_file_logger(level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    let log_path = PathBuf::from("./studio_client.log");
    match File::create(&log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_namespaces_are_skipped() {
        let muted = muted_namespaces(&["store".to_string(), "nope".to_string()]);
        assert_eq!(muted, vec![Namespace::Store]);
    }
}
