#![deny(missing_docs)]
//! Shared logging utilities for the studio client workspace.
//!
//! Every log line is attributed to a [`Namespace`], which becomes the `log`
//! target. The `studio_*` macros take the namespace as their first argument:
//!
//! ```
//! use studio_logging::{studio_debug, Namespace};
//! studio_debug!(Namespace::Socketio, "Connected");
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[doc(hidden)]
pub use log as __log;

/// Logical area of the client a log line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Real-time connection events and the listeners reacting to them.
    Socketio,
    /// Session queue status handling.
    Queue,
    /// HTTP requests against the backend.
    Api,
    /// OpenAPI schema loading and node template parsing.
    Schema,
    /// Action dispatch and effect execution.
    Store,
    /// Listener middleware bookkeeping.
    Listener,
    /// Configuration loading.
    Config,
}

impl Namespace {
    /// All namespaces, in declaration order.
    pub const ALL: [Namespace; 7] = [
        Namespace::Socketio,
        Namespace::Queue,
        Namespace::Api,
        Namespace::Schema,
        Namespace::Store,
        Namespace::Listener,
        Namespace::Config,
    ];

    /// The `log` target used for this namespace.
    pub const fn target(self) -> &'static str {
        match self {
            Namespace::Socketio => "socketio",
            Namespace::Queue => "queue",
            Namespace::Api => "api",
            Namespace::Schema => "schema",
            Namespace::Store => "store",
            Namespace::Listener => "listener",
            Namespace::Config => "config",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

/// Error returned when parsing an unknown namespace name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log namespace '{0}'")]
pub struct UnknownNamespace(pub String);

impl FromStr for Namespace {
    type Err = UnknownNamespace;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.target().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownNamespace(name.to_string()))
    }
}

/// Logs a trace-level message under the given namespace.
#[macro_export]
macro_rules! studio_trace {
    ($ns:expr, $($arg:tt)+) => {{
        $crate::__log::trace!(target: $crate::Namespace::target($ns), $($arg)+);
    }};
}

/// Logs a debug-level message under the given namespace.
#[macro_export]
macro_rules! studio_debug {
    ($ns:expr, $($arg:tt)+) => {{
        $crate::__log::debug!(target: $crate::Namespace::target($ns), $($arg)+);
    }};
}

/// Logs an info-level message under the given namespace.
#[macro_export]
macro_rules! studio_info {
    ($ns:expr, $($arg:tt)+) => {{
        $crate::__log::info!(target: $crate::Namespace::target($ns), $($arg)+);
    }};
}

/// Logs a warn-level message under the given namespace.
#[macro_export]
macro_rules! studio_warn {
    ($ns:expr, $($arg:tt)+) => {{
        $crate::__log::warn!(target: $crate::Namespace::target($ns), $($arg)+);
    }};
}

/// Logs an error-level message under the given namespace.
#[macro_export]
macro_rules! studio_error {
    ($ns:expr, $($arg:tt)+) => {{
        $crate::__log::error!(target: $crate::Namespace::target($ns), $($arg)+);
    }};
}

/// Initializes a terminal logger for tests.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Trace
    } else {
        log::LevelFilter::Info
    };
    let config = ConfigBuilder::new().set_target_level(level).build();

    let _ = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Never);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_round_trip_through_their_target() {
        for ns in Namespace::ALL {
            assert_eq!(ns.target().parse::<Namespace>(), Ok(ns));
        }
    }

    #[test]
    fn unknown_namespace_is_rejected() {
        assert_eq!(
            "websocket".parse::<Namespace>(),
            Err(UnknownNamespace("websocket".to_string()))
        );
        assert_eq!(" SocketIO ".parse::<Namespace>(), Ok(Namespace::Socketio));
    }

    #[test]
    fn unknown_namespace_names_the_input() {
        let err: Box<dyn std::error::Error> = Box::new(UnknownNamespace("gpu".to_string()));
        assert_eq!(err.to_string(), "unknown log namespace 'gpu'");
    }
}
