//! Tracing subscriber setup
//!
//! The library only emits spans and events. Applications that want to see
//! them install a subscriber once, usually through [`init_logging`]:
//!
//! ```rust
//! use railyard::core::logging::init_logging;
//!
//! // level and format from the environment, or info/compact
//! let _ = init_logging(None, None);
//!
//! // explicit settings win over the environment
//! let _ = init_logging(Some("railyard::diagram=trace"), Some("json"));
//! ```
//!
//! What each level carries:
//!
//! - `info`: a span per build request and per render
//! - `debug`: built grammars, built diagrams, measured figure sizes
//! - `trace`: single rewrite decisions such as affix factoring,
//!   separator-loop collapse and control-literal rewrites
//!
//! The level is read from the argument, then `RAILYARD_LOG_LEVEL`, then
//! `RUST_LOG`. The format is read from the argument, then
//! `RAILYARD_LOG_FORMAT`. Any `EnvFilter` directive is accepted as a level.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const LEVEL_VAR: &str = "RAILYARD_LOG_LEVEL";
const FORMAT_VAR: &str = "RAILYARD_LOG_FORMAT";
const DEFAULT_LEVEL: &str = "info";

/// Output layout of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no targets or source locations
    #[default]
    Compact,
    /// Multi-line, coloured, with span enter/exit events
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Names accepted by [`FromStr`]
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }

    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        match self {
            LogFormat::Compact => base
                .compact()
                .with_target(false)
                .with_span_events(FmtSpan::NONE)
                .boxed(),
            LogFormat::Pretty => base
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .boxed(),
            LogFormat::Json => base
                .json()
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!(
                "Unknown log format '{}', expected one of {}",
                s,
                Self::variants().join(", ")
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        })
    }
}

/// Install a global subscriber
///
/// An unparsable level directive falls back to `info`. An unknown format is
/// reported before anything is installed. Installing twice is an error, not
/// a panic, so tests and embedding applications may call this freely.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = match format.map(str::to_string).or_else(|| std::env::var(FORMAT_VAR).ok()) {
        Some(name) => name
            .parse::<LogFormat>()
            .map_err(|e| format!("Invalid log format: {}", e))?,
        None => LogFormat::default(),
    };

    let directive = level
        .map(str::to_string)
        .or_else(|| std::env::var(LEVEL_VAR).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    Registry::default()
        .with(format.layer())
        .with(filter)
        .try_init()?;
    Ok(())
}

/// Install a global subscriber from the environment alone
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert_eq!(" Pretty ".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));

        let err = "yaml".parse::<LogFormat>().unwrap_err();
        assert!(err.contains("compact, pretty, json"));
    }

    #[test]
    fn test_display_parses_back() {
        for name in LogFormat::variants() {
            let format: LogFormat = name.parse().unwrap();
            assert_eq!(format.to_string(), *name);
        }
        assert_eq!(LogFormat::default(), LogFormat::Compact);
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let err = init_logging(Some("info"), Some("xml")).unwrap_err();
        assert!(err.to_string().contains("Invalid log format"));
    }
}
