//! Tracing setup for the analysis server.
//!
//! Environment:
//! - LOG_LEVEL: filter directives, e.g. "warn,analysis=debug". The default keeps
//!   `analysis` (match/score outcomes) at info and `cilv_backend` (loading,
//!   transport) at debug.
//! - LOG_FORMAT: "json" for one JSON object per line, anything else is pretty.
//! - LOG_SPANS: "1"/"true" also emits a close event for every instrumented
//!   operation (`analyze`, `reselect_rhyme_pattern`, ...) with its busy time.

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

const DEFAULT_FILTER: &str = "info,analysis=info,cilv_backend=debug,tower_http=info,axum=info";

fn span_events_from_env() -> FmtSpan {
    match std::env::var("LOG_SPANS").as_deref() {
        Ok("1") | Ok("true") => FmtSpan::CLOSE,
        _ => FmtSpan::NONE,
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events_from_env())
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }
}
