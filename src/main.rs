//! Cilv · classical verse form (cipai) checker backend
//!
//! - Recognizes the form of a verse text by its structure
//! - Scores tone conformance and resolves rhyme feet against the form
//! - Axum HTTP + WebSocket API
//!
//! Important env variables:
//!   PORT              : u16 (default 5000)
//!   CILV_CONFIG_PATH  : path to TOML config (data paths, rhyme books, defaults)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod tone;
mod normalize;
mod registry;
mod scoring;
mod rhyme;
mod framework;
mod loader;
mod state;
mod protocol;
mod logic;
mod routes;
mod pinyin;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Load config and every reference table once; shared read-only afterwards.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "cilv_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!(target: "cilv_backend", "Shutdown signal received");
    })
    .await?;
  Ok(())
}
