//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::logic::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "cilv_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "cilv_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "cilv_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state)
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "cilv_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "cilv_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state))]
fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  let err = |e: crate::error::AnalysisError| ServerWsMessage::Error { message: e.to_string() };
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Analyze { text, rhymebook } => match analyze(state, &text, rhymebook.as_deref()) {
      Ok(AnalysisOutcome::Matched(result)) => {
        info!(target: "analysis", form = %result.cipai_name, score = result.score, "WS analyze served");
        ServerWsMessage::Analysis { result }
      }
      Ok(AnalysisOutcome::Unmatched(diagnostics)) => ServerWsMessage::NoMatch { diagnostics },
      Err(e) => err(e),
    },

    ClientWsMessage::SelectRhymePattern { text, rhymebook, form_name, author, pattern_id } => {
      match reselect_rhyme_pattern(state, &text, rhymebook.as_deref(), &form_name, &author, pattern_id) {
        Ok(pattern) => ServerWsMessage::RhymePattern { pattern },
        Err(e) => err(e),
      }
    }

    ClientWsMessage::FillwordFramework { form_name, author } => match build_fillword_framework(state, &form_name, &author) {
      Ok(framework) => ServerWsMessage::Framework { framework },
      Err(e) => err(e),
    },

    ClientWsMessage::CharTone { char } => match classify_char_tone(state, &char) {
      Ok(tone) => ServerWsMessage::CharTone { tone },
      Err(e) => err(e),
    },

    ClientWsMessage::ListForms => match list_forms(state) {
      Ok(list) => ServerWsMessage::Forms { list },
      Err(e) => err(e),
    },
  }
}
