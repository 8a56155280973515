//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{rejection::JsonRejection, FromRequest, State},
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument, warn};

use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

/// JSON body extractor whose failures still answer with the `{success, data, error}` envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(BodyRejection))]
pub struct JsonBody<T>(pub T);

pub struct BodyRejection(JsonRejection);

impl From<JsonRejection> for BodyRejection {
  fn from(r: JsonRejection) -> Self { Self(r) }
}

impl IntoResponse for BodyRejection {
  fn into_response(self) -> Response {
    warn!(target: "cilv_backend", status = %self.0.status(), error = %self.0.body_text(), "Rejected request body");
    Json(Envelope::<()>::fail(format!("invalid request body: {}", self.0.body_text()))).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body), fields(text_len = body.text.len(), rhymebook = ?body.rhymebook))]
pub async fn http_post_analyze(
  State(state): State<Arc<AppState>>,
  JsonBody(body): JsonBody<AnalyzeIn>,
) -> Response {
  match analyze(&state, &body.text, body.rhymebook.as_deref()) {
    Ok(AnalysisOutcome::Matched(r)) => {
      info!(target: "analysis", form = %r.cipai_name, author = %r.author, score = r.score, "HTTP analyze served");
      Json(Envelope::ok(*r)).into_response()
    }
    Ok(AnalysisOutcome::Unmatched(n)) => Json(Envelope::fail_with(n, NO_MATCH_MESSAGE)).into_response(),
    Err(e) => {
      warn!(target: "analysis", error = %e, "HTTP analyze failed");
      Json(Envelope::<()>::fail(e.to_string())).into_response()
    }
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.form_name, %body.author, pattern_id = body.pattern_id))]
pub async fn http_post_rhyme_pattern(
  State(state): State<Arc<AppState>>,
  JsonBody(body): JsonBody<RhymePatternIn>,
) -> impl IntoResponse {
  let r = reselect_rhyme_pattern(
    &state,
    &body.text,
    body.rhymebook.as_deref(),
    &body.form_name,
    &body.author,
    body.pattern_id,
  );
  Json(Envelope::from_result(r))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_forms(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(Envelope::from_result(list_forms(&state)))
}

#[instrument(level = "info", skip(state, body), fields(%body.form_name, %body.author))]
pub async fn http_post_framework(
  State(state): State<Arc<AppState>>,
  JsonBody(body): JsonBody<FrameworkIn>,
) -> impl IntoResponse {
  Json(Envelope::from_result(build_fillword_framework(&state, &body.form_name, &body.author)))
}

#[instrument(level = "info", skip(state, body), fields(%body.char))]
pub async fn http_post_char_tone(
  State(state): State<Arc<AppState>>,
  JsonBody(body): JsonBody<CharToneIn>,
) -> impl IntoResponse {
  Json(Envelope::from_result(classify_char_tone(&state, &body.char)))
}
