//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and log include parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{State, Query}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::GameError;
use crate::protocol::*;
use crate::state::AppState;
use crate::logic;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_round(
  State(state): State<Arc<AppState>>,
  body: Option<Json<RoundIn>>,
) -> Result<Json<SessionOut>, GameError> {
  let body = body.map(|Json(b)| b).unwrap_or_default();
  let view = logic::start_round(&state, body.session_id.as_deref()).await?;
  info!(target: "round", session_id = %view.session_id, replay = body.session_id.is_some(), "HTTP round started");
  Ok(Json(view))
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_round(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<SessionOut>, GameError> {
  Ok(Json(logic::session_view(&state, &q.session_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, candidate_len = body.candidate.len()))]
pub async fn http_post_guess(
  State(state): State<Arc<AppState>>,
  Json(body): Json<GuessIn>,
) -> Result<Json<GuessOut>, GameError> {
  let out = logic::submit_guess(&state, &body.session_id, &body.candidate).await?;
  info!(target: "round", session_id = %body.session_id, score = out.session.score, game_over = out.session.game_over, "HTTP guess evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_hints(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<HintsOut>, GameError> {
  let hints = logic::current_hints(&state, &q.session_id).await?;
  Ok(Json(HintsOut { hints }))
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_result(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<ResultOut>, GameError> {
  let out = logic::round_result(&state, &q.session_id).await?;
  info!(target: "round", session_id = %q.session_id, won = out.won, "HTTP result served");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(OptionsOut { options: logic::guess_options(&state) })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_hint_registry(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HintRegistryOut { hints: logic::hint_registry(&state) })
}
