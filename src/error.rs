//! Error taxonomy for round operations and its HTTP mapping.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
  /// Caller input the player can correct (blank pick, unknown metro, round already over).
  #[error("{0}")]
  Validation(String),
  /// Catalog or hint data cannot support a round.
  #[error("configuration error: {0}")]
  Configuration(String),
  #[error("unknown sessionId: {0}")]
  UnknownSession(String),
  #[error("too many live sessions; try again later")]
  Capacity,
}

impl GameError {
  pub fn validation(msg: impl Into<String>) -> Self {
    GameError::Validation(msg.into())
  }

  pub fn configuration(msg: impl Into<String>) -> Self {
    GameError::Configuration(msg.into())
  }

  pub fn status(&self) -> StatusCode {
    match self {
      GameError::Validation(_) => StatusCode::BAD_REQUEST,
      GameError::UnknownSession(_) => StatusCode::NOT_FOUND,
      GameError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
      GameError::Capacity => StatusCode::SERVICE_UNAVAILABLE,
    }
  }
}

impl IntoResponse for GameError {
  fn into_response(self) -> Response {
    (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
  }
}
