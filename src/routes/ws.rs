//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with one JSON message per request, plus a
//! delayed `hint_revealed` after a wrong guess that unlocked a hint.
//! Sessions minted over a socket are dropped when that socket closes.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::GameError;
use crate::logic;
use crate::protocol::{ClientWsMessage, GuessOut, HintOut, ServerWsMessage};
use crate::session::GuessOutcome;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "metroguess_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "metroguess_backend", "WebSocket connected");
  let mut minted: Vec<String> = Vec::new();
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let (reply_msg, revealed) = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "metroguess_backend", "WS received: {:?}", &incoming);
            let fresh = matches!(incoming, ClientWsMessage::NewRound { session_id: None });
            let (reply, revealed) = handle_client_ws(incoming, &state).await;
            if let Some(id) = minted_session(fresh, &reply) {
              minted.push(id);
            }
            (reply, revealed)
          }
          Err(e) => (ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }, None),
        };

        if send_json(&mut socket, &reply_msg).await.is_err() {
          break;
        }

        // Presentation pause: the hint is already part of the session state.
        if let Some(hint) = revealed {
          tokio::time::sleep(state.hint_reveal_delay).await;
          if send_json(&mut socket, &ServerWsMessage::HintRevealed { hint }).await.is_err() {
            break;
          }
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  state.end_sessions(&minted).await;
  info!(target: "metroguess_backend", ended = minted.len(), "WebSocket disconnected");
}

async fn send_json(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await.map_err(|e| {
    error!(target: "metroguess_backend", error = %e, "WS send error");
    e
  })
}

fn error_msg(e: GameError) -> ServerWsMessage {
  ServerWsMessage::Error { message: e.to_string() }
}

/// Id of a session this socket created, i.e. a `new_round` without a session id that succeeded.
fn minted_session(fresh: bool, reply: &ServerWsMessage) -> Option<String> {
  match reply {
    ServerWsMessage::Round { session } if fresh => Some(session.session_id.clone()),
    _ => None,
  }
}

/// The hint a wrong guess just unlocked, if any.
fn newly_revealed(out: &GuessOut) -> Option<HintOut> {
  match out.outcome {
    GuessOutcome::Wrong { hint_unlocked: true, .. } => out.session.hints.first().cloned(),
    _ => None,
  }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> (ServerWsMessage, Option<HintOut>) {
  match msg {
    ClientWsMessage::Ping => (ServerWsMessage::Pong, None),

    ClientWsMessage::NewRound { session_id } => {
      let reply = match logic::start_round(state, session_id.as_deref()).await {
        Ok(session) => {
          info!(target: "round", session_id = %session.session_id, "WS new_round served");
          ServerWsMessage::Round { session }
        }
        Err(e) => error_msg(e),
      };
      (reply, None)
    }

    ClientWsMessage::SubmitGuess { session_id, candidate } => {
      match logic::submit_guess(state, &session_id, &candidate).await {
        Ok(out) => {
          info!(target: "round", %session_id, score = out.session.score, "WS submit_guess evaluated");
          let revealed = newly_revealed(&out);
          (ServerWsMessage::GuessResult(out), revealed)
        }
        Err(e) => (error_msg(e), None),
      }
    }

    ClientWsMessage::Hints { session_id } => {
      let reply = match logic::current_hints(state, &session_id).await {
        Ok(hints) => ServerWsMessage::Hints { hints },
        Err(e) => error_msg(e),
      };
      (reply, None)
    }

    ClientWsMessage::State { session_id } => {
      let reply = match logic::session_view(state, &session_id).await {
        Ok(session) => ServerWsMessage::Round { session },
        Err(e) => error_msg(e),
      };
      (reply, None)
    }

    ClientWsMessage::Result { session_id } => {
      let reply = match logic::round_result(state, &session_id).await {
        Ok(out) => ServerWsMessage::Result(out),
        Err(e) => error_msg(e),
      };
      (reply, None)
    }

    ClientWsMessage::Options => (ServerWsMessage::Options { options: logic::guess_options(state) }, None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn state() -> AppState {
    AppState::from_parts(None, Some(21))
  }

  #[tokio::test]
  async fn wrong_guess_schedules_hint_reveal() {
    let st = state();
    let (reply, _) = handle_client_ws(ClientWsMessage::NewRound { session_id: None }, &st).await;
    let sid = match reply {
      ServerWsMessage::Round { session } => session.session_id,
      other => panic!("unexpected {other:?}"),
    };
    let target = st.get_session(&sid).await.unwrap().target_id().to_string();
    let answer = st.catalog.lookup(&target).unwrap().name.clone();
    let wrong = st.options.all_display_names().into_iter().find(|n| *n != answer).unwrap();

    let (reply, revealed) =
      handle_client_ws(ClientWsMessage::SubmitGuess { session_id: sid.clone(), candidate: wrong }, &st).await;
    assert!(matches!(reply, ServerWsMessage::GuessResult(_)));
    let hint = revealed.expect("hint unlocked");
    assert_eq!(hint.index, 1);
    assert_eq!(hint.name, "Salary Ranges");

    let (_, revealed) =
      handle_client_ws(ClientWsMessage::SubmitGuess { session_id: sid, candidate: answer }, &st).await;
    assert!(revealed.is_none());
  }

  #[tokio::test]
  async fn socket_minted_sessions_are_tracked_and_ended() {
    let st = state();
    let (reply, _) = handle_client_ws(ClientWsMessage::NewRound { session_id: None }, &st).await;
    let sid = minted_session(true, &reply).expect("new session id");

    // Replaying or viewing an existing session does not count as minting.
    let (replay, _) = handle_client_ws(ClientWsMessage::NewRound { session_id: Some(sid.clone()) }, &st).await;
    assert!(minted_session(false, &replay).is_none());
    let (view, _) = handle_client_ws(ClientWsMessage::State { session_id: sid.clone() }, &st).await;
    assert!(minted_session(false, &view).is_none());

    st.end_sessions(&[sid.clone()]).await;
    let (reply, _) = handle_client_ws(ClientWsMessage::State { session_id: sid }, &st).await;
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }

  #[tokio::test]
  async fn errors_become_error_messages() {
    let st = state();
    let (reply, _) = handle_client_ws(ClientWsMessage::Hints { session_id: "missing".into() }, &st).await;
    match reply {
      ServerWsMessage::Error { message } => assert_eq!(message, "unknown sessionId: missing"),
      other => panic!("unexpected {other:?}"),
    }
    let (reply, _) = handle_client_ws(ClientWsMessage::Ping, &st).await;
    assert!(matches!(reply, ServerWsMessage::Pong));
  }
}
