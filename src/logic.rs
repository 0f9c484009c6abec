//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Starting and replaying rounds
//!   - Submitting guesses and building the wrong-guess notice
//!   - Building the public session view (answer hidden until the round ends)
//!   - The end-of-round result card and the "other players" histogram

use tracing::{debug, info, instrument, warn};

use crate::distribution::{mock_score_distribution, summarize, DEFAULT_SAMPLE_SIZE};
use crate::domain::HintDescriptor;
use crate::error::GameError;
use crate::protocol::{AnswerOut, GuessOut, HintOut, NoticeOut, ResultOut, SessionOut};
use crate::session::{GameSession, GuessOutcome, MAX_GUESSES, STARTING_SCORE};
use crate::state::AppState;

const WRONG_TITLE: &str = "Incorrect!";
const NEXT_HINT_DETAIL: &str = "Next hint unlocking...";
const NO_HINTS_DETAIL: &str = "No more hints remaining.";

pub fn hint_outs(state: &AppState, session: &GameSession) -> Vec<HintOut> {
  session
    .current_hints()
    .into_iter()
    .filter_map(|index| {
      state.hints.get(index).map(|h| HintOut {
        index,
        name: h.name.clone(),
        penalty_display_only: h.penalty_display_only,
      })
    })
    .collect()
}

pub fn session_out(state: &AppState, session_id: &str, session: &GameSession) -> SessionOut {
  let answer = if session.is_game_over() {
    state.catalog.lookup(session.target_id()).map(|m| AnswerOut { name: m.name.clone(), state: m.state.clone() })
  } else {
    None
  };
  SessionOut {
    session_id: session_id.to_string(),
    phase: session.phase(),
    score: session.score(),
    max_score: STARTING_SCORE,
    guesses_made: session.guesses_made(),
    max_guesses: MAX_GUESSES,
    guesses_remaining: session.guesses_remaining(),
    history: session.guess_history().to_vec(),
    hints: hint_outs(state, session),
    total_hints: session.total_hints(),
    game_over: session.is_game_over(),
    game_won: session.did_win(),
    answer,
  }
}

/// Toast for a wrong guess; None when the guess was right.
pub fn wrong_guess_notice(outcome: &GuessOutcome) -> Option<NoticeOut> {
  let detail = match outcome {
    GuessOutcome::Correct => return None,
    GuessOutcome::Wrong { hint_unlocked: true, .. } => NEXT_HINT_DETAIL,
    GuessOutcome::Wrong { .. } | GuessOutcome::GameOver => NO_HINTS_DETAIL,
  };
  Some(NoticeOut { title: WRONG_TITLE.into(), detail: detail.into() })
}

pub fn result_summary(won: bool, metro_name: &str, guesses: u32, score: u32) -> String {
  if won {
    format!("You cracked the case in {guesses} guesses and banked {score}/{STARTING_SCORE} points.")
  } else {
    format!("{metro_name} kept its secret after {guesses} guesses. Final score: {score}/{STARTING_SCORE}.")
  }
}

#[instrument(level = "info", skip(state))]
pub async fn start_round(state: &AppState, session_id: Option<&str>) -> Result<SessionOut, GameError> {
  let (id, session) = state.start_round(session_id).await?;
  Ok(session_out(state, &id, &session))
}

#[instrument(level = "debug", skip(state))]
pub async fn session_view(state: &AppState, session_id: &str) -> Result<SessionOut, GameError> {
  let session = state.get_session(session_id).await?;
  Ok(session_out(state, session_id, &session))
}

#[instrument(level = "info", skip(state, candidate), fields(candidate_len = candidate.len()))]
pub async fn submit_guess(state: &AppState, session_id: &str, candidate: &str) -> Result<GuessOut, GameError> {
  let result = state
    .with_session(session_id, |s| s.submit_guess(candidate, &state.options).map(|o| (o, s.clone())))
    .await;

  let (outcome, session) = match result {
    Ok(v) => v,
    Err(e) => {
      warn!(target: "round", %session_id, error = %e, "Guess rejected");
      return Err(e);
    }
  };
  info!(target: "round", %session_id, ?outcome, score = session.score(), guesses = session.guesses_made(), "Guess evaluated");

  Ok(GuessOut {
    session: session_out(state, session_id, &session),
    notice: wrong_guess_notice(&outcome),
    outcome,
  })
}

#[instrument(level = "debug", skip(state))]
pub async fn current_hints(state: &AppState, session_id: &str) -> Result<Vec<HintOut>, GameError> {
  let session = state.get_session(session_id).await?;
  Ok(hint_outs(state, &session))
}

/// Result card for a finished round, with the synthetic crowd for comparison.
#[instrument(level = "info", skip(state))]
pub async fn round_result(state: &AppState, session_id: &str) -> Result<ResultOut, GameError> {
  let session = state.get_session(session_id).await?;
  if !session.is_game_over() {
    return Err(GameError::validation("the round is still in progress"));
  }
  let metro_id = session.target_id();
  let metro = state
    .catalog
    .lookup(metro_id)
    .ok_or_else(|| GameError::configuration(format!("target metro '{metro_id}' missing from catalog")))?;

  let scores = mock_score_distribution(metro_id, state.profile_for(metro_id), DEFAULT_SAMPLE_SIZE);
  let distribution = summarize(&scores, session.score());
  debug!(target: "round", %session_id, metro = %metro_id, outscored = ?distribution.as_ref().map(|d| d.percent_outscored), "Result card built");

  Ok(ResultOut {
    won: session.did_win(),
    metro_name: metro.name.clone(),
    state: metro.state.clone(),
    summary: result_summary(session.did_win(), &metro.name, session.guesses_made(), session.score()),
    highlights: metro.highlights.clone(),
    score: session.score(),
    max_score: STARTING_SCORE,
    guesses: session.guesses_made(),
    distribution,
  })
}

pub fn guess_options(state: &AppState) -> Vec<String> {
  state.options.all_display_names()
}

pub fn hint_registry(state: &AppState) -> Vec<HintDescriptor> {
  state.hints.all().to_vec()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::session::RoundPhase;

  fn state() -> AppState {
    AppState::from_parts(None, Some(5))
  }

  async fn target_name(state: &AppState, id: &str) -> String {
    let s = state.get_session(id).await.unwrap();
    state.catalog.lookup(s.target_id()).unwrap().name.clone()
  }

  fn wrong_names(state: &AppState, answer: &str) -> Vec<String> {
    state.options.all_display_names().into_iter().filter(|n| n != answer).take(5).collect()
  }

  #[tokio::test]
  async fn view_hides_answer_until_round_ends() {
    let st = state();
    let view = start_round(&st, None).await.unwrap();
    assert!(view.answer.is_none());
    assert_eq!(view.hints.len(), 1);
    assert_eq!(view.hints[0].name, "Industry Breakdown");

    let answer = target_name(&st, &view.session_id).await;
    let out = submit_guess(&st, &view.session_id, &answer).await.unwrap();
    assert_eq!(out.outcome, GuessOutcome::Correct);
    assert!(out.notice.is_none());
    assert_eq!(out.session.phase, RoundPhase::Won);
    assert_eq!(out.session.answer.as_ref().unwrap().name, answer);
  }

  #[tokio::test]
  async fn wrong_guess_unlocks_hint_with_notice() {
    let st = state();
    let view = start_round(&st, None).await.unwrap();
    let answer = target_name(&st, &view.session_id).await;
    let wrong = wrong_names(&st, &answer);

    let out = submit_guess(&st, &view.session_id, &wrong[0]).await.unwrap();
    assert_eq!(out.outcome, GuessOutcome::Wrong { hint_unlocked: true, guesses_remaining: 4 });
    assert_eq!(out.notice.unwrap().detail, NEXT_HINT_DETAIL);
    assert_eq!(out.session.score, 40);
    let names: Vec<_> = out.session.hints.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Salary Ranges", "Industry Breakdown"]);
  }

  #[tokio::test]
  async fn losing_round_reports_result_card() {
    let st = state();
    let view = start_round(&st, None).await.unwrap();
    let answer = target_name(&st, &view.session_id).await;
    let wrong = wrong_names(&st, &answer);

    assert!(round_result(&st, &view.session_id).await.is_err());

    let mut last = None;
    for w in &wrong {
      last = Some(submit_guess(&st, &view.session_id, w).await.unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.outcome, GuessOutcome::GameOver);
    assert_eq!(last.notice.unwrap().detail, NO_HINTS_DETAIL);
    assert_eq!(last.session.score, 0);

    let res = round_result(&st, &view.session_id).await.unwrap();
    assert!(!res.won);
    assert_eq!(res.metro_name, answer);
    assert_eq!(res.summary, format!("{answer} kept its secret after 5 guesses. Final score: 0/50."));
    assert_eq!(res.highlights.len(), 4);
    let dist = res.distribution.unwrap();
    assert_eq!(dist.player_bucket, 0);
    assert_eq!(dist.total_samples, DEFAULT_SAMPLE_SIZE);
  }

  #[tokio::test]
  async fn blank_guess_is_rejected_without_consuming_a_guess() {
    let st = state();
    let view = start_round(&st, None).await.unwrap();
    let err = submit_guess(&st, &view.session_id, "  ").await.unwrap_err();
    assert_eq!(err, GameError::validation("select a metro first"));
    assert_eq!(session_view(&st, &view.session_id).await.unwrap().guesses_made, 0);
  }

  #[test]
  fn summaries_match_round_outcome() {
    assert_eq!(
      result_summary(true, "Houston, TX", 2, 40),
      "You cracked the case in 2 guesses and banked 40/50 points."
    );
    assert_eq!(
      result_summary(false, "Houston, TX", 5, 0),
      "Houston, TX kept its secret after 5 guesses. Final score: 0/50."
    );
  }

  #[test]
  fn notice_depends_on_hint_unlock() {
    assert!(wrong_guess_notice(&GuessOutcome::Correct).is_none());
    let n = wrong_guess_notice(&GuessOutcome::Wrong { hint_unlocked: false, guesses_remaining: 1 }).unwrap();
    assert_eq!(n.title, WRONG_TITLE);
    assert_eq!(n.detail, NO_HINTS_DETAIL);
  }

  #[test]
  fn options_and_registry_are_exposed() {
    let st = state();
    assert!(guess_options(&st).contains(&"Washington DC".to_string()));
    assert_eq!(hint_registry(&st).len(), 5);
  }
}
