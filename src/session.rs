//! Round rules: target selection, guess evaluation, hint unlocking, scoring and termination.
//!
//! A `GameSession` is created only through `GameSession::start_new_round`; replaying
//! a round replaces the session wholesale. Randomness is injected so callers (and
//! tests) decide how targets are drawn.

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{GuessEntry, GuessOptions, GuessStatus, HintRegistry, MetroCatalog};
use crate::error::GameError;

pub const STARTING_SCORE: u32 = 50;
pub const GUESS_PENALTY: u32 = 10;
pub const MAX_GUESSES: u32 = 5;
/// One free hint plus four unlocked by wrong guesses.
pub const TOTAL_HINTS: usize = 5;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    AwaitingGuess,
    Won,
    Lost,
}

/// What a valid guess did to the round.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GuessOutcome {
    Correct,
    Wrong {
        #[serde(rename = "hintUnlocked")]
        hint_unlocked: bool,
        #[serde(rename = "guessesRemaining")]
        guesses_remaining: u32,
    },
    /// Wrong guess that used up the last attempt.
    GameOver,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    target_id: String,
    target_name: String,
    score: u32,
    guesses_made: u32,
    history: Vec<GuessEntry>,
    revealed_hints: Vec<usize>,
    total_hints: usize,
    phase: RoundPhase,
}

impl GameSession {
    /// Pick a target uniformly from the catalog and reset every counter.
    #[instrument(level = "debug", skip_all, fields(catalog_len = catalog.len(), hints = hints.len()))]
    pub fn start_new_round<R: Rng + ?Sized>(
        catalog: &MetroCatalog,
        hints: &HintRegistry,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if hints.is_empty() {
            return Err(GameError::configuration("hint registry is empty"));
        }
        let ids = catalog.all_ids();
        let target_id = ids
            .choose(rng)
            .copied()
            .ok_or_else(|| GameError::configuration("metro catalog is empty"))?;
        let target = catalog.lookup(target_id).ok_or_else(|| {
            GameError::configuration(format!("target metro '{target_id}' missing from catalog"))
        })?;

        debug!(target: "round", metro = %target_id, "Round target selected");
        Ok(Self {
            target_id: target_id.to_string(),
            target_name: target.name.clone(),
            score: STARTING_SCORE,
            guesses_made: 0,
            history: Vec::new(),
            revealed_hints: vec![0],
            total_hints: hints.len(),
            phase: RoundPhase::AwaitingGuess,
        })
    }

    /// Revealed hint indices, most recently revealed first.
    pub fn current_hints(&self) -> Vec<usize> {
        self.revealed_hints.iter().rev().copied().collect()
    }

    /// Apply one guess. Invalid input leaves the session untouched.
    #[instrument(level = "debug", skip(self, options), fields(metro = %self.target_id, guesses_made = self.guesses_made))]
    pub fn submit_guess(
        &mut self,
        candidate: &str,
        options: &GuessOptions,
    ) -> Result<GuessOutcome, GameError> {
        if self.is_game_over() {
            return Err(GameError::validation(
                "the round is over; start a new round to keep playing",
            ));
        }
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(GameError::validation("select a metro first"));
        }
        if !options.contains(candidate) {
            return Err(GameError::validation(format!(
                "'{candidate}' is not one of the available metros"
            )));
        }

        self.guesses_made += 1;

        if candidate == self.target_name {
            self.history.push(GuessEntry {
                value: candidate.to_string(),
                status: GuessStatus::Correct,
            });
            self.phase = RoundPhase::Won;
            info!(target: "round", metro = %self.target_id, guesses = self.guesses_made, score = self.score, "Round won");
            return Ok(GuessOutcome::Correct);
        }

        self.history.push(GuessEntry {
            value: candidate.to_string(),
            status: GuessStatus::Wrong,
        });
        self.score = self.score.saturating_sub(GUESS_PENALTY);

        if self.guesses_made >= MAX_GUESSES {
            // Running out of guesses forfeits whatever score was left.
            self.score = 0;
            self.phase = RoundPhase::Lost;
            info!(target: "round", metro = %self.target_id, guesses = self.guesses_made, "Round lost");
            return Ok(GuessOutcome::GameOver);
        }

        let hint_unlocked = self.revealed_hints.len() < self.total_hints;
        if hint_unlocked {
            self.revealed_hints.push(self.revealed_hints.len());
        }
        debug!(target: "round", metro = %self.target_id, score = self.score, hint_unlocked, "Wrong guess");
        Ok(GuessOutcome::Wrong {
            hint_unlocked,
            guesses_remaining: self.guesses_remaining(),
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.phase != RoundPhase::AwaitingGuess
    }

    pub fn did_win(&self) -> bool {
        self.phase == RoundPhase::Won
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn guess_history(&self) -> &[GuessEntry] {
        &self.history
    }

    pub fn guesses_made(&self) -> u32 {
        self.guesses_made
    }

    pub fn guesses_remaining(&self) -> u32 {
        MAX_GUESSES.saturating_sub(self.guesses_made)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn total_hints(&self) -> usize {
        self.total_hints
    }
}
