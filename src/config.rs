//! Loading optional game content (extra metros, guess options, score profiles) from TOML.
//!
//! Round rules (starting score, penalty, guess cap, hint count) are fixed and not read here.
//! See `GameConfig` for the expected schema:
//!
//! ```toml
//! hint_reveal_delay_ms = 800
//! max_sessions = 5000
//! extra_guess_options = ["Honolulu, HI"]
//!
//! [[metros]]
//! id = "Boise"
//! name = "Boise, ID"
//! state = "Idaho"
//! highlights = ["..."]
//!
//! [score_profiles.Boise]
//! mean = 35.0
//! std = 6.0
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, info};

use crate::distribution::ScoreProfile;
use crate::domain::MetroRecord;

pub const DEFAULT_HINT_REVEAL_DELAY_MS: u64 = 1100;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub metros: Vec<MetroCfg>,
  #[serde(default)]
  pub extra_guess_options: Vec<String>,
  #[serde(default)]
  pub score_profiles: HashMap<String, ScoreProfile>,
  /// Pause between a wrong-guess notice and the hint reveal on WebSocket clients.
  #[serde(default)]
  pub hint_reveal_delay_ms: Option<u64>,
  /// Upper bound on live sessions kept in memory.
  #[serde(default)]
  pub max_sessions: Option<usize>,
}

/// Metro entry accepted in TOML. Replaces a built-in metro with the same id.
/// Name and state are trimmed; the name is what players must pick.
#[derive(Clone, Debug, Deserialize)]
pub struct MetroCfg {
  pub id: String,
  pub name: String,
  pub state: String,
  #[serde(default)] pub highlights: Vec<String>,
}

impl MetroCfg {
  pub fn into_record(self) -> (String, MetroRecord) {
    (
      self.id.trim().to_string(),
      MetroRecord {
        name: self.name.trim().to_string(),
        state: self.state.trim().to_string(),
        highlights: self.highlights,
      },
    )
  }
}

impl GameConfig {
  pub fn hint_reveal_delay_ms(&self) -> u64 {
    self.hint_reveal_delay_ms.unwrap_or(DEFAULT_HINT_REVEAL_DELAY_MS)
  }

  pub fn max_sessions(&self) -> usize {
    self.max_sessions.unwrap_or(DEFAULT_MAX_SESSIONS).max(1)
  }
}

pub fn parse_game_config(s: &str) -> Result<GameConfig, toml::de::Error> {
  toml::from_str::<GameConfig>(s)
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_game_config(&s) {
      Ok(cfg) => {
        info!(target: "metroguess_backend", %path, metros = cfg.metros.len(), "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "metroguess_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "metroguess_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// Optional fixed seed for round selection (GAME_SEED). Unparsable values are ignored.
pub fn game_seed_from_env() -> Option<u64> {
  std::env::var("GAME_SEED").ok().and_then(|s| s.trim().parse::<u64>().ok())
}
