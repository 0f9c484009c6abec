//! Application state: the shared catalog, option list and hints, the round RNG, and the session store.
//!
//! This module owns:
//!   - the metro catalog (built-in seeds plus TOML overrides)
//!   - the guess selector options and the hint registry
//!   - the RNG used to draw round targets (seeded from GAME_SEED when set)
//!   - every live session keyed by an opaque session id
//!
//! Sessions never share mutable state; the store lock only guards the map itself.

use std::{collections::HashMap, sync::Arc, time::Duration};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{game_seed_from_env, load_game_config_from_env, GameConfig};
use crate::distribution::{ScoreProfile, DEFAULT_PROFILE};
use crate::domain::{GuessOptions, HintRegistry, MetroCatalog};
use crate::error::GameError;
use crate::seeds::{seed_catalog, seed_hints, seed_score_profiles, GUESS_OPTION_NAMES};
use crate::session::GameSession;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<MetroCatalog>,
    pub options: Arc<GuessOptions>,
    pub hints: Arc<HintRegistry>,
    pub score_profiles: Arc<HashMap<String, ScoreProfile>>,
    pub sessions: Arc<RwLock<HashMap<String, GameSession>>>,
    pub hint_reveal_delay: Duration,
    pub max_sessions: usize,
    rng: Arc<Mutex<ChaCha20Rng>>,
}

impl AppState {
    /// Build state from env: load TOML content, merge with seeds, seed the RNG.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_parts(load_game_config_from_env(), game_seed_from_env())
    }

    /// Build state from an optional config and an optional RNG seed.
    pub fn from_parts(cfg: Option<GameConfig>, seed: Option<u64>) -> Self {
        let cfg = cfg.unwrap_or_default();

        let mut catalog = seed_catalog();
        for m in cfg.metros.iter().cloned() {
            let (id, record) = m.into_record();
            if id.is_empty() || record.name.is_empty() {
                warn!(target: "metroguess_backend", %id, "Skipping config metro: blank id or name");
                continue;
            }
            // Display names identify the answer, so they must stay unique.
            if let Some(owner) = catalog.id_for_name(&record.name).filter(|owner| *owner != id) {
                warn!(target: "metroguess_backend", %id, %owner, name = %record.name, "Skipping config metro: display name already taken");
                continue;
            }
            if catalog.lookup(&id).is_some() {
                warn!(target: "metroguess_backend", %id, "Config metro replaces built-in entry");
            }
            catalog.insert(id, record);
        }

        let options = GuessOptions::new(
            GUESS_OPTION_NAMES
                .iter()
                .map(|s| s.to_string())
                .chain(cfg.extra_guess_options.iter().cloned()),
            &catalog,
        );

        let mut profiles = seed_score_profiles();
        profiles.extend(cfg.score_profiles.clone());

        let hints = HintRegistry::new(seed_hints().to_vec());

        let rng = match seed {
            Some(s) => {
                info!(target: "metroguess_backend", seed = s, "Round selection uses fixed seed");
                ChaCha20Rng::seed_from_u64(s)
            }
            None => ChaCha20Rng::from_entropy(),
        };

        info!(
            target: "round",
            metros = catalog.len(),
            guess_options = options.len(),
            hints = hints.len(),
            "Startup game inventory"
        );

        Self {
            catalog: Arc::new(catalog),
            options: Arc::new(options),
            hints: Arc::new(hints),
            score_profiles: Arc::new(profiles),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            hint_reveal_delay: Duration::from_millis(cfg.hint_reveal_delay_ms()),
            max_sessions: cfg.max_sessions(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Start a round. With a known session id the session is replaced by a fresh round;
    /// without one a new session id is minted.
    #[instrument(level = "info", skip(self))]
    pub async fn start_round(&self, session_id: Option<&str>) -> Result<(String, GameSession), GameError> {
        let session = {
            let mut rng = self.rng.lock().await;
            GameSession::start_new_round(&self.catalog, &self.hints, &mut *rng)?
        };

        let mut sessions = self.sessions.write().await;
        let id = match session_id {
            Some(id) => {
                let slot = sessions
                    .get_mut(id)
                    .ok_or_else(|| GameError::UnknownSession(id.to_string()))?;
                *slot = session.clone();
                id.to_string()
            }
            None => {
                if sessions.len() >= self.max_sessions {
                    // Finished rounds go first; in-progress ones are never dropped.
                    sessions.retain(|_, s| !s.is_game_over());
                    if sessions.len() >= self.max_sessions {
                        warn!(target: "round", live_sessions = sessions.len(), "Session store full");
                        return Err(GameError::Capacity);
                    }
                }
                let id = Uuid::new_v4().to_string();
                sessions.insert(id.clone(), session.clone());
                id
            }
        };
        info!(target: "round", session_id = %id, live_sessions = sessions.len(), "Round started");
        Ok((id, session))
    }

    /// Snapshot of a session.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_session(&self, session_id: &str) -> Result<GameSession, GameError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| GameError::UnknownSession(session_id.to_string()))
    }

    /// Run `f` against one session under the store's write lock.
    pub async fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
    ) -> Result<T, GameError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| GameError::UnknownSession(session_id.to_string()))?;
        f(session)
    }

    /// Drop sessions nobody will come back to (e.g. minted by a closed socket).
    #[instrument(level = "debug", skip(self), fields(count = session_ids.len()))]
    pub async fn end_sessions(&self, session_ids: &[String]) {
        if session_ids.is_empty() {
            return;
        }
        let mut sessions = self.sessions.write().await;
        for id in session_ids {
            sessions.remove(id);
        }
        info!(target: "round", ended = session_ids.len(), live_sessions = sessions.len(), "Sessions ended");
    }

    pub fn profile_for(&self, metro_id: &str) -> ScoreProfile {
        self.score_profiles.get(metro_id).copied().unwrap_or(DEFAULT_PROFILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_game_config;

    #[tokio::test]
    async fn new_round_mints_session_and_replay_keeps_id() {
        let state = AppState::from_parts(None, Some(3));
        let (id, s) = state.start_round(None).await.unwrap();
        assert_eq!(s.guesses_made(), 0);

        let target = state.catalog.lookup(s.target_id()).unwrap().name.clone();
        state
            .with_session(&id, |s| s.submit_guess(&target, &state.options))
            .await
            .unwrap();
        assert!(state.get_session(&id).await.unwrap().is_game_over());

        let (again, fresh) = state.start_round(Some(&id)).await.unwrap();
        assert_eq!(again, id);
        assert!(!fresh.is_game_over());
        assert!(!state.get_session(&id).await.unwrap().is_game_over());
        assert_eq!(state.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_reported() {
        let state = AppState::from_parts(None, Some(3));
        let err = state.start_round(Some("nope")).await.unwrap_err();
        assert_eq!(err, GameError::UnknownSession("nope".into()));
        assert!(state.get_session("nope").await.is_err());
    }

    #[tokio::test]
    async fn same_seed_draws_same_targets() {
        let a = AppState::from_parts(None, Some(11));
        let b = AppState::from_parts(None, Some(11));
        for _ in 0..5 {
            let (_, sa) = a.start_round(None).await.unwrap();
            let (_, sb) = b.start_round(None).await.unwrap();
            assert_eq!(sa.target_id(), sb.target_id());
        }
    }

    #[test]
    fn config_metros_join_catalog_and_options() {
        let cfg = parse_game_config(
            "extra_guess_options = [\"Nowhere, ZZ\"]\n[[metros]]\nid = \"Boise\"\nname = \"Boise, ID\"\nstate = \"Idaho\"\n",
        )
        .unwrap();
        let state = AppState::from_parts(Some(cfg), Some(1));
        assert_eq!(state.catalog.len(), 6);
        assert!(state.options.contains("Boise, ID"));
        assert!(state.options.contains("Nowhere, ZZ"));
        assert_eq!(state.profile_for("Boise"), DEFAULT_PROFILE);
        assert_eq!(state.profile_for("Houston"), ScoreProfile { mean: 44.0, std: 5.0 });
    }

    #[tokio::test]
    async fn padded_config_name_is_still_winnable() {
        let cfg = parse_game_config(
            "[[metros]]\nid = \"Memphis\"\nname = \" Boise, ID \"\nstate = \"Idaho\"\n\n[[metros]]\nid = \"Ghost\"\nname = \"   \"\nstate = \"Nowhere\"\n",
        )
        .unwrap();
        let state = AppState::from_parts(Some(cfg), Some(4));
        assert_eq!(state.catalog.lookup("Memphis").unwrap().name, "Boise, ID");
        assert!(state.catalog.lookup("Ghost").is_none());
        assert!(state.options.contains("Boise, ID"));
        assert!(!state.options.contains(" Boise, ID "));

        // Draw until the replaced metro comes up, then win it with the padded pick.
        for _ in 0..64 {
            let (id, s) = state.start_round(None).await.unwrap();
            if s.target_id() != "Memphis" {
                continue;
            }
            state
                .with_session(&id, |s| s.submit_guess(" Boise, ID ", &state.options))
                .await
                .unwrap();
            assert!(state.get_session(&id).await.unwrap().did_win());
            return;
        }
        panic!("replaced metro was never drawn");
    }

    #[test]
    fn config_metro_cannot_reuse_a_display_name() {
        let cfg = parse_game_config(
            "[[metros]]\nid = \"Memphis2\"\nname = \"Memphis, TN\"\nstate = \"Tennessee\"\n\n[[metros]]\nid = \"Memphis\"\nname = \"Memphis, TN\"\nstate = \"TN\"\n",
        )
        .unwrap();
        let state = AppState::from_parts(Some(cfg), Some(1));
        assert!(state.catalog.lookup("Memphis2").is_none());
        let named: Vec<_> = state.catalog.records().filter(|(_, m)| m.name == "Memphis, TN").collect();
        assert_eq!(named.len(), 1);
        // Same id keeping its own name is a plain replacement.
        assert_eq!(state.catalog.lookup("Memphis").unwrap().state, "TN");
    }

    #[tokio::test]
    async fn full_store_evicts_finished_rounds_then_refuses() {
        let mut state = AppState::from_parts(None, Some(8));
        state.max_sessions = 2;
        let (first, s) = state.start_round(None).await.unwrap();
        let answer = state.catalog.lookup(s.target_id()).unwrap().name.clone();
        state.with_session(&first, |s| s.submit_guess(&answer, &state.options)).await.unwrap();
        let (second, _) = state.start_round(None).await.unwrap();

        let (third, _) = state.start_round(None).await.unwrap();
        assert!(state.get_session(&first).await.is_err());
        assert!(state.get_session(&second).await.is_ok());
        assert!(state.get_session(&third).await.is_ok());

        assert_eq!(state.start_round(None).await.unwrap_err(), GameError::Capacity);
        // Replaying an existing session never needs a new slot.
        assert!(state.start_round(Some(&second)).await.is_ok());
    }

    #[tokio::test]
    async fn ended_sessions_are_removed() {
        let state = AppState::from_parts(None, Some(2));
        let (a, _) = state.start_round(None).await.unwrap();
        let (b, _) = state.start_round(None).await.unwrap();
        state.end_sessions(&[a.clone()]).await;
        assert!(state.get_session(&a).await.is_err());
        assert!(state.get_session(&b).await.is_ok());
    }
}
