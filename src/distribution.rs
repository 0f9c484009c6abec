//! Synthetic "how other players scored" histogram shown on the result screen.
//!
//! Scores land in buckets of 10 between 0 and the starting score. Each metro gets a
//! bell-shaped profile; sampling is seeded from the metro id so every player sees the
//! same crowd for the same metro.

use std::hash::Hasher;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::session::{GUESS_PENALTY, STARTING_SCORE};

pub const DEFAULT_SAMPLE_SIZE: usize = 480;
pub const DEFAULT_PROFILE: ScoreProfile = ScoreProfile { mean: 36.0, std: 7.0 };

/// Baseline weight so the tails of the curve stay represented.
const TAIL_WEIGHT: f64 = 0.25;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScoreProfile {
    pub mean: f64,
    pub std: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BucketCount {
    pub score: u32,
    pub count: usize,
    pub is_player: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub player_bucket: u32,
    pub average_score: f64,
    pub percent_outscored: f64,
    pub percent_tied: f64,
    pub total_samples: usize,
    pub buckets: Vec<BucketCount>,
}

fn buckets() -> Vec<u32> {
    (0..=STARTING_SCORE).step_by(GUESS_PENALTY as usize).collect()
}

/// Draw `sample_size` scores with the given RNG. Every bucket appears at least once.
pub fn sample_scores<R: Rng + ?Sized>(rng: &mut R, profile: ScoreProfile, sample_size: usize) -> Vec<u32> {
    let bins = buckets();
    let std = profile.std.max(1.0);
    let weights: Vec<f64> = bins
        .iter()
        .map(|&b| {
            let z = (f64::from(b) - profile.mean) / std;
            (-0.5 * z * z).exp() + TAIL_WEIGHT
        })
        .collect();

    let draws_needed = sample_size.saturating_sub(bins.len());
    let mut sampled: Vec<u32> = match WeightedIndex::new(&weights) {
        Ok(dist) => (0..draws_needed).map(|_| bins[dist.sample(&mut *rng)]).collect(),
        // All weights carry the positive baseline, so this only triggers on NaN input.
        Err(_) => (0..draws_needed).map(|i| bins[i % bins.len()]).collect(),
    };
    sampled.extend(bins.iter().copied());
    sampled.shuffle(rng);
    sampled
}

/// Deterministic crowd for a metro: seeded from `"<metro id>-scores"`.
pub fn mock_score_distribution(metro_id: &str, profile: ScoreProfile, sample_size: usize) -> Vec<u32> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed_for(metro_id));
    sample_scores(&mut rng, profile, sample_size)
}

fn seed_for(metro_id: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(format!("{metro_id}-scores").as_bytes());
    hasher.finish()
}

/// Nearest bucket, clamped to the playable range.
pub fn player_bucket(score: u32) -> u32 {
    let step = GUESS_PENALTY;
    (((score + step / 2) / step) * step).min(STARTING_SCORE)
}

/// Where the player's score sits among `scores`. Returns None for an empty sample.
pub fn summarize(scores: &[u32], player_score: u32) -> Option<ScoreSummary> {
    if scores.is_empty() {
        return None;
    }
    let total = scores.len();
    let player = player_bucket(player_score);

    let buckets: Vec<BucketCount> = buckets()
        .into_iter()
        .map(|b| BucketCount {
            score: b,
            count: scores.iter().filter(|&&s| s == b).count(),
            is_player: b == player,
        })
        .collect();

    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let less = scores.iter().filter(|&&s| s < player).count();
    let equal = scores.iter().filter(|&&s| s == player).count();
    let pct = |n: usize| n as f64 / total as f64 * 100.0;

    Some(ScoreSummary {
        player_bucket: player,
        average_score: sum as f64 / total as f64,
        percent_outscored: pct(less).clamp(0.0, 100.0),
        percent_tied: pct(equal),
        total_samples: total,
        buckets,
    })
}
