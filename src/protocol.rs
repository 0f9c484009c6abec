//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::distribution::ScoreSummary;
use crate::domain::{GuessEntry, HintDescriptor};
use crate::session::{GuessOutcome, RoundPhase};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewRound {
        #[serde(rename = "sessionId", default)]
        session_id: Option<String>,
    },
    SubmitGuess {
        #[serde(rename = "sessionId")]
        session_id: String,
        candidate: String,
    },
    Hints {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    State {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Result {
        #[serde(rename = "sessionId")]
        session_id: String,
    },
    Options,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Round {
        session: SessionOut,
    },
    GuessResult(GuessOut),
    /// Sent after the reveal pause that follows a wrong guess.
    HintRevealed {
        hint: HintOut,
    },
    Hints {
        hints: Vec<HintOut>,
    },
    Result(ResultOut),
    Options {
        options: Vec<String>,
    },
    Error {
        message: String,
    },
}

/// Public view of a round. `answer` stays hidden until the round is over.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOut {
    pub session_id: String,
    pub phase: RoundPhase,
    pub score: u32,
    pub max_score: u32,
    pub guesses_made: u32,
    pub max_guesses: u32,
    pub guesses_remaining: u32,
    pub history: Vec<GuessEntry>,
    /// Most recently revealed first.
    pub hints: Vec<HintOut>,
    pub total_hints: usize,
    pub game_over: bool,
    pub game_won: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerOut>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintOut {
    pub index: usize,
    pub name: String,
    pub penalty_display_only: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOut {
    pub name: String,
    pub state: String,
}

/// Wrong-guess toast shown before the next hint appears.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NoticeOut {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOut {
    pub session: SessionOut,
    pub outcome: GuessOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeOut>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultOut {
    pub won: bool,
    pub metro_name: String,
    pub state: String,
    pub summary: String,
    pub highlights: Vec<String>,
    pub score: u32,
    pub max_score: u32,
    pub guesses: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<ScoreSummary>,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize, Default)]
pub struct RoundIn {
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct GuessIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(default)]
    pub candidate: String,
}

#[derive(Serialize)]
pub struct HintsOut {
    pub hints: Vec<HintOut>,
}

#[derive(Serialize)]
pub struct OptionsOut {
    pub options: Vec<String>,
}

#[derive(Serialize)]
pub struct HintRegistryOut {
    pub hints: Vec<HintDescriptor>,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
