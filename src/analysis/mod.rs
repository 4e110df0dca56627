//! Technical-foul impact analysis: find each technical in a game's
//! play-by-play, take the plays that follow it, and measure the margin swing.

pub mod dedupe;
pub mod detect;
pub mod margin;
pub mod orchestrator;
pub mod window;

use serde::Serialize;
use std::fmt;

pub use dedupe::dedupe;
pub use detect::{detect, home_team};
pub use margin::delta;
pub use orchestrator::{AnalysisConfig, SeasonReport, TechAnalysis};
pub use window::window;

// Play-by-play columns the analysis reads.
pub const GAME_ID: &str = "GAME_ID";
pub const PERIOD: &str = "PERIOD";
pub const CLOCK: &str = "PCTIMESTRING";
pub const HOME_DESCRIPTION: &str = "HOMEDESCRIPTION";
pub const VISITOR_DESCRIPTION: &str = "VISITORDESCRIPTION";
pub const TEAM: &str = "PLAYER1_TEAM_ABBREVIATION";
pub const SCORE: &str = "SCORE";
pub const SCORE_MARGIN: &str = "SCOREMARGIN";

pub const DEFAULT_WINDOW_SECS: u32 = 240;

/// Scoring swing after one technical foul.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarginDelta {
    pub team: Option<String>,
    pub margin_change: i64,
    pub original_score: Option<String>,
    pub final_score: Option<String>,
    pub time_committed: String,
}

/// Every measured technical in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameTechs {
    pub game: String,
    pub techs: Vec<MarginDelta>,
}

/// Why a single technical could not be measured. The rest of the game is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    MissingClock,
    BadClock(String),
    /// No play in the window carried a score margin.
    EmptyWindow,
    BadMargin(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::MissingClock => write!(f, "event has no clock or period"),
            EventError::BadClock(clock) => write!(f, "unreadable clock {clock:?}"),
            EventError::EmptyWindow => write!(f, "no scored play in window"),
            EventError::BadMargin(margin) => write!(f, "unreadable score margin {margin:?}"),
        }
    }
}

impl std::error::Error for EventError {}
