use super::detect::neutral_description;
use super::{
    CLOCK, DEFAULT_WINDOW_SECS, EventError, GameTechs, MarginDelta, PERIOD, dedupe, delta, detect,
    home_team, window,
};
use anyhow::{Context, anyhow};
use futures_util::{StreamExt, stream};
use log::{debug, error, info, warn};
use nba_stats::endpoints::{GAME_LIST, PLAY_BY_PLAY};
use nba_stats::{Fetch, Record, Request, StatsSession, first_table};

#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    /// Upper bound on play-by-play requests in flight.
    pub workers: usize,
    pub window_secs: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { workers: 10, window_secs: DEFAULT_WINDOW_SECS }
    }
}

/// Outcome of one season run. `games` is in game-log order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonReport {
    pub season: String,
    pub games: Vec<GameTechs>,
    pub failed_games: usize,
    pub skipped_events: usize,
}

impl SeasonReport {
    pub fn tech_count(&self) -> usize {
        self.games.iter().map(|g| g.techs.len()).sum()
    }
}

struct GameOutcome {
    techs: GameTechs,
    skipped: usize,
}

pub struct TechAnalysis<'a, F> {
    session: &'a StatsSession<F>,
    config: AnalysisConfig,
}

impl<'a, F: Fetch> TechAnalysis<'a, F> {
    pub fn new(session: &'a StatsSession<F>, config: AnalysisConfig) -> Self {
        Self { session, config }
    }

    /// Measure every technical foul of `season`.
    ///
    /// Only a missing game list fails the season. Games whose play-by-play is
    /// unavailable are logged and counted in `failed_games`.
    pub async fn run(&self, season: &str) -> anyhow::Result<SeasonReport> {
        let request = Request::new().param("Season", season);
        let result = self
            .session
            .tables(&GAME_LIST, &request)
            .await
            .ok_or_else(|| anyhow!("no game list for {season}"))?;
        let games = first_table(&result).map(dedupe).unwrap_or_default();
        info!("{season}: analyzing {} games", games.len());

        let mut outcomes: Vec<(usize, anyhow::Result<GameOutcome>)> =
            stream::iter(games.iter().enumerate())
                .map(|(idx, game_id)| async move { (idx, self.game(season, game_id).await) })
                .buffer_unordered(self.config.workers.max(1))
                .collect()
                .await;
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut report = SeasonReport { season: season.to_owned(), ..Default::default() };
        for (_, outcome) in outcomes {
            match outcome {
                Ok(outcome) => {
                    report.skipped_events += outcome.skipped;
                    report.games.push(outcome.techs);
                }
                Err(e) => {
                    error!("{season}: {e:#}");
                    report.failed_games += 1;
                }
            }
        }

        info!(
            "{season}: {} techs across {} games ({} games failed, {} techs skipped)",
            report.tech_count(),
            report.games.len(),
            report.failed_games,
            report.skipped_events
        );
        Ok(report)
    }

    async fn game(&self, season: &str, game_id: &str) -> anyhow::Result<GameOutcome> {
        let request = Request::new().param("GameID", game_id).param("Season", season);
        let result = self
            .session
            .call(&PLAY_BY_PLAY, &request)
            .await
            .with_context(|| format!("play-by-play for {game_id}"))?;
        let plays = first_table(&result)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| anyhow!("play-by-play for {game_id} has no plays"))?;

        let home = home_team(plays);
        if home.is_none() {
            warn!("{game_id}: home team unknown, every tech counted as away");
        }

        let mut outcome = GameOutcome {
            techs: GameTechs { game: game_id.to_owned(), techs: Vec::new() },
            skipped: 0,
        };
        for event in detect(plays) {
            debug!(
                "{game_id}: tech at {}: {}",
                event.text(CLOCK).unwrap_or_default(),
                neutral_description(event).unwrap_or_default()
            );
            match self.measure(plays, event, home.as_deref()) {
                Ok(d) => outcome.techs.techs.push(d),
                Err(e) => {
                    warn!("{game_id}: skipping tech at {:?}: {e}", event.text(CLOCK));
                    outcome.skipped += 1;
                }
            }
        }
        debug!("{game_id}: {} techs", outcome.techs.techs.len());
        Ok(outcome)
    }

    fn measure(
        &self,
        plays: &[Record],
        event: &Record,
        home: Option<&str>,
    ) -> Result<MarginDelta, EventError> {
        let clock = event.text(CLOCK).ok_or(EventError::MissingClock)?;
        let period = event.int(PERIOD).ok_or(EventError::MissingClock)?;
        let plays_after = window(plays, &clock, period, self.config.window_secs)?;
        delta(&plays_after, home)
    }
}
