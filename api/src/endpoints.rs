use crate::client::{Fetch, Params};
use crate::envelope::{NormalizeError, normalize};
use crate::lookup::LookupTables;
use crate::season::{current_season, season_id, start_year};
use crate::CanonicalResult;
use chrono::Utc;
use log::{debug, warn};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Registry types
// ---------------------------------------------------------------------------

/// Default value of one schema parameter. Season-shaped defaults follow the
/// session's season rather than being pinned to a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Fixed(&'static str),
    /// `"2015-16"`
    Season,
    /// `"22015"`
    SeasonId,
    /// `"2015"`
    SeasonStartYear,
}

use ParamDefault::{Fixed, Season, SeasonId, SeasonStartYear};

type Schema = &'static [(&'static str, ParamDefault)];

/// Which looked-up ID an endpoint is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    League,
    Player,
    Team,
}

/// One remote stats resource: where it lives and what it accepts.
#[derive(Debug)]
pub struct Endpoint {
    pub name: &'static str,
    pub path: &'static str,
    /// Parameter groups, concatenated in order. Later groups win on duplicate keys.
    pub schema: &'static [Schema],
    pub subject: Subject,
}

impl Endpoint {
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }

    /// Fresh parameter map with every schema default filled in for `season`.
    pub fn defaults(&self, season: &str) -> Params {
        self.schema
            .iter()
            .flat_map(|group| group.iter())
            .map(|(key, default)| (key.to_string(), resolve_default(*default, season)))
            .collect()
    }

    /// Build the final query parameters for a request.
    ///
    /// Resolved IDs go in first under `PlayerID` / `TeamID`; caller overrides are
    /// then applied to keys already present. A name that fails to resolve
    /// leaves its ID key out of the query unless the caller overrides that key.
    pub fn params(&self, request: &Request, season: &str, lookups: &LookupTables) -> Params {
        let mut params = self.defaults(season);
        let mut unresolved = Vec::new();

        if let Some(player) = request.player.as_deref() {
            let id = lookups.resolve_player(player);
            if id.is_none() {
                warn!("{}: no player ID for {player:?}", self.name);
                unresolved.push("PlayerID");
            }
            params.insert("PlayerID".into(), id.unwrap_or_default());
        }
        if let Some(team) = request.team.as_deref() {
            let id = lookups.resolve_team(team);
            if id.is_none() {
                warn!("{}: no team ID for {team:?}", self.name);
                unresolved.push("TeamID");
            }
            params.insert("TeamID".into(), id.unwrap_or_default());
        }

        let mut params = merge(params, &request.overrides);
        for key in unresolved {
            if !request.overrides.contains_key(key) {
                params.remove(key);
            }
        }
        params
    }
}

fn resolve_default(default: ParamDefault, season: &str) -> String {
    match default {
        Fixed(value) => value.to_owned(),
        Season => season.to_owned(),
        SeasonId => season_id(season).unwrap_or_default(),
        SeasonStartYear => start_year(season).map(|y| y.to_string()).unwrap_or_default(),
    }
}

/// Overlay caller values onto a schema. Keys the schema doesn't know are ignored.
pub fn merge(mut base: Params, overrides: &Params) -> Params {
    for (key, value) in overrides {
        if let Some(slot) = base.get_mut(key) {
            *slot = value.clone();
        }
    }
    base
}

/// Caller side of one endpoint call.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub player: Option<String>,
    pub team: Option<String>,
    pub overrides: Params,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(mut self, name: impl Into<String>) -> Self {
        self.player = Some(name.into());
        self
    }

    pub fn team(mut self, name: impl Into<String>) -> Self {
        self.team = Some(name.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Session: transport + lookups + season, shared by every endpoint call
// ---------------------------------------------------------------------------

pub struct StatsSession<F> {
    fetcher: F,
    lookups: LookupTables,
    base_url: String,
    season: String,
}

impl<F: Fetch> StatsSession<F> {
    pub fn new(fetcher: F, lookups: LookupTables) -> Self {
        Self {
            fetcher,
            lookups,
            base_url: crate::client::STATS_HOST.to_owned(),
            season: current_season(Utc::now()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn lookups(&self) -> &LookupTables {
        &self.lookups
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Raw payload for an arbitrary URL. Transport failures are logged and become `None`.
    pub async fn fetch_raw(&self, url: &str, params: &Params) -> Option<Value> {
        match self.fetcher.fetch(url, params).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    /// Call an endpoint and normalize the response.
    pub async fn call(
        &self,
        endpoint: &Endpoint,
        request: &Request,
    ) -> Result<CanonicalResult, NormalizeError> {
        let params = endpoint.params(request, &self.season, &self.lookups);
        let url = endpoint.url(&self.base_url);
        debug!("{} -> {url} ({} params)", endpoint.name, params.len());
        let payload = self.fetch_raw(&url, &params).await;
        normalize(payload.as_ref())
    }

    /// `call`, with failures logged and folded into `None`.
    pub async fn tables(&self, endpoint: &Endpoint, request: &Request) -> Option<CanonicalResult> {
        match self.call(endpoint, request).await {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("{}: {e}", endpoint.name);
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

const LEAGUE: Schema = &[("LeagueID", Fixed("00"))];

const SEASON_REGULAR: Schema = &[
    ("Season", Season),
    ("SeasonType", Fixed("Regular Season")),
];

/// Split filters shared by the player and team dashboards.
const DASH_FILTERS: Schema = &[
    ("DateFrom", Fixed("")),
    ("DateTo", Fixed("")),
    ("GameSegment", Fixed("")),
    ("LastNGames", Fixed("0")),
    ("Location", Fixed("")),
    ("Month", Fixed("0")),
    ("OpponentTeamID", Fixed("0")),
    ("Outcome", Fixed("")),
    ("PaceAdjust", Fixed("N")),
    ("PerMode", Fixed("PerGame")),
    ("Period", Fixed("0")),
    ("SeasonSegment", Fixed("")),
    ("VsConference", Fixed("")),
    ("VsDivision", Fixed("")),
];

const MEASURE: Schema = &[
    ("MeasureType", Fixed("Base")),
    ("PORound", Fixed("0")),
    ("PlusMinus", Fixed("N")),
    ("Rank", Fixed("N")),
];

const PLAYER_DASH_EXTRA: Schema = &[("ShotClockRange", Fixed(""))];

const TRACKING_EXTRA: Schema = &[("TeamID", Fixed("0"))];

const TEAM_DASH_EXTRA: Schema = &[
    ("Conference", Fixed("")),
    ("Division", Fixed("")),
    ("GameScope", Fixed("")),
    ("PlayerExperience", Fixed("")),
    ("PlayerPosition", Fixed("")),
    ("ShotClockRange", Fixed("")),
    ("StarterBench", Fixed("")),
    ("TeamID", Fixed("0")),
];

const LEAGUE_PLAYER_EXTRA: Schema = &[
    ("College", Fixed("")),
    ("Country", Fixed("")),
    ("DraftPick", Fixed("")),
    ("DraftYear", Fixed("")),
    ("Height", Fixed("")),
    ("Weight", Fixed("")),
];

const CLUTCH: Schema = &[
    ("AheadBehind", Fixed("Ahead or Behind")),
    ("ClutchTime", Fixed("Last 5 Minutes")),
    ("PointDiff", Fixed("5")),
];

const DISTANCE: Schema = &[("DistanceRange", Fixed("5ft Range"))];

const GAME_LOG_SORT: Schema = &[
    ("Counter", Fixed("1000")),
    ("Direction", Fixed("DESC")),
    ("PlayerOrTeam", Fixed("P")),
    ("Sorter", Fixed("PTS")),
];

const COMBINE: Schema = &[("LeagueID", Fixed("00")), ("SeasonYear", Season)];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

macro_rules! endpoint {
    ($subject:ident, $name:expr, $path:expr, $schema:expr $(,)?) => {
        Endpoint { name: $name, path: $path, schema: $schema, subject: Subject::$subject }
    };
}

pub static LEAGUE_LEADERS: Endpoint = endpoint!(
    League,
    "league_leaders",
    "/stats/leagueleaders",
    &[LEAGUE, &[("PerMode", Fixed("PerGame")), ("Scope", Fixed("S")), ("StatCategory", Fixed("PTS"))], SEASON_REGULAR],
);

pub static ALL_PLAYERS: Endpoint = endpoint!(
    League,
    "all_players",
    "/stats/commonallplayers",
    &[&[("IsOnlyCurrentSeason", Fixed("0")), ("LeagueID", Fixed("00")), ("Season", Season)]],
);

/// League-wide team dashboard; also the source of the team lookup file.
pub static ALL_TEAMS: Endpoint = endpoint!(
    League,
    "all_teams",
    "/stats/leaguedashteamstats",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, SEASON_REGULAR],
);

pub static LEAGUE_PLAYER_STATS: Endpoint = endpoint!(
    League,
    "league_player_stats",
    "/stats/leaguedashplayerstats",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, LEAGUE_PLAYER_EXTRA, SEASON_REGULAR],
);

pub static LEAGUE_PLAYER_CLUTCH: Endpoint = endpoint!(
    League,
    "league_player_clutch",
    "/stats/leaguedashplayerclutch",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, LEAGUE_PLAYER_EXTRA, CLUTCH, SEASON_REGULAR],
);

pub static LEAGUE_PLAYER_BIOS: Endpoint = endpoint!(
    League,
    "league_player_bios",
    "/stats/leaguedashplayerbiostats",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, LEAGUE_PLAYER_EXTRA, CLUTCH, DISTANCE, SEASON_REGULAR],
);

pub static LEAGUE_PLAYER_SHOT_LOCATIONS: Endpoint = endpoint!(
    League,
    "league_player_shot_locations",
    "/stats/leaguedashplayershotlocations",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, LEAGUE_PLAYER_EXTRA, CLUTCH, DISTANCE, SEASON_REGULAR],
);

pub static LEAGUE_GAME_LOG: Endpoint = endpoint!(
    League,
    "league_game_log",
    "/stats/leaguegamelog",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, LEAGUE_PLAYER_EXTRA, CLUTCH, DISTANCE, GAME_LOG_SORT, SEASON_REGULAR],
);

/// Team-perspective game log: every game appears once per side.
pub static GAME_LIST: Endpoint = endpoint!(
    League,
    "game_list",
    "/stats/leaguegamelog",
    &[LEAGUE, GAME_LOG_SORT, &[("PlayerOrTeam", Fixed("T"))], SEASON_REGULAR],
);

pub static PLAY_BY_PLAY: Endpoint = endpoint!(
    League,
    "play_by_play",
    "/stats/playbyplayv2",
    &[
        &[
            ("EndPeriod", Fixed("10")),
            ("EndRange", Fixed("55800")),
            ("GameID", Fixed("")),
            ("RangeType", Fixed("2")),
            ("StartPeriod", Fixed("1")),
            ("StartRange", Fixed("0")),
        ],
        SEASON_REGULAR,
    ],
);

pub static SCOREBOARD: Endpoint = endpoint!(
    League,
    "scoreboard",
    "/stats/scoreboardV2",
    &[LEAGUE, &[("DayOffset", Fixed("")), ("GameDate", Fixed(""))]],
);

pub static PLAYOFF_PICTURE: Endpoint = endpoint!(
    League,
    "playoff_picture",
    "/stats/playoffpicture",
    &[LEAGUE, &[("SeasonID", SeasonId)]],
);

pub static FRANCHISE_HISTORY: Endpoint =
    endpoint!(League, "franchise_history", "/stats/franchisehistory", &[LEAGUE]);

pub static DRAFT_COMBINE_STATS: Endpoint =
    endpoint!(League, "draft_combine_stats", "/stats/draftcombinestats", &[COMBINE]);

pub static DRAFT_COMBINE_SPOT_SHOOTING: Endpoint =
    endpoint!(League, "draft_combine_spot_shooting", "/stats/draftcombinespotshooting", &[COMBINE]);

pub static DRAFT_COMBINE_NON_STATIONARY: Endpoint = endpoint!(
    League,
    "draft_combine_non_stationary",
    "/stats/draftcombinenonstationaryshooting",
    &[COMBINE],
);

pub static DRAFT_COMBINE_DRILLS: Endpoint =
    endpoint!(League, "draft_combine_drills", "/stats/draftcombinedrillresults", &[COMBINE]);

pub static DRAFT_COMBINE_ANTHRO: Endpoint =
    endpoint!(League, "draft_combine_anthro", "/stats/draftcombineplayeranthro", &[COMBINE]);

pub static DRAFT_HISTORY: Endpoint = endpoint!(
    League,
    "draft_history",
    "/stats/drafthistory",
    &[
        LEAGUE,
        &[
            ("College", Fixed("")),
            ("OverallPick", Fixed("")),
            ("RoundNum", Fixed("")),
            ("RoundPick", Fixed("")),
            ("Season", SeasonStartYear),
            ("TeamID", Fixed("0")),
            ("TopX", Fixed("")),
        ],
    ],
);

pub static PLAYER_GENERAL_SPLITS: Endpoint = endpoint!(
    Player,
    "player_general_splits",
    "/stats/playerdashboardbygeneralsplits",
    &[LEAGUE, DASH_FILTERS, MEASURE, PLAYER_DASH_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_SHOT_TRACKING: Endpoint = endpoint!(
    Player,
    "player_shot_tracking",
    "/stats/playerdashptshots",
    &[LEAGUE, DASH_FILTERS, TRACKING_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_REBOUND_TRACKING: Endpoint = endpoint!(
    Player,
    "player_rebound_tracking",
    "/stats/playerdashptreb",
    &[LEAGUE, DASH_FILTERS, TRACKING_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_PASS_TRACKING: Endpoint = endpoint!(
    Player,
    "player_pass_tracking",
    "/stats/playerdashptpass",
    &[LEAGUE, DASH_FILTERS, TRACKING_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_DEFENSE_TRACKING: Endpoint = endpoint!(
    Player,
    "player_defense_tracking",
    "/stats/playerdashptshotdefend",
    &[LEAGUE, DASH_FILTERS, TRACKING_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_SHOT_LOG: Endpoint = endpoint!(
    Player,
    "player_shot_log",
    "/stats/playerdashptshotlog",
    &[LEAGUE, DASH_FILTERS, TRACKING_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_REBOUND_LOG: Endpoint = endpoint!(
    Player,
    "player_rebound_log",
    "/stats/playerdashptreboundlogs",
    &[LEAGUE, DASH_FILTERS, TRACKING_EXTRA, SEASON_REGULAR],
);

pub static PLAYER_GAME_LOG: Endpoint =
    endpoint!(Player, "player_game_log", "/stats/playergamelog", &[LEAGUE, SEASON_REGULAR]);

pub static PLAYER_CAREER: Endpoint = endpoint!(
    Player,
    "player_career",
    "/stats/playercareerstats",
    &[LEAGUE, &[("PerMode", Fixed("PerGame"))], SEASON_REGULAR],
);

pub static TEAM_GENERAL_SPLITS: Endpoint = endpoint!(
    Team,
    "team_general_splits",
    "/stats/teamdashboardbygeneralsplits",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, SEASON_REGULAR],
);

pub static TEAM_LINEUPS: Endpoint = endpoint!(
    Team,
    "team_lineups",
    "/stats/teamdashlineups",
    &[
        LEAGUE,
        DASH_FILTERS,
        MEASURE,
        TEAM_DASH_EXTRA,
        &[("GameID", Fixed("")), ("GroupQuantity", Fixed("5"))],
        SEASON_REGULAR,
    ],
);

pub static TEAM_PLAYERS: Endpoint = endpoint!(
    Team,
    "team_players",
    "/stats/teamplayerdashboard",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, SEASON_REGULAR],
);

pub static TEAM_ON_OFF: Endpoint = endpoint!(
    Team,
    "team_on_off",
    "/stats/teamplayeronoffdetails",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, &[("PerMode", Fixed("Per48"))], SEASON_REGULAR],
);

pub static TEAM_GAME_LOG: Endpoint =
    endpoint!(Team, "team_game_log", "/stats/teamgamelog", &[LEAGUE, SEASON_REGULAR]);

pub static TEAM_HISTORY: Endpoint = endpoint!(
    Team,
    "team_history",
    "/stats/teamyearbyyearstats",
    &[LEAGUE, &[("PerMode", Fixed("Totals")), ("SeasonType", Fixed("Regular Season"))]],
);

pub static TEAM_SHOT_TRACKING: Endpoint = endpoint!(
    Team,
    "team_shot_tracking",
    "/stats/teamdashptshots",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, SEASON_REGULAR],
);

pub static TEAM_REBOUND_TRACKING: Endpoint = endpoint!(
    Team,
    "team_rebound_tracking",
    "/stats/teamdashptreb",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, SEASON_REGULAR],
);

pub static TEAM_PASS_TRACKING: Endpoint = endpoint!(
    Team,
    "team_pass_tracking",
    "/stats/teamdashptpass",
    &[LEAGUE, DASH_FILTERS, MEASURE, TEAM_DASH_EXTRA, SEASON_REGULAR],
);

pub static TEAM_ROSTER: Endpoint =
    endpoint!(Team, "team_roster", "/stats/commonteamroster", &[LEAGUE, &[("Season", Season)]]);

pub static TEAM_INFO: Endpoint =
    endpoint!(Team, "team_info", "/stats/teaminfocommon", &[LEAGUE, SEASON_REGULAR]);

pub static ENDPOINTS: &[&Endpoint] = &[
    &LEAGUE_LEADERS,
    &ALL_PLAYERS,
    &ALL_TEAMS,
    &LEAGUE_PLAYER_STATS,
    &LEAGUE_PLAYER_CLUTCH,
    &LEAGUE_PLAYER_BIOS,
    &LEAGUE_PLAYER_SHOT_LOCATIONS,
    &LEAGUE_GAME_LOG,
    &GAME_LIST,
    &PLAY_BY_PLAY,
    &SCOREBOARD,
    &PLAYOFF_PICTURE,
    &FRANCHISE_HISTORY,
    &DRAFT_COMBINE_STATS,
    &DRAFT_COMBINE_SPOT_SHOOTING,
    &DRAFT_COMBINE_NON_STATIONARY,
    &DRAFT_COMBINE_DRILLS,
    &DRAFT_COMBINE_ANTHRO,
    &DRAFT_HISTORY,
    &PLAYER_GENERAL_SPLITS,
    &PLAYER_SHOT_TRACKING,
    &PLAYER_REBOUND_TRACKING,
    &PLAYER_PASS_TRACKING,
    &PLAYER_DEFENSE_TRACKING,
    &PLAYER_SHOT_LOG,
    &PLAYER_REBOUND_LOG,
    &PLAYER_GAME_LOG,
    &PLAYER_CAREER,
    &TEAM_GENERAL_SPLITS,
    &TEAM_LINEUPS,
    &TEAM_PLAYERS,
    &TEAM_ON_OFF,
    &TEAM_GAME_LOG,
    &TEAM_HISTORY,
    &TEAM_SHOT_TRACKING,
    &TEAM_REBOUND_TRACKING,
    &TEAM_PASS_TRACKING,
    &TEAM_ROSTER,
    &TEAM_INFO,
];

pub fn find(name: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().copied().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiResult;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn empty_lookups() -> LookupTables {
        let dir = std::env::temp_dir().join(format!("nba-stats-endpoints-{}", std::process::id()));
        LookupTables::new(dir.join("no-players.txt"), dir.join("no-teams.txt"))
    }

    /// Serves canned payloads keyed by URL and records every query.
    struct CannedFetch {
        bodies: HashMap<String, Value>,
        seen: Mutex<Vec<(String, Params)>>,
    }

    impl Fetch for CannedFetch {
        async fn fetch(&self, url: &str, params: &Params) -> ApiResult<Value> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_owned(), params.clone()));
            Ok(self.bodies.get(url).cloned().unwrap_or(Value::Null))
        }
    }

    #[test]
    fn merge_replaces_shared_keys_and_drops_unknown_ones() {
        let base = params(&[("Season", "2015-16"), ("LeagueID", "00")]);
        let merged = merge(base, &params(&[("Season", "2014-15"), ("Bogus", "x")]));
        assert_eq!(merged, params(&[("Season", "2014-15"), ("LeagueID", "00")]));
    }

    #[test]
    fn defaults_follow_the_season() {
        let picture = PLAYOFF_PICTURE.defaults("2014-15");
        assert_eq!(picture.get("SeasonID").map(String::as_str), Some("22014"));

        let draft = DRAFT_HISTORY.defaults("2014-15");
        assert_eq!(draft.get("Season").map(String::as_str), Some("2014"));

        let games = GAME_LIST.defaults("2014-15");
        assert_eq!(games.get("Season").map(String::as_str), Some("2014-15"));
        assert_eq!(games.get("PlayerOrTeam").map(String::as_str), Some("T"));
    }

    #[test]
    fn clutch_schema_is_a_superset_of_league_dash() {
        let dash = LEAGUE_PLAYER_STATS.defaults("2015-16");
        let clutch = LEAGUE_PLAYER_CLUTCH.defaults("2015-16");
        assert!(dash.keys().all(|k| clutch.contains_key(k)));
        assert_eq!(clutch.get("ClutchTime").map(String::as_str), Some("Last 5 Minutes"));
    }

    #[test]
    fn unresolved_player_leaves_id_out() {
        let request = Request::new().player("Nobody Atall");
        let params = PLAYER_GAME_LOG.params(&request, "2015-16", &empty_lookups());
        assert!(!params.contains_key("PlayerID"));
        assert_eq!(params.get("Season").map(String::as_str), Some("2015-16"));
    }

    #[test]
    fn override_wins_over_unresolved_name() {
        let request = Request::new().team("Nowhere").param("TeamID", "1610612744");
        let params = TEAM_GENERAL_SPLITS.params(&request, "2015-16", &empty_lookups());
        assert_eq!(params.get("TeamID").map(String::as_str), Some("1610612744"));

        let request = Request::new().param("TeamID", "1610612744");
        let params = TEAM_GENERAL_SPLITS.params(&request, "2015-16", &empty_lookups());
        assert_eq!(params.get("TeamID").map(String::as_str), Some("1610612744"));
    }

    #[test]
    fn override_applies_even_when_schema_lacks_the_id_key() {
        assert!(!LEAGUE_LEADERS.defaults("2015-16").contains_key("PlayerID"));
        let request = Request::new().player("Nobody Atall").param("PlayerID", "201939");
        let params = LEAGUE_LEADERS.params(&request, "2015-16", &empty_lookups());
        assert_eq!(params.get("PlayerID").map(String::as_str), Some("201939"));
    }

    #[test]
    fn unresolved_team_drops_schema_default_without_override() {
        assert_eq!(
            PLAYER_SHOT_TRACKING.defaults("2015-16").get("TeamID").map(String::as_str),
            Some("0")
        );
        let request = Request::new().team("Nowhere");
        let params = PLAYER_SHOT_TRACKING.params(&request, "2015-16", &empty_lookups());
        assert!(!params.contains_key("TeamID"));

        let request = Request::new().team("Nowhere").param("TeamID", "0");
        let params = PLAYER_SHOT_TRACKING.params(&request, "2015-16", &empty_lookups());
        assert_eq!(params.get("TeamID").map(String::as_str), Some("0"));
    }

    #[test]
    fn registry_names_are_unique_and_findable() {
        let mut names: Vec<&str> = ENDPOINTS.iter().map(|e| e.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
        assert_eq!(find("play_by_play").map(|e| e.path), Some("/stats/playbyplayv2"));
        assert!(find("nope").is_none());
    }

    #[test]
    fn url_joins_base_and_path() {
        assert_eq!(
            LEAGUE_LEADERS.url("https://stats.nba.com/"),
            "https://stats.nba.com/stats/leagueleaders"
        );
    }

    #[tokio::test]
    async fn session_call_builds_query_and_normalizes() {
        let url = "http://stats.test/stats/playbyplayv2".to_string();
        let fetcher = CannedFetch {
            bodies: HashMap::from([(
                url.clone(),
                json!({"resultSets": [{"headers": ["EVENTNUM"], "rowSet": [[1], [2]]}]}),
            )]),
            seen: Mutex::new(Vec::new()),
        };
        let session = StatsSession::new(fetcher, empty_lookups())
            .with_base_url("http://stats.test")
            .with_season("2014-15");

        let request = Request::new().param("GameID", "0021400001").param("Ignored", "1");
        let result = session.call(&PLAY_BY_PLAY, &request).await.unwrap();
        assert_eq!(result[0].len(), 2);

        let seen = session.fetcher.seen.lock().unwrap();
        let (seen_url, seen_params) = &seen[0];
        assert_eq!(seen_url, &url);
        assert_eq!(seen_params.get("GameID").map(String::as_str), Some("0021400001"));
        assert_eq!(seen_params.get("Season").map(String::as_str), Some("2014-15"));
        assert!(!seen_params.contains_key("Ignored"));
    }

    #[tokio::test]
    async fn session_tables_folds_missing_payload_into_none() {
        let fetcher = CannedFetch { bodies: HashMap::new(), seen: Mutex::new(Vec::new()) };
        let session = StatsSession::new(fetcher, empty_lookups()).with_base_url("http://stats.test");
        assert!(session.tables(&SCOREBOARD, &Request::new()).await.is_none());
    }
}
