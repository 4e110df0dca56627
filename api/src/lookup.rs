use crate::client::Fetch;
use crate::endpoints::{ALL_PLAYERS, ALL_TEAMS, Endpoint, Request, StatsSession};
use crate::{Record, Table, first_table};
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

pub const PLAYER_FILE: &str = "playerlist.txt";
pub const TEAM_FILE: &str = "teamlist.txt";

/// Name → ID files for players and teams.
///
/// Files hold one `Name: ID` entry per line. Every resolution re-reads the file;
/// rebuilds replace it atomically under the write lock.
#[derive(Debug)]
pub struct LookupTables {
    players: PathBuf,
    teams: PathBuf,
    lock: RwLock<()>,
}

#[derive(Debug)]
pub enum LookupError {
    /// The source endpoint returned nothing usable.
    NoData(String),
    Io(io::Error, PathBuf),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NoData(msg) => write!(f, "lookup rebuild got no data: {msg}"),
            LookupError::Io(e, path) => write!(f, "could not write {}: {e}", path.display()),
        }
    }
}

impl std::error::Error for LookupError {}

impl LookupTables {
    pub fn new(players: impl Into<PathBuf>, teams: impl Into<PathBuf>) -> Self {
        Self {
            players: players.into(),
            teams: teams.into(),
            lock: RwLock::new(()),
        }
    }

    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(PLAYER_FILE), dir.join(TEAM_FILE))
    }

    pub fn player_path(&self) -> &Path {
        &self.players
    }

    pub fn team_path(&self) -> &Path {
        &self.teams
    }

    /// Player ID for `"First Last"` or `"Last, First"`.
    pub fn resolve_player(&self, name: &str) -> Option<String> {
        self.scan(&self.players, &last_comma_first(name))
    }

    pub fn resolve_team(&self, name: &str) -> Option<String> {
        self.scan(&self.teams, name.trim())
    }

    /// Exact (case-insensitive) name match first; otherwise the first entry whose
    /// name contains the query, in file order.
    fn scan(&self, path: &Path, query: &str) -> Option<String> {
        let content = {
            let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
            fs::read_to_string(path).ok()?
        };
        let key = query.to_lowercase();
        if key.is_empty() {
            return None;
        }

        let entries: Vec<(&str, &str)> = content.lines().filter_map(parse_line).collect();

        if let Some((_, id)) = entries.iter().find(|(n, _)| n.trim().to_lowercase() == key) {
            return Some(id.to_string());
        }

        let mut matches = entries.iter().filter(|(n, _)| n.to_lowercase().contains(&key));
        let (name, id) = matches.next()?;
        let others = matches.count();
        if others > 0 {
            warn!(
                "{query:?} is ambiguous in {} ({} other matches); using {name:?}",
                path.display(),
                others
            );
        }
        Some(id.to_string())
    }

    /// Replace the player file from an all-players table.
    pub fn write_players(&self, table: &Table) -> Result<usize, LookupError> {
        self.write_entries(&self.players, entries(table, "DISPLAY_LAST_COMMA_FIRST", "PERSON_ID"))
    }

    /// Replace the team file from a league team-stats table.
    pub fn write_teams(&self, table: &Table) -> Result<usize, LookupError> {
        self.write_entries(&self.teams, entries(table, "TEAM_NAME", "TEAM_ID"))
    }

    fn write_entries(&self, path: &Path, entries: Vec<(String, String)>) -> Result<usize, LookupError> {
        if entries.is_empty() {
            return Err(LookupError::NoData(format!("no entries for {}", path.display())));
        }

        let body: String = entries
            .iter()
            .map(|(name, id)| format!("{name}: {id}\n"))
            .collect();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| LookupError::Io(e, dir.to_path_buf()))?;
        }
        let tmp = path.with_extension("txt.tmp");
        // Held across both steps; concurrent rebuilds share the tmp path.
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        fs::write(&tmp, body).map_err(|e| LookupError::Io(e, tmp.clone()))?;
        fs::rename(&tmp, path).map_err(|e| LookupError::Io(e, path.to_path_buf()))?;
        debug!("wrote {} entries to {}", entries.len(), path.display());
        Ok(entries.len())
    }
}

impl<F: Fetch> StatsSession<F> {
    /// Fetch every player and rewrite the player file.
    pub async fn rebuild_players(&self) -> Result<usize, LookupError> {
        let table = self.lookup_source(&ALL_PLAYERS).await?;
        let written = self.lookups().write_players(&table)?;
        info!("player lookup rebuilt: {written} players");
        Ok(written)
    }

    /// Fetch every team and rewrite the team file.
    pub async fn rebuild_teams(&self) -> Result<usize, LookupError> {
        let table = self.lookup_source(&ALL_TEAMS).await?;
        let written = self.lookups().write_teams(&table)?;
        info!("team lookup rebuilt: {written} teams");
        Ok(written)
    }

    async fn lookup_source(&self, endpoint: &Endpoint) -> Result<Table, LookupError> {
        let result = self
            .call(endpoint, &Request::new())
            .await
            .map_err(|e| LookupError::NoData(format!("{}: {e}", endpoint.name)))?;
        first_table(&result)
            .cloned()
            .ok_or_else(|| LookupError::NoData(format!("{}: no result sets", endpoint.name)))
    }
}

/// `"Stephen Curry"` → `"Curry, Stephen"`. Names already in comma form and
/// single words pass through.
pub fn last_comma_first(name: &str) -> String {
    let name = name.trim();
    if name.contains(',') {
        return name.to_owned();
    }
    let mut parts = name.split_whitespace();
    let Some(first) = parts.next() else {
        return String::new();
    };
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        first.to_owned()
    } else {
        format!("{}, {first}", rest.join(" "))
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (name, id) = line.split_once(": ")?;
    let id = id.trim();
    (!id.is_empty()).then_some((name, id))
}

fn entries(table: &Table, name_field: &str, id_field: &str) -> Vec<(String, String)> {
    table
        .iter()
        .filter_map(|row: &Record| Some((row.text(name_field)?, row.text(id_field)?)))
        .collect()
}
