use anyhow::bail;
use log::{error, warn};
use nba_stats::{Fetch, StatsSession};

/// Rebuild the player and team files. Both are attempted even if one fails.
pub async fn rebuild_all<F: Fetch>(session: &StatsSession<F>) -> anyhow::Result<()> {
    let players = session.rebuild_players().await;
    if let Err(e) = &players {
        error!("player lookup: {e}");
    }
    let teams = session.rebuild_teams().await;
    if let Err(e) = &teams {
        error!("team lookup: {e}");
    }

    if players.is_err() || teams.is_err() {
        bail!("lookup rebuild incomplete");
    }
    Ok(())
}

/// Build whichever lookup file a query needs and doesn't have yet.
///
/// A failed build is only logged; the query goes ahead and the name stays unresolved.
pub async fn ensure<F: Fetch>(session: &StatsSession<F>, player: bool, team: bool) {
    let lookups = session.lookups();
    if player && !lookups.player_path().exists() {
        if let Err(e) = session.rebuild_players().await {
            warn!("player lookup unavailable: {e}");
        }
    }
    if team && !lookups.team_path().exists() {
        if let Err(e) = session.rebuild_teams().await {
            warn!("team lookup unavailable: {e}");
        }
    }
}
