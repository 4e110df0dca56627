mod analysis;
mod cli;
mod lookups;
mod output;
mod settings;

use crate::analysis::TechAnalysis;
use crate::cli::Command;
use crate::output::JsonSink;
use crate::settings::Settings;
use anyhow::{Context, anyhow};
use log::{error, info, warn};
use nba_stats::endpoints::{self, ENDPOINTS, Subject};
use nba_stats::news::Feed;
use nba_stats::{LookupTables, Request, StatsApi, StatsSession};

type Session = StatsSession<StatsApi>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    better_panic::install();

    let mut settings = Settings::load();
    let command = match cli::parse(std::env::args().skip(1), &mut settings) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("{msg}\n\n{}", cli::usage_text());
            std::process::exit(2);
        }
    };

    init_logger(&settings);

    let session = StatsSession::new(
        StatsApi::new().with_timeout(settings.timeout),
        LookupTables::in_dir(&settings.data_dir),
    )
    .with_base_url(&settings.base_url);

    match command {
        Command::Help => println!("{}", cli::usage_text()),
        Command::Version => println!("hoopstats {}", env!("CARGO_PKG_VERSION")),
        Command::Endpoints => list_endpoints(),
        Command::Lookups => lookups::rebuild_all(&session).await?,
        Command::News(feed) => show_news(&session, &feed).await?,
        Command::Query { endpoint, player, team, params } => {
            query(&session, &endpoint, player, team, params).await?
        }
        Command::Techs(seasons) => run_techs(&session, &settings, seasons).await,
    }

    Ok(())
}

fn init_logger(settings: &Settings) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = settings.log_level {
        builder.filter_level(level);
    }
    builder.init();
}

fn list_endpoints() {
    for endpoint in ENDPOINTS {
        println!("{:<32} {}", endpoint.name, endpoint.path);
    }
}

async fn show_news(session: &Session, name: &str) -> anyhow::Result<()> {
    let feed = Feed::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Feed::ALL.iter().map(Feed::name).collect();
        anyhow!("unknown feed {name:?}, expected one of: {}", known.join(", "))
    })?;
    let items = session.news(feed).await.unwrap_or_default();
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

async fn query(
    session: &Session,
    name: &str,
    player: Option<String>,
    team: Option<String>,
    params: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let endpoint = endpoints::find(name)
        .ok_or_else(|| anyhow!("unknown endpoint {name:?}, see `hoopstats endpoints`"))?;

    match endpoint.subject {
        Subject::Player if player.is_none() => warn!("{name} expects --player"),
        Subject::Team if team.is_none() => warn!("{name} expects --team"),
        _ => {}
    }

    lookups::ensure(session, player.is_some(), team.is_some()).await;

    let mut request = Request::new();
    if let Some(player) = player {
        request = request.player(player);
    }
    if let Some(team) = team {
        request = request.team(team);
    }
    for (key, value) in params {
        request = request.param(key, value);
    }

    let result = session.call(endpoint, &request).await.with_context(|| format!("querying {name}"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Analyze each season in turn. A failed season is logged and the rest still run.
async fn run_techs(session: &Session, settings: &Settings, mut seasons: Vec<String>) {
    if seasons.is_empty() {
        seasons.push(session.season().to_owned());
    }
    let analysis = TechAnalysis::new(session, settings.analysis());
    let sink = JsonSink::new(&settings.output_dir);

    for season in &seasons {
        let stored = match analysis.run(season).await {
            Ok(report) => sink.store(&report),
            Err(e) => Err(e),
        };
        match stored {
            Ok(path) => info!("{season}: wrote {}", path.display()),
            Err(e) => error!("{season}: {e:#}"),
        }
    }
}
