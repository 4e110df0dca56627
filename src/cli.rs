use crate::settings::Settings;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Techs(Vec<String>),
    Lookups,
    Query {
        endpoint: String,
        player: Option<String>,
        team: Option<String>,
        params: Vec<(String, String)>,
    },
    News(String),
    Endpoints,
    Help,
    Version,
}

/// Parse the arguments after the program name. Global flags are applied to
/// `settings` wherever they appear.
pub fn parse(args: impl IntoIterator<Item = String>, settings: &mut Settings) -> Result<Command, String> {
    let mut args = args.into_iter();
    let mut positional = Vec::new();
    let mut player = None;
    let mut team = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| format!("{flag} needs a value"));
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-v" | "--verbose" => settings.log_level = Some(LevelFilter::Debug),
            "--data-dir" => settings.data_dir = PathBuf::from(value(&arg)?),
            "--output-dir" => settings.output_dir = PathBuf::from(value(&arg)?),
            "--workers" => settings.workers = number::<usize>(&arg, &value(&arg)?)?.max(1),
            "--window" => settings.window_secs = number(&arg, &value(&arg)?)?,
            "--player" => player = Some(value(&arg)?),
            "--team" => team = Some(value(&arg)?),
            flag if flag.starts_with('-') => return Err(format!("Unknown argument: {flag}")),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(command) = positional.next() else {
        return Err("Missing command".into());
    };
    let rest: Vec<String> = positional.collect();

    match command.as_str() {
        "techs" => Ok(Command::Techs(rest)),
        "lookups" => Ok(Command::Lookups),
        "endpoints" => Ok(Command::Endpoints),
        "news" => match rest.as_slice() {
            [feed] => Ok(Command::News(feed.clone())),
            _ => Err("news takes exactly one FEED".into()),
        },
        "query" => {
            let mut rest = rest.into_iter();
            let endpoint = rest.next().ok_or("query needs an ENDPOINT")?;
            let params = rest
                .map(|kv| match kv.split_once('=') {
                    Some((k, v)) if !k.is_empty() => Ok((k.to_owned(), v.to_owned())),
                    _ => Err(format!("expected KEY=VALUE, got {kv:?}")),
                })
                .collect::<Result<_, _>>()?;
            Ok(Command::Query { endpoint, player, team, params })
        }
        other => Err(format!("Unknown command: {other}")),
    }
}

fn number<T: std::str::FromStr>(flag: &str, raw: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("{flag} expects a number, got {raw:?}"))
}

pub fn usage_text() -> &'static str {
    "hoopstats - stats.nba.com client and technical-foul impact analysis

Usage:
  hoopstats techs [SEASON...]
  hoopstats lookups
  hoopstats query ENDPOINT [--player NAME] [--team NAME] [KEY=VALUE...]
  hoopstats news FEED
  hoopstats endpoints
  hoopstats --help
  hoopstats --version

Options:
  --data-dir DIR       Player and team lookup files (default .)
  --output-dir DIR     Where techs writes <season>_tech_runs.json (default tech_runs)
  --workers N          Concurrent play-by-play requests (default 10)
  --window SECS        Seconds of play after each technical (default 240)
  -v, --verbose        Debug logging

Environment:
  HOOPSTATS_DATA_DIR, HOOPSTATS_OUTPUT_DIR, HOOPSTATS_WORKERS,
  HOOPSTATS_WINDOW_SECS, HOOPSTATS_TIMEOUT_SECS, HOOPSTATS_BASE_URL
  RUST_LOG             Log filter (default info)"
}
