use crate::analysis::SeasonReport;
use anyhow::Context;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes one JSON document per season into a directory.
pub struct JsonSink {
    dir: PathBuf,
}

impl JsonSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, season: &str) -> PathBuf {
        self.dir.join(format!("{season}_tech_runs.json"))
    }

    /// Persist a season's games, replacing any earlier run for that season.
    pub fn store(&self, report: &SeasonReport) -> anyhow::Result<PathBuf> {
        let path = self.path_for(&report.season);
        let body = to_pretty_json(&report.games)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;
        write_atomic(&path, &body)?;
        Ok(path)
    }
}

fn to_pretty_json(value: &impl Serialize) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

fn write_atomic(path: &Path, body: &[u8]) -> anyhow::Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
