//! Editorial JSON feeds published next to the stats endpoints.
use crate::client::{Fetch, Params};
use crate::endpoints::StatsSession;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    BeyondTheNumbers,
    Headlines,
    Glossary,
    SynergyIntro,
    History,
    BoxScores,
    ShotCharts,
}

impl Feed {
    pub const ALL: [Feed; 7] = [
        Feed::BeyondTheNumbers,
        Feed::Headlines,
        Feed::Glossary,
        Feed::SynergyIntro,
        Feed::History,
        Feed::BoxScores,
        Feed::ShotCharts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feed::BeyondTheNumbers => "beyond_the_numbers",
            Feed::Headlines => "headlines",
            Feed::Glossary => "glossary",
            Feed::SynergyIntro => "synergy_intro",
            Feed::History => "history",
            Feed::BoxScores => "box_scores",
            Feed::ShotCharts => "shot_charts",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Feed::BeyondTheNumbers => "/feeds/StatsBeyondTheNumbersV2-594371/json.js",
            Feed::Headlines => "/feeds/StatsV2Headlnes-589800/json.js",
            Feed::Glossary => "/feeds/statsv2-glossary-585341/json.js",
            Feed::SynergyIntro => "/feeds/StatsV2Synergy-618597/json.js",
            Feed::History => "/feeds/StatsV2History-589801/json.js",
            Feed::BoxScores => "/feeds/StatsV2BoxScores-589802/json.js",
            Feed::ShotCharts => "/feeds/NBAStatsShotCharts-559380/json.js",
        }
    }

    pub fn from_name(name: &str) -> Option<Feed> {
        Feed::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// One feed entry, flattened from the `ListItem*` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewsItem {
    pub caption: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub link: Option<String>,
    #[serde(rename = "Abstract")]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeed {
    #[serde(rename = "ListItems")]
    list_items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawItem {
    list_item_caption: Option<String>,
    #[serde(rename = "ListItemImageURL")]
    list_item_image_url: Option<String>,
    list_item_pub_date: Option<String>,
    list_item_link: Option<String>,
    list_item_abstract: Option<String>,
}

impl From<RawItem> for NewsItem {
    fn from(raw: RawItem) -> Self {
        NewsItem {
            caption: raw.list_item_caption,
            image: raw.list_item_image_url,
            date: raw.list_item_pub_date,
            link: raw.list_item_link,
            summary: raw.list_item_abstract,
        }
    }
}

/// Items of a feed payload, or `None` when the payload isn't a `ListItems` feed.
pub fn normalize_feed(payload: Option<&Value>) -> Option<Vec<NewsItem>> {
    let raw = RawFeed::deserialize(payload?).ok()?;
    Some(raw.list_items.into_iter().map(NewsItem::from).collect())
}

impl<F: Fetch> StatsSession<F> {
    pub async fn news(&self, feed: Feed) -> Option<Vec<NewsItem>> {
        let url = format!("{}{}", self.base_url().trim_end_matches('/'), feed.path());
        let payload = self.fetch_raw(&url, &Params::new()).await;
        let items = normalize_feed(payload.as_ref());
        if items.is_none() {
            warn!("{}: feed payload missing or malformed", feed.name());
        }
        items
    }
}
