use log::debug;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Query parameters for one request. Ordered so query strings are stable.
pub type Params = BTreeMap<String, String>;

pub const STATS_HOST: &str = "https://stats.nba.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Transport seam: issue one GET and decode the JSON body.
///
/// Implementations report failure through `ApiError`; they never panic on a bad
/// response.
pub trait Fetch {
    fn fetch(&self, url: &str, params: &Params) -> impl Future<Output = ApiResult<Value>> + Send;
}

/// stats.nba.com transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct StatsApi {
    client: Client,
    timeout: Duration,
}

impl Default for StatsApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(stats_headers())
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// The stats host stalls requests that don't look like they came from its own site.
fn stats_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    InvalidUrl(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::InvalidUrl(url) => write!(f, "Invalid URL: {url}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl StatsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn get(&self, url: &str, params: &Params) -> ApiResult<Value> {
        let url = Url::parse_with_params(url, params)
            .map_err(|_| ApiError::InvalidUrl(url.to_owned()))?;
        let label = url.to_string();
        debug!("GET {label}");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, label.clone()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<Value>()
                .await
                .map_err(|e| ApiError::Parsing(e, label)),
            Err(e) => Err(ApiError::Api(e, label)),
        }
    }
}

impl Fetch for StatsApi {
    fn fetch(&self, url: &str, params: &Params) -> impl Future<Output = ApiResult<Value>> + Send {
        self.get(url, params)
    }
}
