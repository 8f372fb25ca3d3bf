use crate::error::IngestError;
use crate::model::ShotRow;
use regex::Regex;
use reqwest::blocking::Client;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Shot lengths on movie pages are published in tenths of a second.
const TENTHS_PER_SECOND: f64 = 10.0;
const LONG_SHOT_WARNING_SECONDS: f64 = 25.0;

static SHOT_LENGTHS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"shot_lengths\s*=\s*\[(.*?)\]").expect("valid regex"));

/// Shot durations in seconds from a `shot_lengths = [...]` array in a page body.
pub fn extract_shot_lengths(page: &str) -> Option<Vec<f64>> {
    let caps = SHOT_LENGTHS_RE.captures(page)?;
    caps[1]
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse::<f64>().ok().map(|tenths| tenths / TENTHS_PER_SECOND))
        .collect()
}

pub fn http_client() -> Result<Client, IngestError> {
    Client::builder()
        .timeout(None)
        .build()
        .map_err(|err| IngestError::UpstreamFetch(format!("build http client: {err}")))
}

pub fn fetch_page(client: &Client, url: &str) -> Result<String, IngestError> {
    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|err| IngestError::UpstreamFetch(format!("GET {url}: {err}")))?;
    response
        .text()
        .map_err(|err| IngestError::UpstreamFetch(format!("read body of {url}: {err}")))
}

pub fn scrape_movie(client: &Client, title: &str, url: &str) -> Result<Vec<ShotRow>, IngestError> {
    info!(movie = title, url, "scraping shot lengths");
    let page = fetch_page(client, url)?;
    let durations = extract_shot_lengths(&page).ok_or_else(|| {
        IngestError::MalformedDocument(format!("no shot_lengths array on page for {title}"))
    })?;
    let max = durations.iter().copied().fold(0.0_f64, f64::max);
    if max > LONG_SHOT_WARNING_SECONDS {
        warn!(movie = title, max_shot = max, "scraped movie has an unusually long shot");
    }
    info!(movie = title, shots = durations.len(), "scraped movie");
    Ok(durations
        .into_iter()
        .map(|duration| ShotRow::new(title, duration))
        .collect())
}
