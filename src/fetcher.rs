use crate::config::{HttpConfig, MAX_ENTRIES};
use crate::error::{AppError, Result};
use crate::metrics::Metrics;
use crate::model::{HotSearchEntry, HotSearchResponse, HotSearchWord};
use chrono::{Local, TimeZone};
use reqwest::Client;
use reqwest::header::REFERER;
use tracing::{info, warn};

pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ORIGIN: &str = "Douyin hot search";

pub fn build_client(http: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(http.timeout())
        .user_agent(http.user_agent.as_str())
        .build()
        .map_err(|e| AppError::http_error("client", e))
}

pub struct Fetcher {
    client: Client,
    http: HttpConfig,
    limit: usize,
    metrics: Metrics,
}

impl Fetcher {
    pub fn new(client: Client, http: HttpConfig, limit: usize, metrics: Metrics) -> Self {
        Self {
            client,
            http,
            limit,
            metrics,
        }
    }

    /// Single attempt; any failure means the run has nothing to report.
    pub async fn fetch_hot_search(&self) -> Result<Vec<HotSearchEntry>> {
        let url = self.http.endpoint.as_str();
        info!(url = url, "Fetching Douyin hot search list");

        self.metrics.record_http_request();
        let response = match self.request(url).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_http_failure();
                warn!(url = url, error = %e, "Hot search request failed");
                return Err(e);
            }
        };

        let entries = normalize(response, self.limit)?;
        for entry in &entries {
            self.metrics.record_entry_fetched();
            if entry.word_cover().is_none() {
                self.metrics.record_entry_without_cover();
            }
        }

        info!(entry_count = entries.len(), "Fetched hot search entries");
        Ok(entries)
    }

    async fn request(&self, url: &str) -> Result<HotSearchResponse> {
        let response = self
            .client
            .get(url)
            .header(REFERER, self.http.referer.as_str())
            .send()
            .await
            .map_err(|e| AppError::from_request(url, e))?;

        response
            .error_for_status()
            .map_err(|e| AppError::http_error(url, e))?
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::from_request(url, e)
                } else {
                    AppError::parse_error(ORIGIN, e)
                }
            })
    }
}

/// Turns the raw payload into at most `limit` ranked entries, in upstream order.
pub fn normalize(response: HotSearchResponse, limit: usize) -> Result<Vec<HotSearchEntry>> {
    let limit = limit.min(MAX_ENTRIES);

    response
        .into_word_list()?
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, word)| to_entry(idx + 1, word))
        .collect()
}

fn to_entry(rank: usize, word: HotSearchWord) -> Result<HotSearchEntry> {
    let event_time = word.event_secs().and_then(format_event_time)?;

    Ok(HotSearchEntry::new(rank, event_time)
        .with_title(word.title())
        .with_hot_value(word.hot_value())
        .with_word_cover(word.cover_url())
        .with_sentence_id(word.sentence_id()))
}

pub fn format_event_time(secs: i64) -> Result<String> {
    Local
        .timestamp_opt(secs, 0)
        .single()
        .map(|t| t.format(EVENT_TIME_FORMAT).to_string())
        .ok_or_else(|| AppError::parse_error(ORIGIN, format!("invalid event_time {}", secs)))
}
