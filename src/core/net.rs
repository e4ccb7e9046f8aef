// src/core/net.rs
//
// Source fetching: local files are read as-is, URLs go through a blocking
// reqwest client with browser-like headers and a bounded retry loop.
// Failures are folded into `FetchOutcome::Failed` so callers decide what a
// failed fetch means for them.

use std::{thread, time::Duration};

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::StatusCode;

use crate::config::consts::{
    FETCH_BACKOFF_MS, FETCH_RETRIES, FETCH_TIMEOUT_SECS, RETRY_STATUSES, USER_AGENT as UA,
};
use crate::config::options::{EnvFlags, SourceKind, SourceSpec};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched(String),
    Failed(String),
}

impl FetchOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchOutcome::Fetched(_))
    }
}

pub fn fetch(source: &SourceSpec, env: &EnvFlags) -> FetchOutcome {
    match source {
        SourceSpec::File { path, .. } => match std::fs::read_to_string(path) {
            Ok(body) => {
                logf!("Fetch: read {} bytes from {}", body.len(), path.display());
                FetchOutcome::Fetched(body)
            }
            Err(e) => FetchOutcome::Failed(format!("cannot read {}: {e}", path.display())),
        },
        SourceSpec::Url { url, kind } => match http_get(url, *kind) {
            Ok(body) => FetchOutcome::Fetched(body),
            Err(reason) if env.restrict_fetch() => {
                FetchOutcome::Failed(format!("network fetch failed in CI ({reason})"))
            }
            Err(reason) => FetchOutcome::Failed(reason),
        },
    }
}

fn headers(kind: SourceKind) -> HeaderMap {
    let accept = match kind {
        SourceKind::Markup => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        SourceKind::Structured => "application/json",
    };
    let mut h = HeaderMap::new();
    h.insert(USER_AGENT, HeaderValue::from_static(UA));
    h.insert(ACCEPT, HeaderValue::from_static(accept));
    h.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    h.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    h
}

pub fn is_retryable(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status.as_u16())
}

/// Delay before attempt `attempt + 1` (attempts count from 1).
pub fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(FETCH_BACKOFF_MS.saturating_mul(1u64 << attempt.saturating_sub(1).min(16)))
}

fn http_get(url: &str, kind: SourceKind) -> Result<String, String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .default_headers(headers(kind))
        .build()
        .map_err(|e| format!("HTTP client setup failed: {e}"))?;

    let mut last = String::new();
    for attempt in 1..=FETCH_RETRIES {
        match client.get(url).send() {
            Ok(resp) if resp.status().is_success() => {
                return resp.text().map_err(|e| format!("reading body of {url} failed: {e}"));
            }
            Ok(resp) if is_retryable(resp.status()) => {
                last = format!("HTTP {} from {url}", resp.status());
            }
            Ok(resp) => return Err(format!("HTTP {} from {url}", resp.status())),
            Err(e) => last = format!("request to {url} failed: {e}"),
        }
        if attempt < FETCH_RETRIES {
            let wait = backoff(attempt);
            logw!("Fetch: attempt {attempt}/{FETCH_RETRIES} failed ({last}), retrying in {wait:?}");
            thread::sleep(wait);
        }
    }
    loge!("Fetch: giving up on {url}: {last}");
    Err(last)
}
