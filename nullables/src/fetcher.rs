//! Nullable HTTP fetcher: scripted responses per URL.

use crate::lock;
use async_trait::async_trait;
use cashscope_sources::{FetchError, FetchResponse, HttpFetch};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Outcome = Result<FetchResponse, FetchError>;

/// A test fetcher that answers from a URL → outcome table.
///
/// Unknown URLs answer `404`. A URL scripted with a sequence answers each
/// outcome once, in order, and then repeats the last one.
#[derive(Default)]
pub struct NullFetcher {
    routes: Mutex<HashMap<String, VecDeque<Outcome>>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl NullFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.script(url, vec![Ok(FetchResponse::with_status(status, body))]);
    }

    pub fn respond_json(&self, url: &str, value: &serde_json::Value) {
        self.respond(url, 200, value.to_string());
    }

    pub fn fail(&self, url: &str, error: FetchError) {
        self.script(url, vec![Err(error)]);
    }

    /// Answer successive requests to `url` with `outcomes`.
    pub fn script(&self, url: &str, outcomes: Vec<Outcome>) {
        lock(&self.routes).insert(url.to_string(), outcomes.into());
    }

    /// Every requested URL, in order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        lock(&self.calls).iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl HttpFetch for NullFetcher {
    async fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        lock(&self.calls).push(url.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut routes = lock(&self.routes);
        match routes.get_mut(url) {
            Some(outcomes) if outcomes.len() > 1 => outcomes
                .pop_front()
                .unwrap_or_else(|| Ok(FetchResponse::with_status(404, ""))),
            Some(outcomes) => outcomes
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(FetchResponse::with_status(404, ""))),
            None => Ok(FetchResponse::with_status(404, "not found")),
        }
    }
}
