//! HTTP client and paginated, rate-limited fetch engine.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ClientConfig,
    query::QueryParams,
    rate_limiter::{RateLimiter, RequestTracker, TrackerSummary},
    response,
    url_builder::UrlBuilder,
    Error,
};

/// HTTP client for the St. Louis Fed JSON APIs.
///
/// Cheap to clone: clones share the HTTP connection pool, the rate gate and
/// the request tracker, so the quota holds across every fetch made through
/// any of them.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    urls: UrlBuilder,
    limiter: Option<Arc<RateLimiter>>,
    tracker: Arc<RequestTracker>,
}

/// Per-fetch pagination state.
struct PageState {
    page_size: Option<u64>,
    /// `None` when no page size was requested.
    offset: Option<u64>,
    records: Vec<Value>,
    requests: u64,
    first_count: Option<u64>,
}

impl PageState {
    fn new(page_size: Option<u64>) -> Self {
        Self {
            page_size,
            offset: page_size.map(|_| 0),
            records: Vec::new(),
            requests: 0,
            first_count: None,
        }
    }

    fn estimated_pages(&self, count: u64) -> u64 {
        match self.page_size {
            Some(size) if size > 0 => count / size + 1,
            _ => 1,
        }
    }
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e)
            })?;

        Ok(Self {
            http,
            urls: UrlBuilder::new(&config.base_url, &config.api_key),
            limiter: config
                .rate_limit
                .map(|rl| Arc::new(RateLimiter::new(rl.max_calls, rl.period))),
            tracker: Arc::new(RequestTracker::new()),
        })
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    /// Snapshot of the request counters shared by this client and its clones.
    pub fn stats(&self) -> TrackerSummary {
        self.tracker.summary()
    }

    /// Remaining calls in the current window; `None` when the gate is
    /// disabled or momentarily locked.
    pub fn remaining_budget(&self) -> Option<u64> {
        self.limiter.as_ref().and_then(|l| l.remaining_budget())
    }

    /// Fetches every page of `endpoint` and returns the records found under
    /// `key_path`, in server order.
    ///
    /// With `page_size` set, `limit`/`offset` are sent and pages are
    /// requested until a short page. Responses without `count` are complete
    /// on their own. Any failure discards the pages already fetched.
    pub async fn fetch(
        &self,
        endpoint: &str,
        key_path: &str,
        page_size: Option<u64>,
        params: &QueryParams,
    ) -> Result<Vec<Value>, Error> {
        self.fetch_with_cancel(endpoint, key_path, page_size, params, &CancellationToken::new())
            .await
    }

    /// Like [`fetch`](Self::fetch), aborting with [`Error::Cancelled`] as soon
    /// as `cancel` fires, whether waiting in the rate gate or on the network.
    pub async fn fetch_with_cancel(
        &self,
        endpoint: &str,
        key_path: &str,
        page_size: Option<u64>,
        params: &QueryParams,
        cancel: &CancellationToken,
    ) -> Result<Vec<Value>, Error> {
        if page_size == Some(0) {
            tracing::error!(endpoint, "page_size must be positive");
            return Err(Error::validation("page_size must be positive"));
        }
        let mut state = PageState::new(page_size);

        loop {
            let mut page_params = QueryParams::new();
            page_params
                .insert_opt("limit", state.page_size)
                .insert_opt("offset", state.offset);
            page_params.extend(params.clone());

            let url = self.urls.build(endpoint, &page_params);
            let mut data = self.send(&url, cancel).await?;
            state.requests += 1;

            let extracted = take(&mut data, key_path);
            let Some(count) = response::count(&data) else {
                tracing::debug!(endpoint, page = state.requests, "response has no count");
                return Ok(match extracted {
                    Some(Value::Array(items)) => items,
                    Some(value) => vec![value],
                    None => Vec::new(),
                });
            };

            match state.first_count {
                None => state.first_count = Some(count),
                Some(first) if first != count => {
                    tracing::warn!(
                        endpoint,
                        first_count = first,
                        count,
                        page = state.requests,
                        "count changed between pages"
                    );
                }
                Some(_) => {}
            }

            let page = match extracted {
                Some(Value::Array(items)) => items,
                Some(value) => vec![value],
                None => Vec::new(),
            };
            let records = page.len() as u64;
            tracing::debug!(
                endpoint,
                page = state.requests,
                pages = state.estimated_pages(count),
                count,
                offset = state.offset.unwrap_or(0),
                records,
                "fetched page"
            );
            state.records.extend(page);

            let more = match state.page_size {
                Some(size) => count >= size && records == size,
                None => false,
            };
            if !more {
                break;
            }
            if let (Some(offset), Some(size)) = (state.offset.as_mut(), state.page_size) {
                *offset += size;
            }
        }

        Ok(state.records)
    }

    /// Gate, send, read and classify one request.
    async fn send(&self, url: &str, cancel: &CancellationToken) -> Result<Value, Error> {
        if let Some(limiter) = &self.limiter {
            let waited = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                waited = limiter.acquire() => waited,
            };
            if !waited.is_zero() {
                tracing::debug!(waited_ms = waited.as_millis() as u64, "rate gate released");
            }
            self.tracker.record_wait(waited);
        }

        let exchange = async {
            let resp = self.http.get(url).send().await?;
            let status = resp.status().as_u16();
            let headers = resp.headers();
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let quota = (
                header_u64(headers, "x-rate-limit-limit"),
                header_u64(headers, "x-rate-limit-remaining"),
            );
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, content_type, quota, body))
        };

        let (status, content_type, quota, body) = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = exchange => result.map_err(|e| {
                tracing::error!("Failed to get resource {}: {}", url, e);
                self.tracker.record_failure();
                Error::Network(e)
            })?,
        };

        self.tracker.record_server_quota(quota.0, quota.1);

        match response::classify(status, content_type.as_deref(), &body, url) {
            Ok(data) => {
                self.tracker.record_success();
                Ok(data)
            }
            Err(err) => {
                if response::is_rate_limited(status) {
                    self.tracker.record_rate_limited();
                } else {
                    self.tracker.record_failure();
                }
                Err(err)
            }
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Moves the value at a dotted key path out of `value`.
fn take(value: &mut Value, path: &str) -> Option<Value> {
    match path.split_once('.') {
        None => value.as_object_mut()?.remove(path),
        Some((head, rest)) => take(value.as_object_mut()?.get_mut(head)?, rest),
    }
}
