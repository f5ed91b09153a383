//! FRASER, the St. Louis Fed digital library, harvested over OAI-PMH.

mod oai;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use stlouisfed_api::{CancellationToken, Error, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

pub use self::oai::{parse, OaiError, OaiHeader, OaiRecord, OaiResponse, OaiSet, NO_RECORDS_MATCH};

pub const DEFAULT_FRASER_URL: &str = "https://fraser.stlouisfed.org/oai";

/// FRASER serves metadata in MODS only.
pub const METADATA_PREFIX: &str = "mods";

/// OAI-PMH harvester for FRASER.
///
/// List verbs follow `resumptionToken` until the repository reports the
/// last page, or until the configured page limit is reached.
#[derive(Clone)]
pub struct Fraser {
    http: reqwest::Client,
    base_url: String,
    max_pages: Option<usize>,
    cancel: CancellationToken,
}

impl Fraser {
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_FRASER_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::build(base_url, DEFAULT_TIMEOUT)
    }

    fn build(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e)
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_pages: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Stop harvesting after `pages` pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = Some(pages.max(1));
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn list_sets(&self) -> Result<Vec<OaiSet>, Error> {
        let pages = self.harvest("ListSets", &[]).await?;
        Ok(pages.into_iter().flat_map(|p| p.sets).collect())
    }

    /// Headers of every record, optionally restricted to one set.
    pub async fn list_identifiers(&self, set: Option<&str>, ignore_deleted: bool) -> Result<Vec<OaiHeader>, Error> {
        let mut args = vec![("metadataPrefix", METADATA_PREFIX)];
        if let Some(set) = set {
            args.push(("set", set));
        }
        let pages = self.harvest("ListIdentifiers", &args).await?;
        Ok(pages
            .into_iter()
            .flat_map(|p| p.headers)
            .filter(|h| !(ignore_deleted && h.deleted))
            .collect())
    }

    /// Full records, optionally restricted to one set.
    pub async fn list_records(&self, set: Option<&str>, ignore_deleted: bool) -> Result<Vec<OaiRecord>, Error> {
        let mut args = vec![("metadataPrefix", METADATA_PREFIX)];
        if let Some(set) = set {
            args.push(("set", set));
        }
        let pages = self.harvest("ListRecords", &args).await?;
        Ok(pages
            .into_iter()
            .flat_map(|p| p.records)
            .filter(|r| !(ignore_deleted && r.header.deleted))
            .collect())
    }

    pub async fn get_record(&self, identifier: &str) -> Result<OaiRecord, Error> {
        let args = [("identifier", identifier), ("metadataPrefix", METADATA_PREFIX)];
        let (url, page) = self.request("GetRecord", &args).await?;
        page.records.into_iter().next().ok_or_else(|| Error::Decode {
            url,
            reason: "GetRecord response contained no record".to_string(),
        })
    }

    /// Requests the first page with `args`, then each resumption token alone.
    async fn harvest(&self, verb: &str, args: &[(&str, &str)]) -> Result<Vec<OaiResponse>, Error> {
        let mut pages = Vec::new();
        let (_, mut page) = self.request(verb, args).await?;
        loop {
            let token = page.resumption_token.take();
            pages.push(page);
            let Some(token) = token else {
                break;
            };
            if self.max_pages.is_some_and(|max| pages.len() >= max) {
                tracing::debug!(verb, pages = pages.len(), "page limit reached");
                break;
            }
            tracing::debug!(verb, page = pages.len() + 1, %token, "resuming harvest");
            page = self.request(verb, &[("resumptionToken", token.as_str())]).await?.1;
        }
        Ok(pages)
    }

    async fn request(&self, verb: &str, args: &[(&str, &str)]) -> Result<(String, OaiResponse), Error> {
        let mut url = url::Url::parse(&self.base_url).map_err(|e| {
            Error::validation(format!("invalid FRASER base URL {}: {}", self.base_url, e))
        })?;
        url.query_pairs_mut()
            .append_pair("verb", verb)
            .extend_pairs(args.iter().copied());
        let url = url.to_string();
        tracing::trace!(%url, "FRASER request");

        let exchange = async {
            let resp = self.http.get(&url).send().await?;
            let status = resp.status().as_u16();
            let content_type = resp
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, content_type, body))
        };
        let (status, content_type, body) = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(Error::Cancelled),
            result = exchange => result.map_err(|e| {
                tracing::error!("Failed to get resource {}: {}", url, e);
                Error::Network(e)
            })?,
        };

        if status != 200 {
            tracing::error!("FRASER returned status {} for {}", status, url);
            return Err(Error::RemoteStatus { status, url });
        }
        if let Some(content_type) = content_type.filter(|ct| !ct.contains("xml")) {
            return Err(Error::UnexpectedContentType { content_type, url });
        }

        let mut page = parse(&body).map_err(|reason| {
            tracing::error!("Failed to parse OAI-PMH response from {}: {}", url, reason);
            Error::Decode {
                url: url.clone(),
                reason,
            }
        })?;

        match page.error.take() {
            Some(err) if err.code == NO_RECORDS_MATCH => {
                tracing::debug!(verb, "no records match");
                Ok((url, OaiResponse::default()))
            }
            Some(err) => {
                tracing::error!("OAI-PMH error {} for {}: {}", err.code, url, err.message);
                Err(Error::RemoteProtocol {
                    code: err.code,
                    message: err.message,
                    url,
                })
            }
            None => Ok((url, page)),
        }
    }
}
