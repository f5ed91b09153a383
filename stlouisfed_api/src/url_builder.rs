//! Turns an endpoint path and a [`QueryParams`] set into a request URL.

use crate::query::QueryParams;

/// Builds request URLs against one base URL with a fixed set of leading
/// parameters (`api_key`, `file_type=json`).
///
/// Values are rendered with [`QueryValue::encode`](crate::query::QueryValue::encode)
/// and are not otherwise escaped: the API expects `;`-joined lists and
/// `+` for spaces verbatim.
#[derive(Clone, Debug)]
pub struct UrlBuilder {
    base_url: String,
    fixed: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            fixed: vec![
                ("api_key".to_string(), api_key.to_string()),
                ("file_type".to_string(), "json".to_string()),
            ],
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Renders `base + endpoint + "?" + k=v&...`.
    ///
    /// Fixed parameters come first. A caller parameter with a fixed name
    /// replaces the fixed value in its fixed position; the rest follow in
    /// insertion order. Absent values are dropped.
    pub fn build(&self, endpoint: &str, params: &QueryParams) -> String {
        let mut pairs: Vec<(&str, String)> = self
            .fixed
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();

        for (name, value) in params.present() {
            let encoded = value.encode();
            match pairs.iter_mut().find(|(k, _)| *k == name) {
                Some(pair) => pair.1 = encoded,
                None => pairs.push((name, encoded)),
            }
        }

        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}{}?{}", self.base_url, endpoint, query);
        tracing::trace!(%url, "built request URL");
        url
    }
}
