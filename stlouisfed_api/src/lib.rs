mod client;
mod config;
mod errors;
pub mod query;
pub mod rate_limiter;
pub mod response;
pub mod types;
mod url_builder;
pub use self::client::Client;
pub use self::config::{ClientConfig, RateLimit, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use self::errors::Error;
pub use self::query::{
    ListQuery, ObservationQuery, Query, QueryCommon, QueryParams, QueryValue, RealtimeQuery,
    RegionalDataQuery, ReleaseDatesQuery, SeriesListQuery, SeriesUpdatesQuery, TagQuery,
};
pub use self::rate_limiter::TrackerSummary;
pub use self::url_builder::UrlBuilder;
pub use tokio_util::sync::CancellationToken;
