//! Records returned by the FRED and ALFRED endpoints.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::de;

/// FRED series identifier (e.g. "GNPCA").
pub type SeriesID = String;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// An economic data series.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub id: SeriesID,
    pub realtime_start: NaiveDate,
    pub realtime_end: NaiveDate,
    pub title: String,
    pub observation_start: NaiveDate,
    pub observation_end: NaiveDate,
    pub frequency: String,
    pub frequency_short: String,
    pub units: String,
    pub units_short: String,
    pub seasonal_adjustment: String,
    pub seasonal_adjustment_short: String,
    /// When the series was last revised, in the publisher's local offset.
    #[serde(deserialize_with = "de::timestamp")]
    pub last_updated: DateTime<FixedOffset>,
    pub popularity: i64,
    #[serde(default)]
    pub group_popularity: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A FRED tag: a keyword attached to series, grouped by [`TagGroupId`](super::TagGroupId).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    pub group_id: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(deserialize_with = "de::timestamp")]
    pub created: DateTime<FixedOffset>,
    pub popularity: i64,
    pub series_count: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Release {
    pub id: i64,
    pub realtime_start: NaiveDate,
    pub realtime_end: NaiveDate,
    pub name: String,
    pub press_release: bool,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A scheduled or past release date. `release/dates` omits the name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDate {
    pub release_id: i64,
    #[serde(default)]
    pub release_name: Option<String>,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub id: i64,
    pub realtime_start: NaiveDate,
    pub realtime_end: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One observation in a real-time period. `value` is `None` where FRED
/// reports no data (`"."`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub realtime_start: NaiveDate,
    pub realtime_end: NaiveDate,
    pub date: NaiveDate,
    #[serde(deserialize_with = "de::value")]
    pub value: Option<f64>,
}

/// One observation date with a value per vintage, keyed by the column name
/// FRED assigns (`<SERIES>_<YYYYMMDD>`). Produced by the `all` and
/// `new_and_revised` output types.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VintageObservation {
    pub date: NaiveDate,
    pub values: BTreeMap<String, Option<f64>>,
}
