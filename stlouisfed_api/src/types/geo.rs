//! Records returned by the GeoFRED (FRED Maps) endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::de;

/// Metadata describing the regional group a series belongs to.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SeriesGroup {
    pub title: String,
    pub region_type: String,
    pub series_group: String,
    pub season: String,
    pub units: String,
    pub frequency: String,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

/// One region's value for one period, flattened out of the `meta.data`
/// object (which is keyed by period).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegionalObservation {
    pub year: NaiveDate,
    pub region: String,
    #[serde(deserialize_with = "de::text")]
    pub code: String,
    #[serde(deserialize_with = "de::value")]
    pub value: Option<f64>,
    pub series_id: String,
}

/// A region outline. Geometry is kept as the WKT text the API returns.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    pub name: String,
    #[serde(deserialize_with = "de::text")]
    pub code: String,
    pub centroid: String,
    pub geometry: String,
    #[serde(default)]
    pub report_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub sovereignty: Option<String>,
}
