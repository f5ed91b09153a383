use chrono::NaiveDate;

use crate::types::{AggregationMethod, Frequency, RegionType, Seasonality, Unit};

use super::QueryParams;

/// Units sent when the caller does not choose any.
pub const DEFAULT_REGIONAL_UNITS: &str = "Dollars";

/// Options for GeoFRED `regional/data`.
///
/// GeoFRED has no real-time period, so this builder stands apart from the
/// [`Query`](super::Query) family.
#[derive(Clone, Debug)]
pub struct RegionalDataQuery {
    pub series_group: String,
    pub region_type: RegionType,
    pub date: NaiveDate,
    pub season: Seasonality,
    pub units: String,
    pub start_date: Option<NaiveDate>,
    pub frequency: Option<Frequency>,
    pub transformation: Option<Unit>,
    pub aggregation_method: Option<AggregationMethod>,
}

impl RegionalDataQuery {
    pub fn new(series_group: &str, region_type: RegionType, date: NaiveDate, season: Seasonality) -> Self {
        Self {
            series_group: series_group.to_string(),
            region_type,
            date,
            season,
            units: DEFAULT_REGIONAL_UNITS.to_string(),
            start_date: None,
            frequency: None,
            transformation: None,
            aggregation_method: None,
        }
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .insert("series_group", &self.series_group)
            .insert("region_type", self.region_type)
            .insert("date", self.date)
            .insert("units", &self.units)
            .insert("season", self.season)
            .insert_opt("start_date", self.start_date)
            .insert_opt("frequency", self.frequency)
            .insert_opt("transformation", self.transformation)
            .insert_opt("aggregation_method", self.aggregation_method);
        params
    }

    pub fn with_units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_transformation(mut self, transformation: Unit) -> Self {
        self.transformation = Some(transformation);
        self
    }

    pub fn with_aggregation_method(mut self, method: AggregationMethod) -> Self {
        self.aggregation_method = Some(method);
        self
    }
}
