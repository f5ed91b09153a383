use chrono::{NaiveDate, NaiveDateTime};

use crate::types::{AggregationMethod, FilterValue, FilterVariable, Frequency, OrderBy, OutputType, Unit};

use super::common::{Query, QueryCommon};
use super::QueryParams;

/// Filters shared by the endpoints that return lists of series
/// (category, release, tag and search series).
#[derive(Clone, Debug, Default)]
pub struct SeriesListQuery {
    pub common: QueryCommon,
    pub order_by: Option<OrderBy>,
    pub filter_variable: Option<FilterVariable>,
    pub filter_value: Option<String>,
    pub tag_names: Vec<String>,
    pub exclude_tag_names: Vec<String>,
}

impl Query for SeriesListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        params.insert_opt("order_by", self.order_by);
        self.common.add_sort_order(&mut params);
        params
            .insert_opt("filter_variable", self.filter_variable)
            .insert_opt("filter_value", self.filter_value.as_ref())
            .insert_list("tag_names", &self.tag_names)
            .insert_list("exclude_tag_names", &self.exclude_tag_names);
        params
    }
}

impl SeriesListQuery {
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Filters on an attribute; the value must match `filter_value` exactly.
    pub fn with_filter(mut self, variable: FilterVariable, value: &str) -> Self {
        self.filter_variable = Some(variable);
        self.filter_value = Some(value.to_string());
        self
    }

    pub fn with_tag_name(mut self, tag_name: &str) -> Self {
        self.tag_names.push(tag_name.to_string());
        self
    }

    pub fn with_tag_names(mut self, tag_names: &[String]) -> Self {
        self.tag_names.extend_from_slice(tag_names);
        self
    }

    pub fn with_exclude_tag_name(mut self, tag_name: &str) -> Self {
        self.exclude_tag_names.push(tag_name.to_string());
        self
    }

    pub fn with_exclude_tag_names(mut self, tag_names: &[String]) -> Self {
        self.exclude_tag_names.extend_from_slice(tag_names);
        self
    }
}

/// Options for `series/observations`, in both the FRED and ALFRED shapes.
#[derive(Clone, Debug, Default)]
pub struct ObservationQuery {
    pub common: QueryCommon,
    pub observation_start: Option<NaiveDate>,
    pub observation_end: Option<NaiveDate>,
    pub units: Option<Unit>,
    pub frequency: Option<Frequency>,
    pub aggregation_method: Option<AggregationMethod>,
    pub output_type: Option<OutputType>,
    pub vintage_dates: Vec<NaiveDate>,
}

impl Query for ObservationQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        self.common.add_sort_order(&mut params);
        let vintage_dates: Vec<String> = self
            .vintage_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        params
            .insert_opt("observation_start", self.observation_start)
            .insert_opt("observation_end", self.observation_end)
            .insert_opt("units", self.units)
            .insert_opt("frequency", self.frequency)
            .insert_opt("aggregation_method", self.aggregation_method)
            .insert_opt("output_type", self.output_type)
            .insert_list("vintage_dates", &vintage_dates);
        params
    }
}

impl ObservationQuery {
    pub fn with_observation_start(mut self, start: NaiveDate) -> Self {
        self.observation_start = Some(start);
        self
    }

    pub fn with_observation_end(mut self, end: NaiveDate) -> Self {
        self.observation_end = Some(end);
        self
    }

    pub fn with_units(mut self, units: Unit) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    pub fn with_aggregation_method(mut self, method: AggregationMethod) -> Self {
        self.aggregation_method = Some(method);
        self
    }

    pub fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = Some(output_type);
        self
    }

    pub fn with_vintage_date(mut self, date: NaiveDate) -> Self {
        self.vintage_dates.push(date);
        self
    }

    pub fn with_vintage_dates(mut self, dates: &[NaiveDate]) -> Self {
        self.vintage_dates.extend_from_slice(dates);
        self
    }
}

/// Options for `series/updates`.
#[derive(Clone, Debug, Default)]
pub struct SeriesUpdatesQuery {
    pub common: QueryCommon,
    pub filter_value: Option<FilterValue>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
}

impl Query for SeriesUpdatesQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        params
            .insert_opt("filter_value", self.filter_value)
            .insert_opt("start_time", self.start_time)
            .insert_opt("end_time", self.end_time);
        params
    }
}

impl SeriesUpdatesQuery {
    pub fn with_filter_value(mut self, filter_value: FilterValue) -> Self {
        self.filter_value = Some(filter_value);
        self
    }

    /// Restricts updates to the window `[start, end)`. Both ends are required.
    pub fn with_time_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }
}
