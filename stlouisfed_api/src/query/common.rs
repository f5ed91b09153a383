//! Shared query infrastructure: the [`Query`] trait and [`QueryCommon`] fields.

use chrono::NaiveDate;

use crate::types::SortOrder;

use super::QueryParams;

/// Trait implemented by all query builders. Provides conversion into
/// [`QueryParams`] and shared builder methods for the real-time period and
/// sort order.
pub trait Query {
    /// Renders this query's parameters, in the order they are sent.
    fn to_params(&self) -> QueryParams;

    /// Returns a mutable reference to the common query fields.
    fn get_common(&mut self) -> &mut QueryCommon;

    /// Sets the start of the real-time period.
    fn with_realtime_start(mut self, realtime_start: NaiveDate) -> Self
    where
        Self: Sized,
    {
        self.get_common().realtime_start = Some(realtime_start);
        self
    }

    /// Sets the end of the real-time period.
    fn with_realtime_end(mut self, realtime_end: NaiveDate) -> Self
    where
        Self: Sized,
    {
        self.get_common().realtime_end = Some(realtime_end);
        self
    }

    /// Sets the sort order (ascending or descending).
    fn with_sort_order(mut self, sort_order: SortOrder) -> Self
    where
        Self: Sized,
    {
        self.get_common().sort_order = Some(sort_order);
        self
    }
}

/// Fields shared by all query types: the real-time period and sort order.
///
/// `None` leaves the choice to the facade, which fills in the endpoint's
/// documented default before sending.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QueryCommon {
    pub realtime_start: Option<NaiveDate>,
    pub realtime_end: Option<NaiveDate>,
    pub sort_order: Option<SortOrder>,
}

impl QueryCommon {
    /// Appends the real-time period to `params`.
    pub fn add_realtime(&self, params: &mut QueryParams) {
        params
            .insert_opt("realtime_start", self.realtime_start)
            .insert_opt("realtime_end", self.realtime_end);
    }

    /// Appends the sort order to `params`.
    pub fn add_sort_order(&self, params: &mut QueryParams) {
        params.insert_opt("sort_order", self.sort_order);
    }
}

/// A query carrying only the real-time period.
#[derive(Clone, Debug, Default)]
pub struct RealtimeQuery {
    pub common: QueryCommon,
}

impl Query for RealtimeQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        params
    }
}
