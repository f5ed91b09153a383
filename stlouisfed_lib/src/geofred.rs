use chrono::NaiveDate;
use stlouisfed_api::types::{AggregationMethod, RegionalObservation, SeriesGroup, Shape, ShapeType, Unit};
use stlouisfed_api::{CancellationToken, Client, ClientConfig, Error, QueryParams, RegionalDataQuery};

use crate::mapping;
use crate::validation;

/// Client for GeoFRED (FRED Maps): regional cross sections and region shapes.
///
/// Unlike [`Fred`](crate::Fred), the client-side rate gate is off by default
/// because GeoFRED calls are single requests.
#[derive(Clone)]
pub struct GeoFred {
    client: Client,
    cancel: CancellationToken,
}

impl GeoFred {
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(api_key).without_rate_limit())
    }

    pub fn with_config(mut config: ClientConfig) -> Result<Self, Error> {
        config.api_key = validation::validate_api_key(&config.api_key)?;
        Ok(Self {
            client: Client::new(config)?,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Outlines of every region of one kind, geometry as WKT.
    pub async fn shapes(&self, shape: ShapeType) -> Result<Vec<Shape>, Error> {
        let endpoint = "/geofred/shapes/file";
        let params = QueryParams::new().with("shape", shape);
        let values = self
            .client
            .fetch_with_cancel(endpoint, shape.wire_value(), None, &params, &self.cancel)
            .await?;
        mapping::shapes(endpoint, values)
    }

    /// The regional group a series belongs to.
    pub async fn series_group(&self, series_id: &str) -> Result<SeriesGroup, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let endpoint = "/geofred/series/group";
        let params = QueryParams::new().with("series_id", series_id);
        let values = self
            .client
            .fetch_with_cancel(endpoint, "series_group", None, &params, &self.cancel)
            .await?;
        mapping::first(endpoint, values)
    }

    /// Cross section of the regional data a series belongs to. `date` and
    /// `start_date` default to today.
    pub async fn series_data(
        &self,
        series_id: &str,
        date: Option<NaiveDate>,
        start_date: Option<NaiveDate>,
    ) -> Result<Vec<RegionalObservation>, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let today = validation::today();
        let endpoint = "/geofred/series/data";
        let params = QueryParams::new()
            .with("series_id", series_id)
            .with("date", date.unwrap_or(today))
            .with("start_date", start_date.unwrap_or(today));
        let values = self
            .client
            .fetch_with_cancel(endpoint, "meta.data", None, &params, &self.cancel)
            .await?;
        mapping::regional_observations(endpoint, values)
    }

    /// Regional data by series group. Unset `start_date` defaults to today,
    /// the transformation to levels and aggregation to the average.
    pub async fn regional_data(&self, query: &RegionalDataQuery) -> Result<Vec<RegionalObservation>, Error> {
        let mut query = query.clone();
        query.series_group = validation::sanitize_text(
            &query.series_group,
            validation::MAX_SEARCH_LENGTH,
            "series_group",
        )?;
        query.start_date.get_or_insert_with(validation::today);
        query.transformation.get_or_insert(Unit::Levels);
        query.aggregation_method.get_or_insert(AggregationMethod::Average);

        let endpoint = "/geofred/regional/data";
        let values = self
            .client
            .fetch_with_cancel(endpoint, "meta.data", None, &query.to_params(), &self.cancel)
            .await?;
        mapping::regional_observations(endpoint, values)
    }
}
