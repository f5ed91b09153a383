//! FRED and ALFRED endpoints.
//!
//! Every method validates its input, fills in the endpoint's documented
//! defaults and hands the rendered parameters to [`Client::fetch`]. Queries
//! are taken by reference and cloned before defaults are applied, so one
//! builder can be reused across calls.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stlouisfed_api::types::{
    AggregationMethod, Category, FilterValue, Observation, OrderBy, OutputType, Release, ReleaseDate,
    SearchType, Series, SortOrder, Source, Tag, TagGroupId, Unit, VintageObservation,
};
use stlouisfed_api::{
    CancellationToken, Client, ClientConfig, Error, ListQuery, ObservationQuery, Query, QueryParams,
    RealtimeQuery, ReleaseDatesQuery, SeriesListQuery, SeriesUpdatesQuery, TagQuery,
};

use crate::mapping;
use crate::validation::{self, MAX_DATE, MIN_DATE};

const LIST_PAGE: u64 = 1000;
const DATES_PAGE: u64 = 10000;
const OBSERVATIONS_PAGE: u64 = 100000;

/// Client for the FRED API.
#[derive(Clone)]
pub struct Fred {
    client: Client,
    cancel: CancellationToken,
}

/// ALFRED shares FRED's endpoints; vintages are selected with real-time
/// periods and vintage dates.
pub type Alfred = Fred;

impl Fred {
    /// Production client with the default quota of 120 calls per minute.
    pub fn new(api_key: &str) -> Result<Self, Error> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Validates and lower-cases the configured key before building the client.
    pub fn with_config(mut config: ClientConfig) -> Result<Self, Error> {
        config.api_key = validation::validate_api_key(&config.api_key)?;
        Ok(Self {
            client: Client::new(config)?,
            cancel: CancellationToken::new(),
        })
    }

    pub fn from_env() -> Result<Self, Error> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Aborts every in-flight and future call when `cancel` fires.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        key: &str,
        page_size: Option<u64>,
        params: QueryParams,
    ) -> Result<Vec<T>, Error> {
        let values = self.values(endpoint, key, page_size, params).await?;
        mapping::records(endpoint, values)
    }

    async fn get_one<T: DeserializeOwned>(&self, endpoint: &str, key: &str, params: QueryParams) -> Result<T, Error> {
        let values = self.values(endpoint, key, None, params).await?;
        mapping::first(endpoint, values)
    }

    async fn values(
        &self,
        endpoint: &str,
        key: &str,
        page_size: Option<u64>,
        params: QueryParams,
    ) -> Result<Vec<Value>, Error> {
        self.client
            .fetch_with_cancel(endpoint, key, page_size, &params, &self.cancel)
            .await
    }

    // -- Categories --

    /// Get a category. Category 0 is the root.
    pub async fn category(&self, category_id: i64) -> Result<Category, Error> {
        let category_id = validation::validate_category_id(category_id)?;
        let params = QueryParams::new().with("category_id", category_id);
        self.get_one("/fred/category", "categories", params).await
    }

    pub async fn category_children(&self, category_id: i64, query: &RealtimeQuery) -> Result<Vec<Category>, Error> {
        let category_id = validation::validate_category_id(category_id)?;
        let params = id_and(realtime(query.clone())?, "category_id", category_id);
        self.get("/fred/category/children", "categories", None, params).await
    }

    /// Categories related to this one through a shared theme, not the tree.
    pub async fn category_related(&self, category_id: i64, query: &RealtimeQuery) -> Result<Vec<Category>, Error> {
        let category_id = validation::validate_category_id(category_id)?;
        let params = id_and(realtime(query.clone())?, "category_id", category_id);
        self.get("/fred/category/related", "categories", None, params).await
    }

    pub async fn category_series(&self, category_id: i64, query: &SeriesListQuery) -> Result<Vec<Series>, Error> {
        let category_id = validation::validate_category_id(category_id)?;
        let query = series_list(query.clone(), OrderBy::SeriesId, validation::SERIES_ORDERS)?;
        validation::validate_exclude_tags(&query.tag_names, &query.exclude_tag_names)?;
        let params = id_and(query, "category_id", category_id);
        self.get("/fred/category/series", "seriess", Some(LIST_PAGE), params).await
    }

    pub async fn category_tags(&self, category_id: i64, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let category_id = validation::validate_category_id(category_id)?;
        let query = tags(query.clone(), validation::SEARCH_TAG_GROUPS)?;
        let params = id_and(query, "category_id", category_id);
        self.get("/fred/category/tags", "tags", Some(LIST_PAGE), params).await
    }

    pub async fn category_related_tags(&self, category_id: i64, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let category_id = validation::validate_category_id(category_id)?;
        let query = tags(query.clone(), TagGroupId::ALL)?;
        let params = id_and(query, "category_id", category_id);
        self.get("/fred/category/related_tags", "tags", Some(LIST_PAGE), params).await
    }

    // -- Releases --

    pub async fn releases(&self, query: &ListQuery) -> Result<Vec<Release>, Error> {
        let query = listing(query.clone(), OrderBy::ReleaseId, validation::RELEASE_ORDERS)?;
        self.get("/fred/releases", "releases", Some(LIST_PAGE), query.to_params()).await
    }

    /// Release dates for all releases, newest first, starting from January
    /// 1st of the current year unless told otherwise.
    pub async fn releases_dates(&self, query: &ReleaseDatesQuery) -> Result<Vec<ReleaseDate>, Error> {
        let mut query = query.clone();
        let today = validation::today();
        validation::realtime_period(query.get_common(), validation::start_of_year(today), today)?;
        validation::order_by(&mut query.order_by, OrderBy::ReleaseId, validation::RELEASE_DATE_ORDERS)?;
        validation::sort_order(&mut query.get_common().sort_order, SortOrder::Desc);
        self.get("/fred/releases/dates", "release_dates", Some(LIST_PAGE), query.to_params())
            .await
    }

    pub async fn release(&self, release_id: i64, query: &RealtimeQuery) -> Result<Release, Error> {
        let release_id = validation::validate_positive_id("release_id", release_id)?;
        let params = id_and(realtime(query.clone())?, "release_id", release_id);
        self.get_one("/fred/release", "releases", params).await
    }

    /// Every date the release was published, back to 1776-07-04 by default.
    pub async fn release_dates(&self, release_id: i64, query: &ReleaseDatesQuery) -> Result<Vec<ReleaseDate>, Error> {
        let release_id = validation::validate_positive_id("release_id", release_id)?;
        let mut query = query.clone();
        validation::no_order_by(query.order_by, "release/dates")?;
        validation::realtime_period(query.get_common(), MIN_DATE, validation::today())?;
        validation::sort_order(&mut query.get_common().sort_order, SortOrder::Asc);
        let params = id_and(query, "release_id", release_id);
        self.get("/fred/release/dates", "release_dates", Some(DATES_PAGE), params).await
    }

    pub async fn release_series(&self, release_id: i64, query: &SeriesListQuery) -> Result<Vec<Series>, Error> {
        let release_id = validation::validate_positive_id("release_id", release_id)?;
        let query = series_list(query.clone(), OrderBy::SeriesId, validation::SERIES_ORDERS)?;
        let params = id_and(query, "release_id", release_id);
        self.get("/fred/release/series", "seriess", Some(LIST_PAGE), params).await
    }

    pub async fn release_sources(&self, release_id: i64, query: &RealtimeQuery) -> Result<Vec<Source>, Error> {
        let release_id = validation::validate_positive_id("release_id", release_id)?;
        let params = id_and(realtime(query.clone())?, "release_id", release_id);
        self.get("/fred/release/sources", "sources", None, params).await
    }

    pub async fn release_tags(&self, release_id: i64, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let release_id = validation::validate_positive_id("release_id", release_id)?;
        let query = tags(query.clone(), TagGroupId::ALL)?;
        let params = id_and(query, "release_id", release_id);
        self.get("/fred/release/tags", "tags", Some(LIST_PAGE), params).await
    }

    pub async fn release_related_tags(&self, release_id: i64, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let release_id = validation::validate_positive_id("release_id", release_id)?;
        let query = tags(query.clone(), TagGroupId::ALL)?;
        let params = id_and(query, "release_id", release_id);
        self.get("/fred/release/related_tags", "tags", Some(LIST_PAGE), params).await
    }

    // -- Series --

    pub async fn series(&self, series_id: &str, query: &RealtimeQuery) -> Result<Series, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let params = id_and(realtime(query.clone())?, "series_id", series_id);
        self.get_one("/fred/series", "seriess", params).await
    }

    pub async fn series_categories(&self, series_id: &str, query: &RealtimeQuery) -> Result<Vec<Category>, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let params = id_and(realtime(query.clone())?, "series_id", series_id);
        self.get("/fred/series/categories", "categories", None, params).await
    }

    /// Observations as one value per date and real-time period.
    ///
    /// Accepts the `realtime_period` (default) and `initial_release_only`
    /// output types; the column-per-vintage shapes are served by
    /// [`series_vintage_observations`](Self::series_vintage_observations).
    pub async fn series_observations(&self, series_id: &str, query: &ObservationQuery) -> Result<Vec<Observation>, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let query = observations(query.clone(), OutputType::RealtimePeriod)?;
        if !matches!(
            query.output_type,
            Some(OutputType::RealtimePeriod) | Some(OutputType::InitialReleaseOnly)
        ) {
            return Err(Error::validation(format!(
                "Variable output_type ({}) returns one column per vintage; use series_vintage_observations",
                query.output_type.map(|o| o.wire_value()).unwrap_or_default()
            )));
        }
        let params = id_and(query, "series_id", series_id);
        self.get("/fred/series/observations", "observations", Some(OBSERVATIONS_PAGE), params)
            .await
    }

    /// Observations with one column per vintage: the `all` (default) and
    /// `new_and_revised` output types.
    pub async fn series_vintage_observations(
        &self,
        series_id: &str,
        query: &ObservationQuery,
    ) -> Result<Vec<VintageObservation>, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let query = observations(query.clone(), OutputType::All)?;
        if !matches!(query.output_type, Some(OutputType::All) | Some(OutputType::NewAndRevised)) {
            return Err(Error::validation(format!(
                "Variable output_type ({}) returns one value per date; use series_observations",
                query.output_type.map(|o| o.wire_value()).unwrap_or_default()
            )));
        }
        let endpoint = "/fred/series/observations";
        let params = id_and(query, "series_id", series_id);
        let values = self
            .values(endpoint, "observations", Some(OBSERVATIONS_PAGE), params)
            .await?;
        mapping::vintage_observations(endpoint, values)
    }

    pub async fn series_release(&self, series_id: &str, query: &RealtimeQuery) -> Result<Release, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let params = id_and(realtime(query.clone())?, "series_id", series_id);
        self.get_one("/fred/series/release", "releases", params).await
    }

    /// Series matching `search_text`.
    ///
    /// Full-text searches rank by relevance by default; id searches order by
    /// series id. Relevance and popularity sort descending unless a sort
    /// order is given.
    pub async fn series_search(
        &self,
        search_text: &str,
        search_type: SearchType,
        query: &SeriesListQuery,
    ) -> Result<Vec<Series>, Error> {
        let search_text = validation::validate_search_text(search_text)?;
        let mut query = query.clone();
        let today = validation::today();
        validation::realtime_period(query.get_common(), today, today)?;
        let default_order = match search_type {
            SearchType::FullText => OrderBy::SearchRank,
            SearchType::SeriesId => OrderBy::SeriesId,
        };
        let order = validation::order_by(&mut query.order_by, default_order, validation::SEARCH_ORDERS)?;
        let default_sort = match order {
            OrderBy::SearchRank | OrderBy::Popularity => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        validation::sort_order(&mut query.get_common().sort_order, default_sort);

        let mut params = QueryParams::new()
            .with("search_text", search_text)
            .with("search_type", search_type);
        params.extend(query.to_params());
        self.get("/fred/series/search", "seriess", Some(LIST_PAGE), params).await
    }

    /// Tags of the series matching `series_search_text`. The query's search
    /// text filters the tag names themselves.
    pub async fn series_search_tags(&self, series_search_text: &str, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let series_search_text = validation::validate_search_text(series_search_text)?;
        let query = tags(query.clone(), TagGroupId::ALL)?;
        let mut params = QueryParams::new().with("series_search_text", series_search_text);
        params.extend(query.params_with_search_key("tag_search_text"));
        self.get("/fred/series/search/tags", "tags", Some(LIST_PAGE), params).await
    }

    pub async fn series_search_related_tags(
        &self,
        series_search_text: &str,
        query: &TagQuery,
    ) -> Result<Vec<Tag>, Error> {
        let series_search_text = validation::validate_search_text(series_search_text)?;
        let query = tags(query.clone(), TagGroupId::ALL)?;
        let mut params = QueryParams::new().with("series_search_text", series_search_text);
        params.extend(query.params_with_search_key("tag_search_text"));
        self.get("/fred/series/search/related_tags", "tags", Some(LIST_PAGE), params)
            .await
    }

    pub async fn series_tags(&self, series_id: &str, query: &ListQuery) -> Result<Vec<Tag>, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let query = listing(query.clone(), OrderBy::SeriesCount, validation::TAG_ORDERS)?;
        let params = id_and(query, "series_id", series_id);
        self.get("/fred/series/tags", "tags", None, params).await
    }

    /// Series updated recently, newest first.
    pub async fn series_updates(&self, query: &SeriesUpdatesQuery) -> Result<Vec<Series>, Error> {
        let mut query = query.clone();
        let today = validation::today();
        validation::realtime_period(query.get_common(), today, today)?;
        validation::validate_time_window(query.start_time, query.end_time)?;
        query.filter_value.get_or_insert(FilterValue::All);
        self.get("/fred/series/updates", "seriess", Some(LIST_PAGE), query.to_params())
            .await
    }

    /// Dates on which the series was revised or released, back to 1776-07-04
    /// by default.
    pub async fn series_vintagedates(&self, series_id: &str, query: &ListQuery) -> Result<Vec<NaiveDate>, Error> {
        let series_id = validation::validate_series_id(series_id)?;
        let mut query = query.clone();
        validation::no_order_by(query.order_by, "series/vintagedates")?;
        validation::realtime_period(query.get_common(), MIN_DATE, validation::today())?;
        validation::sort_order(&mut query.get_common().sort_order, SortOrder::Asc);
        let endpoint = "/fred/series/vintagedates";
        let params = id_and(query, "series_id", series_id);
        let values = self.values(endpoint, "vintage_dates", Some(DATES_PAGE), params).await?;
        mapping::dates(endpoint, values)
    }

    // -- Sources --

    pub async fn sources(&self, query: &ListQuery) -> Result<Vec<Source>, Error> {
        let query = listing(query.clone(), OrderBy::SourceId, validation::SOURCE_ORDERS)?;
        self.get("/fred/sources", "sources", Some(LIST_PAGE), query.to_params()).await
    }

    pub async fn source(&self, source_id: i64, query: &RealtimeQuery) -> Result<Source, Error> {
        let source_id = validation::validate_positive_id("source_id", source_id)?;
        let params = id_and(realtime(query.clone())?, "source_id", source_id);
        self.get_one("/fred/source", "sources", params).await
    }

    pub async fn source_releases(&self, source_id: i64, query: &ListQuery) -> Result<Vec<Release>, Error> {
        let source_id = validation::validate_positive_id("source_id", source_id)?;
        let query = listing(query.clone(), OrderBy::ReleaseId, validation::RELEASE_ORDERS)?;
        let params = id_and(query, "source_id", source_id);
        self.get("/fred/source/releases", "releases", Some(LIST_PAGE), params).await
    }

    // -- Tags --

    pub async fn tags(&self, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let query = tags(query.clone(), TagGroupId::ALL)?;
        self.get("/fred/tags", "tags", Some(LIST_PAGE), query.to_params()).await
    }

    /// Tags that appear on series together with every tag in `tag_names`.
    pub async fn related_tags(&self, query: &TagQuery) -> Result<Vec<Tag>, Error> {
        let query = tags(query.clone(), validation::SEARCH_TAG_GROUPS)?;
        self.get("/fred/related_tags", "tags", Some(LIST_PAGE), query.to_params()).await
    }

    pub async fn tags_series(&self, query: &SeriesListQuery) -> Result<Vec<Series>, Error> {
        let query = series_list(query.clone(), OrderBy::SeriesId, validation::SERIES_ORDERS)?;
        self.get("/fred/tags/series", "seriess", Some(LIST_PAGE), query.to_params())
            .await
    }
}

/// Parameters with the identifying parameter first.
fn id_and<Q: Query>(query: Q, name: &str, id: impl Into<stlouisfed_api::QueryValue>) -> QueryParams {
    let mut params = QueryParams::new().with(name, id);
    params.extend(query.to_params());
    params
}

fn realtime(mut query: RealtimeQuery) -> Result<RealtimeQuery, Error> {
    let today = validation::today();
    validation::realtime_period(query.get_common(), today, today)?;
    Ok(query)
}

fn listing(mut query: ListQuery, default_order: OrderBy, allowed: &[OrderBy]) -> Result<ListQuery, Error> {
    let today = validation::today();
    validation::realtime_period(query.get_common(), today, today)?;
    validation::order_by(&mut query.order_by, default_order, allowed)?;
    validation::sort_order(&mut query.get_common().sort_order, SortOrder::Asc);
    Ok(query)
}

fn series_list(
    mut query: SeriesListQuery,
    default_order: OrderBy,
    allowed: &[OrderBy],
) -> Result<SeriesListQuery, Error> {
    let today = validation::today();
    validation::realtime_period(query.get_common(), today, today)?;
    validation::order_by(&mut query.order_by, default_order, allowed)?;
    validation::sort_order(&mut query.get_common().sort_order, SortOrder::Asc);
    Ok(query)
}

fn tags(mut query: TagQuery, groups: &[TagGroupId]) -> Result<TagQuery, Error> {
    let today = validation::today();
    validation::realtime_period(query.get_common(), today, today)?;
    validation::order_by(&mut query.order_by, OrderBy::SeriesCount, validation::TAG_ORDERS)?;
    validation::sort_order(&mut query.get_common().sort_order, SortOrder::Asc);
    validation::validate_tag_group(query.tag_group_id, groups)?;
    Ok(query)
}

fn observations(mut query: ObservationQuery, default_output: OutputType) -> Result<ObservationQuery, Error> {
    let today = validation::today();
    validation::realtime_period(query.get_common(), today, today)?;
    validation::sort_order(&mut query.get_common().sort_order, SortOrder::Asc);

    let start = *query.observation_start.get_or_insert(MIN_DATE);
    let end = *query.observation_end.get_or_insert(MAX_DATE);
    if start < MIN_DATE {
        return Err(Error::validation(format!(
            "Variable observation_start (\"{}\") is before min date {}.",
            start, MIN_DATE
        )));
    }
    if start > end {
        return Err(Error::validation(format!(
            "The date set by variable observation_start (\"{}\") can not be after the date set by variable observation_end (\"{}\").",
            start, end
        )));
    }
    query.units.get_or_insert(Unit::Levels);
    query.aggregation_method.get_or_insert(AggregationMethod::Average);
    query.output_type.get_or_insert(default_output);
    Ok(query)
}
