use crate::types::{OrderBy, TagGroupId};

use super::common::{Query, QueryCommon};
use super::QueryParams;

/// Filters for the tag endpoints (tags, related tags, and their category,
/// release and series-search variants).
#[derive(Clone, Debug, Default)]
pub struct TagQuery {
    pub common: QueryCommon,
    pub tag_names: Vec<String>,
    pub exclude_tag_names: Vec<String>,
    pub tag_group_id: Option<TagGroupId>,
    pub search_text: Option<String>,
    pub order_by: Option<OrderBy>,
}

impl Query for TagQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        self.params_with_search_key("search_text")
    }
}

impl TagQuery {
    /// Renders the parameters with the tag search text sent under `search_key`.
    ///
    /// The series-search tag endpoints call it `tag_search_text` because
    /// `search_text` is taken by the series search itself.
    pub fn params_with_search_key(&self, search_key: &str) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        params
            .insert_list("tag_names", &self.tag_names)
            .insert_list("exclude_tag_names", &self.exclude_tag_names)
            .insert_opt("tag_group_id", self.tag_group_id)
            .insert_opt(search_key, self.search_text.as_ref())
            .insert_opt("order_by", self.order_by);
        self.common.add_sort_order(&mut params);
        params
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

    pub fn with_tag_group_id(mut self, tag_group_id: TagGroupId) -> Self {
        self.tag_group_id = Some(tag_group_id);
        self
    }

    pub fn with_search_text(mut self, search_text: &str) -> Self {
        self.search_text = Some(search_text.to_string());
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

/// Ordering options for plain listings: releases, sources, series tags.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub common: QueryCommon,
    pub order_by: Option<OrderBy>,
}

impl Query for ListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        params.insert_opt("order_by", self.order_by);
        self.common.add_sort_order(&mut params);
        params
    }
}

impl ListQuery {
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }
}

/// Options for `releases/dates` and `release/dates`.
#[derive(Clone, Debug, Default)]
pub struct ReleaseDatesQuery {
    pub common: QueryCommon,
    pub order_by: Option<OrderBy>,
    pub include_release_dates_with_no_data: bool,
}

impl Query for ReleaseDatesQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        self.common.add_realtime(&mut params);
        params.insert_opt("order_by", self.order_by);
        self.common.add_sort_order(&mut params);
        params.insert(
            "include_release_dates_with_no_data",
            self.include_release_dates_with_no_data,
        );
        params
    }
}

impl ReleaseDatesQuery {
    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_release_dates_with_no_data(mut self, include: bool) -> Self {
        self.include_release_dates_with_no_data = include;
        self
    }
}
