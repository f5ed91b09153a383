use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use stlouisfed_api::types::{OrderBy, SortOrder, TagGroupId};
use stlouisfed_api::{Error, QueryCommon};

pub const API_KEY_LENGTH: usize = 32;
pub const MAX_SEARCH_LENGTH: usize = 200;

/// Earliest date FRED accepts for any real-time or observation bound.
pub const MIN_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1776, 7, 4) {
    Some(d) => d,
    None => NaiveDate::MIN,
};

/// Open end of the observation range.
pub const MAX_DATE: NaiveDate = match NaiveDate::from_ymd_opt(9999, 12, 31) {
    Some(d) => d,
    None => NaiveDate::MAX,
};

pub const SERIES_ORDERS: &[OrderBy] = &[
    OrderBy::SeriesId,
    OrderBy::Title,
    OrderBy::Units,
    OrderBy::Frequency,
    OrderBy::SeasonalAdjustment,
    OrderBy::RealtimeStart,
    OrderBy::RealtimeEnd,
    OrderBy::LastUpdated,
    OrderBy::ObservationStart,
    OrderBy::ObservationEnd,
    OrderBy::Popularity,
    OrderBy::GroupPopularity,
];

/// `series/search` additionally ranks by relevance.
pub const SEARCH_ORDERS: &[OrderBy] = &[
    OrderBy::SearchRank,
    OrderBy::SeriesId,
    OrderBy::Title,
    OrderBy::Units,
    OrderBy::Frequency,
    OrderBy::SeasonalAdjustment,
    OrderBy::RealtimeStart,
    OrderBy::RealtimeEnd,
    OrderBy::LastUpdated,
    OrderBy::ObservationStart,
    OrderBy::ObservationEnd,
    OrderBy::Popularity,
    OrderBy::GroupPopularity,
];

pub const TAG_ORDERS: &[OrderBy] = &[
    OrderBy::SeriesCount,
    OrderBy::Popularity,
    OrderBy::Created,
    OrderBy::Name,
    OrderBy::GroupId,
];

pub const RELEASE_ORDERS: &[OrderBy] = &[
    OrderBy::ReleaseId,
    OrderBy::Name,
    OrderBy::PressRelease,
    OrderBy::RealtimeStart,
    OrderBy::RealtimeEnd,
];

pub const RELEASE_DATE_ORDERS: &[OrderBy] =
    &[OrderBy::ReleaseDate, OrderBy::ReleaseId, OrderBy::ReleaseName];

pub const SOURCE_ORDERS: &[OrderBy] = &[
    OrderBy::SourceId,
    OrderBy::Name,
    OrderBy::RealtimeStart,
    OrderBy::RealtimeEnd,
];

/// Tag groups accepted by the category and related-tag searches, which do
/// not index citation tags.
pub const SEARCH_TAG_GROUPS: &[TagGroupId] = &[
    TagGroupId::Frequency,
    TagGroupId::GeneralOrConcept,
    TagGroupId::Geography,
    TagGroupId::GeographyType,
    TagGroupId::Release,
    TagGroupId::SeasonalAdjustment,
    TagGroupId::Source,
];

/// The local calendar date, used for every "today" default.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// January 1st of the year `date` falls in.
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize, field: &str) -> Result<String, Error> {
    if input.len() > max_len {
        return Err(Error::validation(format!(
            "{} exceeds maximum length of {} bytes",
            field, max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(Error::validation(format!("{} is empty", field)));
    }
    Ok(sanitized)
}

/// Validate a FRED API key: 32 alphanumeric characters, lower-cased.
pub fn validate_api_key(input: &str) -> Result<String, Error> {
    let key = input.trim();
    if key.len() != API_KEY_LENGTH || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::validation(format!(
            "api_key must be a {} character alpha-numeric string",
            API_KEY_LENGTH
        )));
    }
    Ok(key.to_lowercase())
}

pub fn validate_series_id(input: &str) -> Result<String, Error> {
    sanitize_text(input, MAX_SEARCH_LENGTH, "series_id")
}

pub fn validate_search_text(input: &str) -> Result<String, Error> {
    sanitize_text(input, MAX_SEARCH_LENGTH, "search_text")
}

/// Category 0 is the root of the category tree.
pub fn validate_category_id(category_id: i64) -> Result<i64, Error> {
    if category_id < 0 {
        return Err(Error::validation(format!(
            "Variable category_id ({}) is not a non-negative integer.",
            category_id
        )));
    }
    Ok(category_id)
}

/// Release and source ids start at 1.
pub fn validate_positive_id(name: &str, id: i64) -> Result<i64, Error> {
    if id <= 0 {
        return Err(Error::validation(format!(
            "Variable {} ({}) is not a positive integer.",
            name, id
        )));
    }
    Ok(id)
}

/// Fill the real-time period with its defaults and check its bounds.
///
/// Missing ends default to `default_start` and `today`. The period must lie
/// within `[1776-07-04, today]` and must not be inverted.
pub fn realtime_period(
    common: &mut QueryCommon,
    default_start: NaiveDate,
    today: NaiveDate,
) -> Result<(), Error> {
    let start = *common.realtime_start.get_or_insert(default_start);
    let end = *common.realtime_end.get_or_insert(today);

    if start < MIN_DATE {
        return Err(Error::validation(format!(
            "Variable realtime_start (\"{}\") is before min date {}.",
            start, MIN_DATE
        )));
    }
    if end > today {
        return Err(Error::validation(format!(
            "Variable realtime_end (\"{}\") can not be after today's date (\"{}\")",
            end, today
        )));
    }
    if start > end {
        return Err(Error::validation(format!(
            "The date set by variable realtime_start (\"{}\") can not be after the date set by variable realtime_end (\"{}\").",
            start, end
        )));
    }
    Ok(())
}

/// Fill `order_by` with `default` and check it against `allowed`.
pub fn order_by(
    order_by: &mut Option<OrderBy>,
    default: OrderBy,
    allowed: &[OrderBy],
) -> Result<OrderBy, Error> {
    let value = *order_by.get_or_insert(default);
    if !allowed.contains(&value) {
        let names: Vec<&str> = allowed.iter().map(|o| o.wire_value()).collect();
        return Err(Error::validation(format!(
            "Variable order_by ({}) is not one of the values: {}",
            value,
            names.join(", ")
        )));
    }
    Ok(value)
}

/// Reject an `order_by` on endpoints that have a fixed ordering.
pub fn no_order_by(order_by: Option<OrderBy>, endpoint: &str) -> Result<(), Error> {
    match order_by {
        Some(value) => Err(Error::validation(format!(
            "Variable order_by ({}) is not supported by {}",
            value, endpoint
        ))),
        None => Ok(()),
    }
}

pub fn sort_order(sort_order: &mut Option<SortOrder>, default: SortOrder) -> SortOrder {
    *sort_order.get_or_insert(default)
}

pub fn validate_tag_group(tag_group_id: Option<TagGroupId>, allowed: &[TagGroupId]) -> Result<(), Error> {
    match tag_group_id {
        Some(group) if !allowed.contains(&group) => {
            let names: Vec<&str> = allowed.iter().map(|g| g.wire_value()).collect();
            Err(Error::validation(format!(
                "Variable tag_group_id ({}) is not one of the values: {}",
                group,
                names.join(", ")
            )))
        }
        _ => Ok(()),
    }
}

/// Excluding tags only narrows a tag filter, so it needs one.
pub fn validate_exclude_tags(tag_names: &[String], exclude_tag_names: &[String]) -> Result<(), Error> {
    if !exclude_tag_names.is_empty() && tag_names.is_empty() {
        return Err(Error::validation(
            "Parameter exclude_tag_names requires that variable tag_names also be set to limit the number of matching series.",
        ));
    }
    Ok(())
}

/// `series/updates` windows need both ends, in order.
pub fn validate_time_window(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<(), Error> {
    match (start, end) {
        (Some(_), None) => Err(Error::validation("end_time is required if start_time is set")),
        (None, Some(_)) => Err(Error::validation("start_time is required if end_time is set")),
        (Some(start), Some(end)) if start >= end => {
            Err(Error::validation("end_time must be greater than start_time"))
        }
        _ => Ok(()),
    }
}
