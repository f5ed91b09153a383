//! CLI subcommand implementations.

pub mod category;
pub mod fraser;
pub mod geo;
pub mod observations;
pub mod releases;
pub mod search;
pub mod series;
pub mod sources;
pub mod tags;

use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::Query;
use stlouisfed_lib::types::SortOrder;

/// Real-time period flags shared by the FRED subcommands.
#[derive(Args, Clone, Debug, Default)]
pub struct RealtimeArgs {
    /// Start of the real-time period (YYYY-MM-DD)
    #[arg(long)]
    pub realtime_start: Option<NaiveDate>,

    /// End of the real-time period (YYYY-MM-DD)
    #[arg(long)]
    pub realtime_end: Option<NaiveDate>,
}

impl RealtimeArgs {
    pub fn apply<Q: Query>(&self, mut query: Q) -> Q {
        if let Some(start) = self.realtime_start {
            query = query.with_realtime_start(start);
        }
        if let Some(end) = self.realtime_end {
            query = query.with_realtime_end(end);
        }
        query
    }
}

/// Parses an enum flag, accepting wire values and long names.
pub fn parse_enum<T: FromStr<Err = String>>(input: &str) -> Result<T> {
    input.parse::<T>().map_err(anyhow::Error::msg)
}

pub fn parse_opt<T: FromStr<Err = String>>(input: Option<&String>) -> Result<Option<T>> {
    input.map(|s| parse_enum(s)).transpose()
}

/// Applies `--sort asc|desc` when given.
pub fn apply_sort<Q: Query>(query: Q, sort: Option<&String>) -> Result<Q> {
    Ok(match parse_opt::<SortOrder>(sort)? {
        Some(order) => query.with_sort_order(order),
        None => query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stlouisfed_lib::stlouisfed_api::RealtimeQuery;
    use stlouisfed_lib::types::Unit;

    #[test]
    fn parse_enum_accepts_long_names() {
        assert_eq!(parse_enum::<Unit>("pch").unwrap(), Unit::PercentChange);
        assert_eq!(parse_enum::<Unit>("percent_change").unwrap(), Unit::PercentChange);
        let err = parse_enum::<Unit>("percent").unwrap_err();
        assert!(err.to_string().starts_with("unknown Unit 'percent'"));
    }

    #[test]
    fn realtime_args_apply() {
        let args = RealtimeArgs {
            realtime_start: NaiveDate::from_ymd_opt(2020, 1, 1),
            realtime_end: None,
        };
        let query = args.apply(RealtimeQuery::default());
        assert_eq!(query.common.realtime_start, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(query.common.realtime_end, None);
    }

    #[test]
    fn sort_flag() {
        let query = apply_sort(RealtimeQuery::default(), Some(&"desc".to_string())).unwrap();
        assert_eq!(query.common.sort_order, Some(SortOrder::Desc));
        assert!(apply_sort(RealtimeQuery::default(), Some(&"up".to_string())).is_err());
    }
}
