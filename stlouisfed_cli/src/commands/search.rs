use anyhow::Result;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::{SeriesListQuery, TagQuery};
use stlouisfed_lib::types::{FilterVariable, OrderBy, SearchType};
use stlouisfed_lib::Fred;

use super::{apply_sort, parse_enum, parse_opt, RealtimeArgs};
use crate::output::{print_series, print_tags, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Words to match against series titles and notes
    pub text: String,

    /// Match series IDs instead; `*` is a wildcard
    #[arg(long)]
    pub series_id: bool,

    /// Order by: search_rank, series_id, title, popularity, last_updated, ...
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort order: asc, desc
    #[arg(long)]
    pub sort: Option<String>,

    /// Filter attribute: frequency, units, seasonal_adjustment
    #[arg(long, requires = "filter_value")]
    pub filter_variable: Option<String>,

    /// Exact value the filter attribute must have (e.g. Monthly)
    #[arg(long, requires = "filter_variable")]
    pub filter_value: Option<String>,

    /// Only series carrying every one of these tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Drop series carrying any of these tags
    #[arg(long = "exclude-tag")]
    pub exclude_tags: Vec<String>,

    /// List the tags of the matching series instead of the series
    #[arg(long)]
    pub show_tags: bool,

    /// Print at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,
}

pub async fn run(args: &SearchArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    if args.show_tags {
        let query = args
            .realtime
            .apply(TagQuery::default())
            .with_tag_names(&args.tags);
        let query = apply_sort(query, args.sort.as_ref())?;
        let mut tags = fred.series_search_tags(&args.text, &query).await?;
        if let Some(limit) = args.limit {
            tags.truncate(limit);
        }
        return print_tags(&tags, format);
    }

    let search_type = if args.series_id {
        SearchType::SeriesId
    } else {
        SearchType::FullText
    };

    let mut query = args
        .realtime
        .apply(SeriesListQuery::default())
        .with_tag_names(&args.tags)
        .with_exclude_tag_names(&args.exclude_tags);
    query = apply_sort(query, args.sort.as_ref())?;
    if let Some(order_by) = parse_opt::<OrderBy>(args.order_by.as_ref())? {
        query = query.with_order_by(order_by);
    }
    if let (Some(variable), Some(value)) = (&args.filter_variable, &args.filter_value) {
        query = query.with_filter(parse_enum::<FilterVariable>(variable)?, value);
    }

    let mut series = fred.series_search(&args.text, search_type, &query).await?;
    eprintln!("{} matching series", series.len());
    if let Some(limit) = args.limit {
        series.truncate(limit);
    }
    print_series(&series, format)
}
