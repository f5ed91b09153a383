use anyhow::Result;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::{SeriesListQuery, TagQuery};
use stlouisfed_lib::types::{OrderBy, TagGroupId};
use stlouisfed_lib::Fred;

use super::{apply_sort, parse_opt, RealtimeArgs};
use crate::output::{print_series, print_tags, OutputFormat};

#[derive(Args)]
pub struct TagsArgs {
    /// Only tags whose names match these words
    #[arg(long)]
    pub search: Option<String>,

    /// Tag group: freq, gen, geo, geot, rls, seas, src, cc
    #[arg(long)]
    pub group: Option<String>,

    /// Tag names to start from (repeatable)
    #[arg(long = "name")]
    pub names: Vec<String>,

    /// Tag names to exclude (repeatable)
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,

    /// List tags that appear together with every --name
    #[arg(long, requires = "names")]
    pub related: bool,

    /// List the series carrying every --name
    #[arg(long, requires = "names")]
    pub series: bool,

    /// Order by: series_count, popularity, created, name, group_id
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort order: asc, desc
    #[arg(long)]
    pub sort: Option<String>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,
}

pub async fn run(args: &TagsArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    let order_by = parse_opt::<OrderBy>(args.order_by.as_ref())?;

    if args.series {
        let mut query = args
            .realtime
            .apply(SeriesListQuery::default())
            .with_tag_names(&args.names)
            .with_exclude_tag_names(&args.exclude);
        query = apply_sort(query, args.sort.as_ref())?;
        if let Some(order_by) = order_by {
            query = query.with_order_by(order_by);
        }
        let series = fred.tags_series(&query).await?;
        eprintln!("{} series", series.len());
        return print_series(&series, format);
    }

    let mut query = args
        .realtime
        .apply(TagQuery::default())
        .with_tag_names(&args.names)
        .with_exclude_tag_names(&args.exclude);
    query = apply_sort(query, args.sort.as_ref())?;
    if let Some(search) = &args.search {
        query = query.with_search_text(search);
    }
    if let Some(group) = parse_opt::<TagGroupId>(args.group.as_ref())? {
        query = query.with_tag_group_id(group);
    }
    if let Some(order_by) = order_by {
        query = query.with_order_by(order_by);
    }

    let tags = if args.related {
        fred.related_tags(&query).await?
    } else {
        fred.tags(&query).await?
    };
    eprintln!("{} tags", tags.len());
    print_tags(&tags, format)
}
