use anyhow::Result;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::{RealtimeQuery, SeriesListQuery, TagQuery};
use stlouisfed_lib::Fred;

use super::{apply_sort, RealtimeArgs};
use crate::output::{print_categories, print_series, print_tags, OutputFormat};

#[derive(Args)]
pub struct CategoryArgs {
    /// Category ID; 0 is the root
    #[arg(default_value = "0")]
    pub id: i64,

    /// List the child categories
    #[arg(long)]
    pub children: bool,

    /// List related categories
    #[arg(long)]
    pub related: bool,

    /// List the series in the category
    #[arg(long)]
    pub series: bool,

    /// List the tags of the series in the category
    #[arg(long)]
    pub tags: bool,

    /// Restrict --series to series carrying these tags
    #[arg(long = "tag")]
    pub tag_names: Vec<String>,

    /// Sort order for lists: asc, desc
    #[arg(long)]
    pub sort: Option<String>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,
}

pub async fn run(args: &CategoryArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    let realtime = args.realtime.apply(RealtimeQuery::default());

    if args.children {
        print_categories(&fred.category_children(args.id, &realtime).await?, format)
    } else if args.related {
        print_categories(&fred.category_related(args.id, &realtime).await?, format)
    } else if args.series {
        let query = args
            .realtime
            .apply(SeriesListQuery::default())
            .with_tag_names(&args.tag_names);
        let query = apply_sort(query, args.sort.as_ref())?;
        let series = fred.category_series(args.id, &query).await?;
        eprintln!("{} series in category {}", series.len(), args.id);
        print_series(&series, format)
    } else if args.tags {
        let query = apply_sort(args.realtime.apply(TagQuery::default()), args.sort.as_ref())?;
        print_tags(&fred.category_tags(args.id, &query).await?, format)
    } else {
        let category = fred.category(args.id).await?;
        print_categories(&[category], format)
    }
}
