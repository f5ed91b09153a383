use anyhow::Result;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::{ListQuery, RealtimeQuery, SeriesUpdatesQuery};
use stlouisfed_lib::types::FilterValue;
use stlouisfed_lib::Fred;

use super::{apply_sort, parse_opt, RealtimeArgs};
use crate::output::{print_categories, print_dates, print_releases, print_series, print_tags, OutputFormat};

#[derive(Args)]
pub struct SeriesArgs {
    /// Series ID (e.g. GNPCA). Omit with --updates.
    pub series_id: Option<String>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,

    /// Show the categories the series belongs to
    #[arg(long)]
    pub categories: bool,

    /// Show the release the series belongs to
    #[arg(long)]
    pub release: bool,

    /// Show the tags attached to the series
    #[arg(long)]
    pub tags: bool,

    /// List the dates the series was revised or released
    #[arg(long)]
    pub vintage_dates: bool,

    /// List recently updated series instead: macro, regional, all
    #[arg(long, value_name = "FILTER", num_args = 0..=1, default_missing_value = "all")]
    pub updates: Option<String>,

    /// Sort order for lists: asc, desc
    #[arg(long)]
    pub sort: Option<String>,
}

pub async fn run(args: &SeriesArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    if args.updates.is_some() {
        let mut query = args.realtime.apply(SeriesUpdatesQuery::default());
        if let Some(filter) = parse_opt::<FilterValue>(args.updates.as_ref())? {
            query = query.with_filter_value(filter);
        }
        let series = fred.series_updates(&query).await?;
        eprintln!("{} updated series", series.len());
        return print_series(&series, format);
    }

    let Some(series_id) = args.series_id.as_deref() else {
        anyhow::bail!("a series ID is required unless --updates is given");
    };
    let realtime = args.realtime.apply(RealtimeQuery::default());

    if args.categories {
        print_categories(&fred.series_categories(series_id, &realtime).await?, format)
    } else if args.release {
        let release = fred.series_release(series_id, &realtime).await?;
        print_releases(&[release], format)
    } else if args.tags {
        let query = apply_sort(args.realtime.apply(ListQuery::default()), args.sort.as_ref())?;
        print_tags(&fred.series_tags(series_id, &query).await?, format)
    } else if args.vintage_dates {
        let query = apply_sort(args.realtime.apply(ListQuery::default()), args.sort.as_ref())?;
        let dates = fred.series_vintagedates(series_id, &query).await?;
        eprintln!("{} vintage dates", dates.len());
        print_dates(&dates, format)
    } else {
        let series = fred.series(series_id, &realtime).await?;
        print_series(&[series], format)
    }
}
