use anyhow::Result;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::{ListQuery, RealtimeQuery, ReleaseDatesQuery, SeriesListQuery, TagQuery};
use stlouisfed_lib::Fred;

use super::{apply_sort, RealtimeArgs};
use crate::output::{print_release_dates, print_releases, print_series, print_sources, print_tags, OutputFormat};

#[derive(Args)]
pub struct ReleasesArgs {
    /// Show a single release by ID
    #[arg(long)]
    pub id: Option<i64>,

    /// List release dates (of all releases, or of --id)
    #[arg(long)]
    pub dates: bool,

    /// Include scheduled dates that have no data yet
    #[arg(long)]
    pub include_empty: bool,

    /// List the series in the release (requires --id)
    #[arg(long, requires = "id")]
    pub series: bool,

    /// List the sources of the release (requires --id)
    #[arg(long, requires = "id")]
    pub sources: bool,

    /// List the tags of the release (requires --id)
    #[arg(long, requires = "id")]
    pub tags: bool,

    /// Sort order for lists: asc, desc
    #[arg(long)]
    pub sort: Option<String>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,
}

pub async fn run(args: &ReleasesArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    if args.dates {
        let query = args
            .realtime
            .apply(ReleaseDatesQuery::default())
            .with_release_dates_with_no_data(args.include_empty);
        let query = apply_sort(query, args.sort.as_ref())?;
        let dates = match args.id {
            Some(id) => fred.release_dates(id, &query).await?,
            None => fred.releases_dates(&query).await?,
        };
        eprintln!("{} release dates", dates.len());
        return print_release_dates(&dates, format);
    }

    let Some(id) = args.id else {
        let query = apply_sort(args.realtime.apply(ListQuery::default()), args.sort.as_ref())?;
        let releases = fred.releases(&query).await?;
        eprintln!("{} releases", releases.len());
        return print_releases(&releases, format);
    };

    if args.series {
        let query = apply_sort(args.realtime.apply(SeriesListQuery::default()), args.sort.as_ref())?;
        print_series(&fred.release_series(id, &query).await?, format)
    } else if args.sources {
        let realtime = args.realtime.apply(RealtimeQuery::default());
        print_sources(&fred.release_sources(id, &realtime).await?, format)
    } else if args.tags {
        let query = apply_sort(args.realtime.apply(TagQuery::default()), args.sort.as_ref())?;
        print_tags(&fred.release_tags(id, &query).await?, format)
    } else {
        let realtime = args.realtime.apply(RealtimeQuery::default());
        print_releases(&[fred.release(id, &realtime).await?], format)
    }
}
