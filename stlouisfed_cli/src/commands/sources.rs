use anyhow::Result;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::{ListQuery, RealtimeQuery};
use stlouisfed_lib::Fred;

use super::{apply_sort, RealtimeArgs};
use crate::output::{print_releases, print_sources, OutputFormat};

#[derive(Args)]
pub struct SourcesArgs {
    /// Show a single source by ID
    #[arg(long)]
    pub id: Option<i64>,

    /// List the releases of the source (requires --id)
    #[arg(long, requires = "id")]
    pub releases: bool,

    /// Sort order for lists: asc, desc
    #[arg(long)]
    pub sort: Option<String>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,
}

pub async fn run(args: &SourcesArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    match args.id {
        Some(id) if args.releases => {
            let query = apply_sort(args.realtime.apply(ListQuery::default()), args.sort.as_ref())?;
            print_releases(&fred.source_releases(id, &query).await?, format)
        }
        Some(id) => {
            let realtime = args.realtime.apply(RealtimeQuery::default());
            print_sources(&[fred.source(id, &realtime).await?], format)
        }
        None => {
            let query = apply_sort(args.realtime.apply(ListQuery::default()), args.sort.as_ref())?;
            let sources = fred.sources(&query).await?;
            eprintln!("{} sources", sources.len());
            print_sources(&sources, format)
        }
    }
}
