use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use stlouisfed_lib::stlouisfed_api::ObservationQuery;
use stlouisfed_lib::types::{AggregationMethod, Frequency, OutputType, Unit};
use stlouisfed_lib::Fred;

use super::{apply_sort, parse_opt, RealtimeArgs};
use crate::output::{print_observations, print_vintage_observations, OutputFormat};

#[derive(Args)]
pub struct ObservationsArgs {
    /// Series ID (e.g. GNPCA)
    pub series_id: String,

    /// First observation date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last observation date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Transformation: lin, chg, ch1, pch, pc1, pca, cch, cca, log
    #[arg(long)]
    pub units: Option<String>,

    /// Aggregate to a lower frequency: d, w, bw, m, q, sa, a, ...
    #[arg(long)]
    pub frequency: Option<String>,

    /// Aggregation method with --frequency: avg, sum, eop
    #[arg(long)]
    pub aggregation: Option<String>,

    /// 1 (realtime_period), 2 (all), 3 (new_and_revised), 4 (initial_release_only)
    #[arg(long)]
    pub output_type: Option<String>,

    /// Comma-separated vintage dates (YYYY-MM-DD)
    #[arg(long, value_delimiter = ',')]
    pub vintage_dates: Vec<NaiveDate>,

    #[command(flatten)]
    pub realtime: RealtimeArgs,

    /// Sort order: asc, desc
    #[arg(long)]
    pub sort: Option<String>,
}

pub async fn run(args: &ObservationsArgs, fred: &Fred, format: &OutputFormat) -> Result<()> {
    let mut query = args.realtime.apply(ObservationQuery::default());
    query = apply_sort(query, args.sort.as_ref())?;
    if let Some(start) = args.start {
        query = query.with_observation_start(start);
    }
    if let Some(end) = args.end {
        query = query.with_observation_end(end);
    }
    if let Some(units) = parse_opt::<Unit>(args.units.as_ref())? {
        query = query.with_units(units);
    }
    if let Some(frequency) = parse_opt::<Frequency>(args.frequency.as_ref())? {
        query = query.with_frequency(frequency);
    }
    if let Some(method) = parse_opt::<AggregationMethod>(args.aggregation.as_ref())? {
        query = query.with_aggregation_method(method);
    }
    query = query.with_vintage_dates(&args.vintage_dates);

    match parse_opt::<OutputType>(args.output_type.as_ref())? {
        Some(output_type @ (OutputType::All | OutputType::NewAndRevised)) => {
            let rows = fred
                .series_vintage_observations(&args.series_id, &query.with_output_type(output_type))
                .await?;
            eprintln!("{} observation dates", rows.len());
            print_vintage_observations(&rows, format)
        }
        output_type => {
            if let Some(output_type) = output_type {
                query = query.with_output_type(output_type);
            }
            let observations = fred.series_observations(&args.series_id, &query).await?;
            eprintln!("{} observations", observations.len());
            print_observations(&observations, format)
        }
    }
}
