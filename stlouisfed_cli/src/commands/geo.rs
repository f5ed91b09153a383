use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use stlouisfed_lib::stlouisfed_api::RegionalDataQuery;
use stlouisfed_lib::types::{AggregationMethod, Frequency, RegionType, Seasonality, ShapeType, Unit};
use stlouisfed_lib::GeoFred;

use super::{parse_enum, parse_opt};
use crate::output::{print_regional, print_series_groups, print_shapes, OutputFormat};

#[derive(Args)]
pub struct GeoArgs {
    #[command(subcommand)]
    pub command: GeoCommand,
}

#[derive(Subcommand)]
pub enum GeoCommand {
    /// Show the series group a series belongs to
    Group {
        series_id: String,
    },
    /// Regional cross section for a series
    Data {
        series_id: String,

        /// Observation date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// First date of the range (YYYY-MM-DD, default today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },
    /// Regional data by series group
    Regional {
        /// Series group ID
        series_group: String,

        /// Region type: bea, msa, frb, necta, state, country, county, censusregion, censusdivision
        #[arg(long)]
        region_type: String,

        /// Observation date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Seasonality: SA, NSA, SSA
        #[arg(long, default_value = "NSA")]
        season: String,

        /// Units of the series group
        #[arg(long)]
        units: Option<String>,

        /// First date of the range (YYYY-MM-DD, default today)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Frequency: d, w, m, q, sa, a
        #[arg(long)]
        frequency: Option<String>,

        /// Transformation: lin, chg, ch1, pch, pc1, pca, cch, cca, log
        #[arg(long)]
        transformation: Option<String>,

        /// Aggregation method: avg, sum, eop
        #[arg(long)]
        aggregation: Option<String>,
    },
    /// List region shapes
    Shapes {
        /// Shape type: bea, msa, frb, necta, state, country, county, censusregion, censusdivision
        shape: String,
    },
}

pub async fn run(args: &GeoArgs, geo: &GeoFred, format: &OutputFormat) -> Result<()> {
    match &args.command {
        GeoCommand::Group { series_id } => {
            let group = geo.series_group(series_id).await?;
            print_series_groups(&[group], format)
        }
        GeoCommand::Data {
            series_id,
            date,
            start_date,
        } => {
            let rows = geo.series_data(series_id, *date, *start_date).await?;
            eprintln!("{} regional observations", rows.len());
            print_regional(&rows, format)
        }
        GeoCommand::Regional {
            series_group,
            region_type,
            date,
            season,
            units,
            start_date,
            frequency,
            transformation,
            aggregation,
        } => {
            let mut query = RegionalDataQuery::new(
                series_group,
                parse_enum::<RegionType>(region_type)?,
                *date,
                parse_enum::<Seasonality>(season)?,
            );
            if let Some(units) = units {
                query = query.with_units(units);
            }
            if let Some(start) = start_date {
                query = query.with_start_date(*start);
            }
            if let Some(frequency) = parse_opt::<Frequency>(frequency.as_ref())? {
                query = query.with_frequency(frequency);
            }
            if let Some(transformation) = parse_opt::<Unit>(transformation.as_ref())? {
                query = query.with_transformation(transformation);
            }
            if let Some(method) = parse_opt::<AggregationMethod>(aggregation.as_ref())? {
                query = query.with_aggregation_method(method);
            }
            let rows = geo.regional_data(&query).await?;
            eprintln!("{} regional observations", rows.len());
            print_regional(&rows, format)
        }
        GeoCommand::Shapes { shape } => {
            let shapes = geo.shapes(parse_enum::<ShapeType>(shape)?).await?;
            eprintln!("{} shapes", shapes.len());
            print_shapes(&shapes, format)
        }
    }
}
