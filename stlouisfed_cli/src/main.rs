mod commands;
mod output;
mod xml_output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stlouisfed_lib::stlouisfed_api::{CancellationToken, ClientConfig};
use stlouisfed_lib::{Fraser, Fred, GeoFred};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stlouisfed")]
#[command(about = "Query FRED, ALFRED, GeoFRED and FRASER from the St. Louis Fed")]
struct Cli {
    /// Output format: table, json, csv, markdown, xml
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a series and its categories, release, tags or vintage dates
    Series(commands::series::SeriesArgs),
    /// Fetch observations (ALFRED vintages with --output-type all|new_and_revised)
    Observations(Box<commands::observations::ObservationsArgs>),
    /// Search series by text or ID
    Search(commands::search::SearchArgs),
    /// Browse the category tree
    Category(commands::category::CategoryArgs),
    /// List releases and release dates
    Releases(commands::releases::ReleasesArgs),
    /// List data sources
    Sources(commands::sources::SourcesArgs),
    /// List tags, related tags and tagged series
    Tags(commands::tags::TagsArgs),
    /// GeoFRED regional data and shapes
    Geo(commands::geo::GeoArgs),
    /// Harvest the FRASER digital library
    Fraser(commands::fraser::FraserArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("stlouisfed=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted, cancelling requests");
            on_interrupt.cancel();
        }
    });

    let fred = || -> Result<Fred> { Ok(Fred::from_env()?.with_cancellation(cancel.clone())) };

    match &cli.command {
        Commands::Series(args) => commands::series::run(args, &fred()?, &format).await?,
        Commands::Observations(args) => commands::observations::run(args.as_ref(), &fred()?, &format).await?,
        Commands::Search(args) => commands::search::run(args, &fred()?, &format).await?,
        Commands::Category(args) => commands::category::run(args, &fred()?, &format).await?,
        Commands::Releases(args) => commands::releases::run(args, &fred()?, &format).await?,
        Commands::Sources(args) => commands::sources::run(args, &fred()?, &format).await?,
        Commands::Tags(args) => commands::tags::run(args, &fred()?, &format).await?,
        Commands::Geo(args) => {
            let geo = GeoFred::with_config(ClientConfig::from_env()?.without_rate_limit())?
                .with_cancellation(cancel.clone());
            commands::geo::run(args, &geo, &format).await?
        }
        Commands::Fraser(args) => {
            let fraser = Fraser::new()?.with_cancellation(cancel.clone());
            commands::fraser::run(args, &fraser, &format).await?
        }
    }

    Ok(())
}
