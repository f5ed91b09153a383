use anyhow::Result;
use clap::{Args, Subcommand};
use stlouisfed_lib::Fraser;

use crate::output::{print_oai_headers, print_oai_record, print_oai_records, print_oai_sets, OutputFormat};

#[derive(Args)]
pub struct FraserArgs {
    #[command(subcommand)]
    pub command: FraserCommand,
}

#[derive(Subcommand)]
pub enum FraserCommand {
    /// List the sets of the repository
    Sets,
    /// List record headers
    Identifiers {
        /// Restrict to one set, e.g. "title" or "theme:11"
        #[arg(long)]
        set: Option<String>,

        /// Skip deleted records
        #[arg(long)]
        ignore_deleted: bool,

        /// Pages to harvest; 0 harvests everything
        #[arg(long, default_value = "1")]
        max_pages: usize,
    },
    /// List full records (headers and MODS metadata)
    Records {
        #[arg(long)]
        set: Option<String>,

        #[arg(long)]
        ignore_deleted: bool,

        #[arg(long, default_value = "1")]
        max_pages: usize,
    },
    /// Show one record
    Record {
        /// OAI identifier, e.g. oai:fraser.stlouisfed.org:title:176
        identifier: String,
    },
}

fn limit_pages(fraser: &Fraser, max_pages: usize) -> Fraser {
    match max_pages {
        0 => fraser.clone(),
        n => fraser.clone().with_max_pages(n),
    }
}

pub async fn run(args: &FraserArgs, fraser: &Fraser, format: &OutputFormat) -> Result<()> {
    match &args.command {
        FraserCommand::Sets => {
            let sets = fraser.list_sets().await?;
            eprintln!("{} sets", sets.len());
            print_oai_sets(&sets, format)
        }
        FraserCommand::Identifiers {
            set,
            ignore_deleted,
            max_pages,
        } => {
            let headers = limit_pages(fraser, *max_pages)
                .list_identifiers(set.as_deref(), *ignore_deleted)
                .await?;
            eprintln!("{} identifiers", headers.len());
            print_oai_headers(&headers, format)
        }
        FraserCommand::Records {
            set,
            ignore_deleted,
            max_pages,
        } => {
            let records = limit_pages(fraser, *max_pages)
                .list_records(set.as_deref(), *ignore_deleted)
                .await?;
            eprintln!("{} records", records.len());
            print_oai_records(&records, format)
        }
        FraserCommand::Record { identifier } => {
            let record = fraser.get_record(identifier).await?;
            print_oai_record(&record, format)
        }
    }
}
