use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use stlouisfed_lib::fraser::{OaiHeader, OaiRecord, OaiSet};
use stlouisfed_lib::types::{
    Category, Observation, RegionalObservation, Release, ReleaseDate, Series, SeriesGroup, Shape, Source, Tag,
    VintageObservation,
};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::xml_output;

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
    Xml,
}

impl OutputFormat {
    pub fn parse(input: &str) -> Self {
        match input {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            "xml" => OutputFormat::Xml,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct SeriesRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Frequency")]
    #[serde(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Units")]
    #[serde(rename = "Units")]
    units: String,
    #[tabled(rename = "Adj.")]
    #[serde(rename = "Adj.")]
    seasonal_adjustment: String,
    #[tabled(rename = "Range")]
    #[serde(rename = "Range")]
    range: String,
    #[tabled(rename = "Last Updated")]
    #[serde(rename = "Last Updated")]
    last_updated: String,
    #[tabled(rename = "Popularity")]
    #[serde(rename = "Popularity")]
    popularity: i64,
}

#[derive(Tabled, Serialize)]
struct ObservationRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
    #[tabled(rename = "Realtime Start")]
    #[serde(rename = "Realtime Start")]
    realtime_start: String,
    #[tabled(rename = "Realtime End")]
    #[serde(rename = "Realtime End")]
    realtime_end: String,
}

#[derive(Tabled, Serialize)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Parent")]
    #[serde(rename = "Parent")]
    parent_id: i64,
}

#[derive(Tabled, Serialize)]
struct ReleaseRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Press Release")]
    #[serde(rename = "Press Release")]
    press_release: bool,
    #[tabled(rename = "Link")]
    #[serde(rename = "Link")]
    link: String,
}

#[derive(Tabled, Serialize)]
struct ReleaseDateRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Release")]
    #[serde(rename = "Release")]
    release_id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    release_name: String,
}

#[derive(Tabled, Serialize)]
struct SourceRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Link")]
    #[serde(rename = "Link")]
    link: String,
}

#[derive(Tabled, Serialize)]
struct TagRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Group")]
    #[serde(rename = "Group")]
    group_id: String,
    #[tabled(rename = "Series")]
    #[serde(rename = "Series")]
    series_count: i64,
    #[tabled(rename = "Popularity")]
    #[serde(rename = "Popularity")]
    popularity: i64,
}

#[derive(Tabled, Serialize)]
struct SeriesGroupRow {
    #[tabled(rename = "Group")]
    #[serde(rename = "Group")]
    series_group: String,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Region")]
    #[serde(rename = "Region")]
    region_type: String,
    #[tabled(rename = "Season")]
    #[serde(rename = "Season")]
    season: String,
    #[tabled(rename = "Frequency")]
    #[serde(rename = "Frequency")]
    frequency: String,
    #[tabled(rename = "Range")]
    #[serde(rename = "Range")]
    range: String,
}

#[derive(Tabled, Serialize)]
struct RegionalRow {
    #[tabled(rename = "Period")]
    #[serde(rename = "Period")]
    year: String,
    #[tabled(rename = "Region")]
    #[serde(rename = "Region")]
    region: String,
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
    #[tabled(rename = "Series")]
    #[serde(rename = "Series")]
    series_id: String,
}

#[derive(Tabled, Serialize)]
struct ShapeRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Centroid")]
    #[serde(rename = "Centroid")]
    centroid: String,
}

#[derive(Tabled, Serialize)]
struct DateRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
}

#[derive(Tabled, Serialize)]
struct OaiHeaderRow {
    #[tabled(rename = "Identifier")]
    #[serde(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Datestamp")]
    #[serde(rename = "Datestamp")]
    datestamp: String,
    #[tabled(rename = "Sets")]
    #[serde(rename = "Sets")]
    sets: String,
    #[tabled(rename = "Deleted")]
    #[serde(rename = "Deleted")]
    deleted: bool,
}

#[derive(Tabled, Serialize)]
struct OaiSetRow {
    #[tabled(rename = "Spec")]
    #[serde(rename = "Spec")]
    spec: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
}

// -- Row builders --

fn build_series_rows(series: &[Series]) -> Vec<SeriesRow> {
    series
        .iter()
        .map(|s| SeriesRow {
            id: s.id.clone(),
            title: s.title.clone(),
            frequency: s.frequency_short.clone(),
            units: s.units_short.clone(),
            seasonal_adjustment: s.seasonal_adjustment_short.clone(),
            range: format!("{} .. {}", s.observation_start, s.observation_end),
            last_updated: s.last_updated.to_rfc3339(),
            popularity: s.popularity,
        })
        .collect()
}

fn build_observation_rows(observations: &[Observation]) -> Vec<ObservationRow> {
    observations
        .iter()
        .map(|o| ObservationRow {
            date: o.date.to_string(),
            value: format_value(o.value),
            realtime_start: o.realtime_start.to_string(),
            realtime_end: o.realtime_end.to_string(),
        })
        .collect()
}

fn build_category_rows(categories: &[Category]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id,
            name: c.name.clone(),
            parent_id: c.parent_id,
        })
        .collect()
}

fn build_release_rows(releases: &[Release]) -> Vec<ReleaseRow> {
    releases
        .iter()
        .map(|r| ReleaseRow {
            id: r.id,
            name: r.name.clone(),
            press_release: r.press_release,
            link: r.link.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_release_date_rows(dates: &[ReleaseDate]) -> Vec<ReleaseDateRow> {
    dates
        .iter()
        .map(|d| ReleaseDateRow {
            date: d.date.to_string(),
            release_id: d.release_id,
            release_name: d.release_name.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_source_rows(sources: &[Source]) -> Vec<SourceRow> {
    sources
        .iter()
        .map(|s| SourceRow {
            id: s.id,
            name: s.name.clone(),
            link: s.link.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_tag_rows(tags: &[Tag]) -> Vec<TagRow> {
    tags.iter()
        .map(|t| TagRow {
            name: t.name.clone(),
            group_id: t.group_id.clone(),
            series_count: t.series_count,
            popularity: t.popularity,
        })
        .collect()
}

fn build_series_group_rows(groups: &[SeriesGroup]) -> Vec<SeriesGroupRow> {
    groups
        .iter()
        .map(|g| SeriesGroupRow {
            series_group: g.series_group.clone(),
            title: g.title.clone(),
            region_type: g.region_type.clone(),
            season: g.season.clone(),
            frequency: g.frequency.clone(),
            range: format!("{} .. {}", g.min_date, g.max_date),
        })
        .collect()
}

fn build_regional_rows(rows: &[RegionalObservation]) -> Vec<RegionalRow> {
    rows.iter()
        .map(|r| RegionalRow {
            year: r.year.to_string(),
            region: r.region.clone(),
            code: r.code.clone(),
            value: format_value(r.value),
            series_id: r.series_id.clone(),
        })
        .collect()
}

fn build_shape_rows(shapes: &[Shape]) -> Vec<ShapeRow> {
    shapes
        .iter()
        .map(|s| ShapeRow {
            name: s.name.clone(),
            code: s.code.clone(),
            centroid: s.centroid.clone(),
        })
        .collect()
}

fn build_date_rows(dates: &[NaiveDate]) -> Vec<DateRow> {
    dates.iter().map(|d| DateRow { date: d.to_string() }).collect()
}

fn build_header_rows(headers: &[OaiHeader]) -> Vec<OaiHeaderRow> {
    headers
        .iter()
        .map(|h| OaiHeaderRow {
            identifier: h.identifier.clone(),
            datestamp: h.datestamp.clone(),
            sets: h.set_specs.join(", "),
            deleted: h.deleted,
        })
        .collect()
}

fn build_set_rows(sets: &[OaiSet]) -> Vec<OaiSetRow> {
    sets.iter()
        .map(|s| OaiSetRow {
            spec: s.spec.clone(),
            name: s.name.clone(),
        })
        .collect()
}

/// Vintage observations have one column per vintage, so the table is built
/// from the union of the vintage names.
fn build_vintage_table(rows: &[VintageObservation]) -> (Vec<String>, Vec<Vec<String>>) {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for name in row.values.keys() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
    }
    columns.sort();

    let records = rows
        .iter()
        .map(|row| {
            let mut record = vec![row.date.to_string()];
            record.extend(
                columns
                    .iter()
                    .map(|c| format_value(row.values.get(c).copied().flatten())),
            );
            record
        })
        .collect();

    let mut header = vec!["Date".to_string()];
    header.extend(columns);
    (header, records)
}

// -- Generic rendering --

fn print_table<R: Tabled>(rows: Vec<R>) {
    println!("{}", Table::new(rows));
}

fn print_markdown<R: Tabled>(rows: Vec<R>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

fn print_csv<R: Serialize>(rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

/// JSON and XML print the full records; the tabular formats print the
/// summary rows.
fn print_records<T: Serialize, R: Tabled + Serialize>(
    records: &[T],
    rows: Vec<R>,
    item_tag: &str,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => print_table(rows),
        OutputFormat::Markdown => print_markdown(rows),
        OutputFormat::Csv => print_csv(&rows)?,
        OutputFormat::Json => print_json(&records),
        OutputFormat::Xml => println!("{}", xml_output::items_to_xml(item_tag, records)?),
    }
    Ok(())
}

pub fn print_series(series: &[Series], format: &OutputFormat) -> Result<()> {
    print_records(series, build_series_rows(series), "series", format)
}

pub fn print_observations(observations: &[Observation], format: &OutputFormat) -> Result<()> {
    print_records(observations, build_observation_rows(observations), "observation", format)
}

pub fn print_categories(categories: &[Category], format: &OutputFormat) -> Result<()> {
    print_records(categories, build_category_rows(categories), "category", format)
}

pub fn print_releases(releases: &[Release], format: &OutputFormat) -> Result<()> {
    print_records(releases, build_release_rows(releases), "release", format)
}

pub fn print_release_dates(dates: &[ReleaseDate], format: &OutputFormat) -> Result<()> {
    print_records(dates, build_release_date_rows(dates), "release_date", format)
}

pub fn print_sources(sources: &[Source], format: &OutputFormat) -> Result<()> {
    print_records(sources, build_source_rows(sources), "source", format)
}

pub fn print_tags(tags: &[Tag], format: &OutputFormat) -> Result<()> {
    print_records(tags, build_tag_rows(tags), "tag", format)
}

pub fn print_series_groups(groups: &[SeriesGroup], format: &OutputFormat) -> Result<()> {
    print_records(groups, build_series_group_rows(groups), "series_group", format)
}

pub fn print_regional(rows: &[RegionalObservation], format: &OutputFormat) -> Result<()> {
    print_records(rows, build_regional_rows(rows), "region", format)
}

pub fn print_shapes(shapes: &[Shape], format: &OutputFormat) -> Result<()> {
    print_records(shapes, build_shape_rows(shapes), "shape", format)
}

pub fn print_dates(dates: &[NaiveDate], format: &OutputFormat) -> Result<()> {
    print_records(dates, build_date_rows(dates), "date", format)
}

pub fn print_oai_headers(headers: &[OaiHeader], format: &OutputFormat) -> Result<()> {
    print_records(headers, build_header_rows(headers), "header", format)
}

pub fn print_oai_sets(sets: &[OaiSet], format: &OutputFormat) -> Result<()> {
    print_records(sets, build_set_rows(sets), "set", format)
}

/// Records print their metadata XML as-is in the tabular formats.
pub fn print_oai_record(record: &OaiRecord, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Xml => println!("{}", xml_output::items_to_xml("record", std::slice::from_ref(record))?),
        _ => {
            print_oai_headers(std::slice::from_ref(&record.header), format)?;
            if let Some(metadata) = &record.metadata {
                println!("{}", metadata);
            }
        }
    }
    Ok(())
}

/// Tabular formats list the headers only; metadata needs JSON or XML.
pub fn print_oai_records(records: &[OaiRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Xml => println!("{}", xml_output::items_to_xml("record", records)?),
        _ => {
            let headers: Vec<OaiHeader> = records.iter().map(|r| r.header.clone()).collect();
            print_oai_headers(&headers, format)?;
        }
    }
    Ok(())
}

pub fn print_vintage_observations(rows: &[VintageObservation], format: &OutputFormat) -> Result<()> {
    let (header, records) = build_vintage_table(rows);
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Xml => println!("{}", xml_output::items_to_xml("observation", rows)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(&header)?;
            for record in &records {
                wtr.write_record(record)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            let mut builder = Builder::default();
            builder.push_record(header);
            for record in records {
                builder.push_record(record);
            }
            let mut table = builder.build();
            if *format == OutputFormat::Markdown {
                table.with(Style::markdown());
            }
            println!("{}", table);
        }
    }
    Ok(())
}

/// FRED writes missing values as "."; so do we.
fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => ".".to_string(),
    }
}
