//! CSV readers and writers for wide exports and long-format tables
//!
//! Headers are matched after trimming and case-folding, so `" Sex "` and
//! `"sex"` both resolve to the sex column. Every schema error names the
//! offending column or cell.

use crate::age_group::AgeGroup;
use crate::config::CsvOptions;
use crate::error::{CoreError, CoreResult};
use crate::metric::{PERCENTAGE_ALIASES, PERCENTAGE_COLUMN};
use crate::pyramid::Pyramid;
use crate::sex::Sex;
use crate::table::{PopulationTable, RowKey};
use csv::StringRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Header spellings of the year column
const YEAR_HEADERS: [&str; 1] = ["year"];

/// Header spellings of the age-group column
const AGE_HEADERS: [&str; 3] = ["age group", "agegroup", "age"];

/// Header spellings of the sex column
const SEX_HEADERS: [&str; 1] = ["sex"];

/// Header written for the age-group column
pub const AGE_GROUP_HEADER: &str = "AgeGroup";

/// One row of a wide export, labels still raw
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub sex: String,
    pub age: String,
    /// One value per entry of [`WideTable::years`]
    pub values: Vec<Option<f64>>,
}

/// Wide export: rows keyed by (Sex, Age) with one column per year
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WideTable {
    pub years: Vec<i32>,
    pub rows: Vec<WideRow>,
}

/// One row of a long file, labels still raw
#[derive(Debug, Clone, PartialEq)]
pub struct RawLongRow {
    pub year: i32,
    pub age: String,
    pub sex: String,
    pub values: Vec<Option<f64>>,
}

/// Long file with raw labels, before canonicalization
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawLongTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawLongRow>,
}

/// Open a file for reading with path context on failure
pub fn open_file(path: &Path) -> CoreResult<File> {
    File::open(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// Create a file for writing with path context on failure
pub fn create_file(path: &Path) -> CoreResult<File> {
    File::create(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a wide export.
///
/// Requires a sex and an age column; every header that parses as an
/// integer is taken as a year column, anything else is ignored.
pub fn read_wide<R: Read>(reader: R, source: &str) -> CoreResult<WideTable> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let sex_col = find_column(&headers, &SEX_HEADERS, "Sex", source)?;
    let age_col = find_column(&headers, &AGE_HEADERS, "Age", source)?;
    let year_cols: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != sex_col && *i != age_col)
        .filter_map(|(i, h)| parse_year(h).map(|y| (i, y)))
        .collect();

    if year_cols.is_empty() {
        return Err(CoreError::MissingColumn {
            column: "<year>".to_string(),
            path: source.to_string(),
        });
    }

    let options = CsvOptions::default();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record_line(&record);
        let values = year_cols
            .iter()
            .map(|(i, year)| {
                parse_value(record.get(*i).unwrap_or(""), &year.to_string(), line, &options)
            })
            .collect::<CoreResult<Vec<_>>>()?;
        rows.push(WideRow {
            sex: record.get(sex_col).unwrap_or("").to_string(),
            age: record.get(age_col).unwrap_or("").to_string(),
            values,
        });
    }

    log::debug!(
        "Read wide export {source}: {} rows x {} year columns",
        rows.len(),
        year_cols.len()
    );

    Ok(WideTable {
        years: year_cols.into_iter().map(|(_, y)| y).collect(),
        rows,
    })
}

/// Read a long file without interpreting its labels.
///
/// Every column other than year, age group and sex is a metric column.
pub fn read_long<R: Read>(
    reader: R,
    source: &str,
    options: &CsvOptions,
) -> CoreResult<RawLongTable> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();

    let year_col = find_column(&headers, &YEAR_HEADERS, "Year", source)?;
    let age_col = find_column(&headers, &AGE_HEADERS, AGE_GROUP_HEADER, source)?;
    let sex_col = find_column(&headers, &SEX_HEADERS, "Sex", source)?;

    let metric_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| ![year_col, age_col, sex_col].contains(i))
        .map(|(i, h)| (i, canonical_metric_header(h)))
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record_line(&record);
        let raw_year = record.get(year_col).unwrap_or("");
        let year = parse_year(raw_year).ok_or_else(|| CoreError::InvalidYear {
            value: raw_year.to_string(),
            line,
        })?;
        let values = metric_cols
            .iter()
            .map(|(i, name)| parse_value(record.get(*i).unwrap_or(""), name, line, options))
            .collect::<CoreResult<Vec<_>>>()?;
        rows.push(RawLongRow {
            year,
            age: record.get(age_col).unwrap_or("").to_string(),
            sex: record.get(sex_col).unwrap_or("").to_string(),
            values,
        });
    }

    Ok(RawLongTable {
        columns: metric_cols.into_iter().map(|(_, name)| name).collect(),
        rows,
    })
}

/// Read a canonical long table.
///
/// Labels must already be canonical buckets and sexes; the constituent
/// `100-104` / `105 & over` buckets are rejected here.
pub fn read_table<R: Read>(
    reader: R,
    source: &str,
    options: &CsvOptions,
) -> CoreResult<PopulationTable> {
    let raw = read_long(reader, source, options)?;
    let mut table = PopulationTable::new(raw.columns);
    for row in raw.rows {
        let key = RowKey::new(row.year, AgeGroup::parse(&row.age)?, Sex::parse(&row.sex)?);
        table.push(key, row.values)?;
    }
    Ok(table)
}

/// Read a canonical long table from a file
pub fn read_table_path(path: &Path, options: &CsvOptions) -> CoreResult<PopulationTable> {
    let file = open_file(path)?;
    read_table(file, &path.display().to_string(), options)
}

/// Write a table as `Year,AgeGroup,Sex,<metric columns>`
pub fn write_table<W: Write>(
    table: &PopulationTable,
    writer: W,
    options: &CsvOptions,
) -> CoreResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Year", AGE_GROUP_HEADER, "Sex"];
    header.extend(table.columns().iter().map(String::as_str));
    wtr.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![
            row.key.year.to_string(),
            row.key.age_group.label().to_string(),
            row.key.sex.label().to_string(),
        ];
        record.extend(row.values.iter().map(|v| format_value(*v, options)));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a table to a file
pub fn write_table_path(
    table: &PopulationTable,
    path: &Path,
    options: &CsvOptions,
) -> CoreResult<()> {
    let file = create_file(path)?;
    write_table(table, file, options)
}

/// Write pyramid bars as `Year,AgeGroup,Sex,Side,Value`.
///
/// Undefined values are written as empty cells.
pub fn write_pyramid<W: Write>(pyramid: &Pyramid, writer: W) -> CoreResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for bar in &pyramid.bars {
        wtr.serialize(bar)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a cell; `None` becomes the undefined marker
pub fn format_value(value: Option<f64>, options: &CsvOptions) -> String {
    match value {
        Some(v) => v.to_string(),
        None => options.undefined_marker.clone(),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader)
}

fn find_column(
    headers: &StringRecord,
    aliases: &[&str],
    display: &str,
    source: &str,
) -> CoreResult<usize> {
    headers
        .iter()
        .position(|h| {
            let h = h.trim().to_lowercase();
            aliases.contains(&h.as_str())
        })
        .ok_or_else(|| CoreError::MissingColumn {
            column: display.to_string(),
            path: source.to_string(),
        })
}

fn canonical_metric_header(header: &str) -> String {
    let trimmed = header.trim();
    if PERCENTAGE_ALIASES.contains(&trimmed) {
        PERCENTAGE_COLUMN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse a year cell or header; `"2022"` and `"2022.0"` both parse
fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && f.abs() < i32::MAX as f64)
            .map(|f| f as i32)
    })
}

fn parse_value(
    raw: &str,
    column: &str,
    line: u64,
    options: &CsvOptions,
) -> CoreResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || (!options.undefined_marker.is_empty() && trimmed == options.undefined_marker.trim())
    {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
        .ok_or_else(|| CoreError::InvalidNumber {
            column: column.to_string(),
            value: raw.to_string(),
            line,
        })
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

#[cfg(test)]
#[path = "csv_io_test.rs"]
mod tests;
