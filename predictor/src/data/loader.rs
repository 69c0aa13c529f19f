use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{Column, ColumnMap, Table, sample_table};
use crate::{PredictorError, Result, configs::SourceConfig};

/// Loads the property table from `source`.
///
/// Remote sources are fetched with a single blocking GET, there are no retries.
///
/// # Errors
/// Fetch, I/O and CSV errors, a missing neighborhood/area/price column, or invalid cells.
pub fn load(source: &SourceConfig) -> Result<Table> {
    source.validate()?;
    log::info!("loading table from {source}");

    let table = match source {
        SourceConfig::Embedded => sample_table()?,
        SourceConfig::Local { path } => load_file(path)?,
        SourceConfig::Remote { url } => {
            let body = fetch(url)?;
            read_csv(body.as_bytes(), url)?
        }
    };

    log::info!("loaded {} rows from {source}", table.len());
    Ok(table)
}

fn load_file(path: &Path) -> Result<Table> {
    let file = File::open(path).map_err(|source| PredictorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_csv(file, &path.display().to_string())
}

fn fetch(url: &str) -> Result<String> {
    let fetch_err = |e: reqwest::Error| PredictorError::Fetch {
        origin: url.to_string(),
        reason: e.to_string(),
    };

    let response = reqwest::blocking::get(url).map_err(fetch_err)?;
    log::debug!("{url} answered {}", response.status());
    response
        .error_for_status()
        .map_err(fetch_err)?
        .text()
        .map_err(fetch_err)
}

/// Parses a CSV table with a header row.
///
/// Headers are matched against the column synonyms; neighborhood, area and price are required,
/// classification and property type are kept when present and unrecognized columns are ignored.
/// Numbers may carry thousands separators (`"300,000"`).
///
/// # Arguments
/// * `reader` - The CSV bytes.
/// * `origin` - A name for the source, used in error messages.
pub fn read_csv<R: Read>(reader: R, origin: &str) -> Result<Table> {
    let malformed = |e: csv::Error| PredictorError::Malformed {
        origin: origin.to_string(),
        reason: e.to_string(),
    };

    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = reader.headers().map_err(malformed)?.clone();
    let map = ColumnMap::from_headers(headers.iter());
    if let Some(column) = map.first_missing() {
        return Err(PredictorError::MissingColumn {
            column,
            accepted: column.synonyms(),
        });
    }

    let mut columns = RawColumns::new(&map);
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(malformed)?;
        columns.push(&map, &record, idx + 1)?;
    }

    if columns.len == 0 {
        return Err(PredictorError::EmptyTable {
            origin: origin.to_string(),
        });
    }

    columns.build()
}

#[derive(Default)]
struct RawColumns {
    len: usize,
    neighborhoods: Vec<String>,
    areas: Vec<f64>,
    prices: Vec<f64>,
    classifications: Option<Vec<String>>,
    property_types: Option<Vec<String>>,
}

impl RawColumns {
    fn new(map: &ColumnMap) -> Self {
        Self {
            classifications: map.get(Column::Classification).map(|_| Vec::new()),
            property_types: map.get(Column::PropertyType).map(|_| Vec::new()),
            ..Self::default()
        }
    }

    fn push(&mut self, map: &ColumnMap, record: &StringRecord, row: usize) -> Result<()> {
        let cell = |column: Column| {
            map.get(column)
                .and_then(|idx| record.get(idx))
                .unwrap_or_default()
        };

        let neighborhood = cell(Column::Neighborhood);
        if neighborhood.is_empty() {
            return Err(PredictorError::InvalidCell {
                row,
                column: Column::Neighborhood,
                value: String::new(),
            });
        }

        self.neighborhoods.push(neighborhood.to_string());
        self.areas.push(parse_number(cell(Column::Area), Column::Area, row)?);
        self.prices.push(parse_number(cell(Column::Price), Column::Price, row)?);
        if let Some(values) = &mut self.classifications {
            values.push(cell(Column::Classification).to_string());
        }
        if let Some(values) = &mut self.property_types {
            values.push(cell(Column::PropertyType).to_string());
        }

        self.len += 1;
        Ok(())
    }

    fn build(self) -> Result<Table> {
        let mut builder = Table::builder()
            .neighborhoods(self.neighborhoods)
            .areas(self.areas)
            .prices(self.prices);

        if let Some(values) = self.classifications {
            builder = builder.classifications(values);
        }
        if let Some(values) = self.property_types {
            builder = builder.property_types(values);
        }

        builder.build()
    }
}

/// Parses a numeric cell. Commas are only accepted as thousands separators, so a decimal
/// comma (`"1,5"`) is rejected rather than read as `15`.
fn parse_number(raw: &str, column: Column, row: usize) -> Result<f64> {
    let invalid = || PredictorError::InvalidCell {
        row,
        column,
        value: raw.to_string(),
    };

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = if compact.contains(',') {
        strip_thousands(&compact).ok_or_else(invalid)?
    } else {
        compact
    };

    digits.parse::<f64>().map_err(|_| invalid())
}

/// Removes the separators of `1,234,567.5`, `None` unless every group after the first has
/// exactly three digits.
fn strip_thousands(s: &str) -> Option<String> {
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (s, ""),
    };
    if frac.contains(',') {
        return None;
    }

    let unsigned = int.strip_prefix(['-', '+']).unwrap_or(int);
    let is_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());
    let mut groups = unsigned.split(',');
    let head = groups.next()?;
    let valid = (1..=3).contains(&head.len())
        && is_digits(head)
        && groups.all(|group| group.len() == 3 && is_digits(group));

    valid.then(|| s.replace(',', ""))
}
