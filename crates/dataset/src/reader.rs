//! Numeric CSV reading.
//!
//! Two flavours:
//!
//! - [`read_csv`]: headerless, every field is a number. Used for sample
//!   feature and label files.
//! - [`read_csv_columns`]: first row is headers, values are grouped per column.
//!   Used for exported indicator/prediction tables.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error::CsvError;

fn open(path: &Path, has_headers: bool) -> Result<Reader<File>, CsvError> {
    let file = File::open(path).map_err(|source| CsvError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file))
}

fn parse_field(path: &Path, record: &StringRecord, field: &str) -> Result<f64, CsvError> {
    field.parse::<f64>().map_err(|_| CsvError::Parse {
        path: path.to_path_buf(),
        line: record.position().map(|p| p.line()).unwrap_or(0),
        field: field.to_string(),
    })
}

/// Read a headerless CSV file into rows of floats, in file order.
///
/// # Errors
/// [`CsvError::Io`] if the file cannot be opened, [`CsvError::Parse`] if any
/// field is not a number.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>, CsvError> {
    let path = path.as_ref();
    let mut reader = open(path, false)?;
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|source| CsvError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        let row = record
            .iter()
            .map(|field| parse_field(path, &record, field))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(rows)
}

/// Columns of a headed CSV file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns {
    names: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl Columns {
    /// Header names in file order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values of the column with the given header.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i].as_slice())
    }

    /// Iterate `(header, values)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .zip(&self.values)
            .map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Read a CSV file whose first row holds column headers.
///
/// Each data row is zipped against the headers: extra trailing fields are
/// ignored and short rows leave the missing columns shorter.
pub fn read_csv_columns<P: AsRef<Path>>(path: P) -> Result<Columns, CsvError> {
    let path = path.as_ref();
    let mut reader = open(path, true)?;

    let names: Vec<String> = reader
        .headers()
        .map_err(|source| CsvError::Format {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(str::to_string)
        .collect();
    let mut values = vec![Vec::new(); names.len()];

    for record in reader.records() {
        let record = record.map_err(|source| CsvError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        for (column, field) in values.iter_mut().zip(record.iter()) {
            column.push(parse_field(path, &record, field)?);
        }
    }

    Ok(Columns { names, values })
}
