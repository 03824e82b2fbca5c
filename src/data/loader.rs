//! CSV Data Loader Module
//! Reads the accident CSV with Polars and turns its columns into typed raw records.

use crate::data::record::RawRecord;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Source column names, in the order the file normally carries them.
pub const COL_COUNTRY: &str = "Country/Region";
pub const COL_OPERATOR: &str = "Operator";
pub const COL_MANUFACTURER: &str = "Aircraft Manufacturer";
pub const COL_AIRCRAFT: &str = "Aircraft";
pub const COL_LOCATION: &str = "Location";
pub const COL_QUARTER: &str = "Quarter";
pub const COL_MONTH: &str = "Month";
pub const COL_YEAR: &str = "Year";
pub const COL_GROUND: &str = "Ground";
pub const COL_FATALITIES: &str = "Fatalities (air)";
pub const COL_ABOARD: &str = "Aboard";

pub const REQUIRED_COLUMNS: [&str; 11] = [
    COL_COUNTRY,
    COL_OPERATOR,
    COL_MANUFACTURER,
    COL_AIRCRAFT,
    COL_LOCATION,
    COL_QUARTER,
    COL_MONTH,
    COL_YEAR,
    COL_GROUND,
    COL_FATALITIES,
    COL_ABOARD,
];

/// The file could not be read as a table.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read CSV '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Failed to parse CSV '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("CSV '{0}' is empty, expected a header row")]
    Empty(PathBuf),
    #[error("Malformed CSV '{path}': line {line} has {found} fields, expected {expected}")]
    Malformed {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// The table was read but does not have the expected shape.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Column '{column}' has incompatible type {dtype}")]
    IncompatibleType { column: String, dtype: String },
    #[error("Column '{column}' has no value at row {row}")]
    MissingValue { column: String, row: usize },
}

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load the accident CSV into raw records, one per row.
    pub fn load_csv(path: &Path) -> Result<Vec<RawRecord>, LoaderError> {
        if !path.exists() {
            return Err(DataLoadError::NotFound(path.to_path_buf()).into());
        }

        // Polars pads short rows with nulls, so the row shape is checked up front
        let (headers, rows) = Self::check_shape(path)?;
        if rows == 0 {
            for name in REQUIRED_COLUMNS {
                if !headers.iter().any(|h| h == name) {
                    return Err(SchemaError::MissingColumn(name.to_string()).into());
                }
            }
            info!(path = %path.display(), "CSV has a header but no rows");
            return Ok(Vec::new());
        }

        let unreadable = |source: PolarsError| DataLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        // The reader owns the file handle only until collect() returns
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()
            .map_err(unreadable)?
            .collect()
            .map_err(unreadable)?;

        info!(path = %path.display(), rows = df.height(), columns = df.width(), "CSV loaded");
        Self::records_from_dataframe(&df)
    }

    /// Stream the file once and require every row to have as many fields as the header.
    /// Returns the header names and the number of data rows.
    fn check_shape(path: &Path) -> Result<(Vec<String>, usize), DataLoadError> {
        let parse_error = |source: csv::Error| {
            if let csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } = source.kind()
            {
                return DataLoadError::Malformed {
                    path: path.to_path_buf(),
                    line: pos.as_ref().map_or(0, |p| p.line() as usize),
                    expected: *expected_len as usize,
                    found: *len as usize,
                };
            }
            DataLoadError::Parse {
                path: path.to_path_buf(),
                source,
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(path)
            .map_err(parse_error)?;

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(parse_error)?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();
        if headers.is_empty() {
            return Err(DataLoadError::Empty(path.to_path_buf()));
        }

        let mut rows = 0;
        let mut record = csv::ByteRecord::new();
        while reader.read_byte_record(&mut record).map_err(parse_error)? {
            rows += 1;
        }

        debug!(path = %path.display(), columns = headers.len(), rows, "CSV shape checked");
        Ok((headers, rows))
    }

    /// Convert a loaded DataFrame into typed raw records.
    pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<RawRecord>, LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(SchemaError::MissingColumn(name.to_string()).into());
            }
        }

        let country = Self::text_column(df, COL_COUNTRY)?;
        let operator = Self::text_column(df, COL_OPERATOR)?;
        let manufacturer = Self::text_column(df, COL_MANUFACTURER)?;
        let aircraft = Self::text_column(df, COL_AIRCRAFT)?;
        let location = Self::text_column(df, COL_LOCATION)?;
        let quarter = Self::text_column(df, COL_QUARTER)?;
        let month = Self::text_column(df, COL_MONTH)?;
        let year = Self::year_column(df)?;
        let ground = Self::numeric_column(df, COL_GROUND)?;
        let fatalities = Self::numeric_column(df, COL_FATALITIES)?;
        let aboard = Self::numeric_column(df, COL_ABOARD)?;

        let records = (0..df.height())
            .map(|i| RawRecord {
                country_region: country[i].clone(),
                operator: operator[i].clone(),
                aircraft_manufacturer: manufacturer[i].clone(),
                aircraft: aircraft[i].clone(),
                location: location[i].clone(),
                quarter: quarter[i].clone(),
                month: month[i].clone(),
                year: year[i],
                ground: ground[i],
                fatalities_air: fatalities[i],
                aboard: aboard[i],
            })
            .collect::<Vec<_>>();

        debug!(records = records.len(), "Raw records built");
        Ok(records)
    }

    fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, SchemaError> {
        df.column(name)
            .map(|col| col.as_materialized_series())
            .map_err(|_| SchemaError::MissingColumn(name.to_string()))
    }

    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    fn incompatible(name: &str, dtype: &DataType) -> SchemaError {
        SchemaError::IncompatibleType {
            column: name.to_string(),
            dtype: dtype.to_string(),
        }
    }

    /// Any dtype can be read as text; numbers and booleans are rendered as strings.
    fn text_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, SchemaError> {
        let series = Self::series(df, name)?;
        let text = series
            .cast(&DataType::String)
            .map_err(|_| Self::incompatible(name, series.dtype()))?;
        let ca = text
            .str()
            .map_err(|_| Self::incompatible(name, series.dtype()))?;
        Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
    }

    /// Numeric columns accept numeric dtypes, all-null columns, or strings that all parse as numbers.
    fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, SchemaError> {
        let series = Self::series(df, name)?;
        let dtype = series.dtype();
        let cast = match dtype {
            d if Self::is_numeric(d) => series.cast(&DataType::Float64),
            DataType::String | DataType::Null => series.strict_cast(&DataType::Float64),
            other => return Err(Self::incompatible(name, other)),
        }
        .map_err(|_| Self::incompatible(name, dtype))?;
        let ca = cast.f64().map_err(|_| Self::incompatible(name, dtype))?;
        Ok(ca.into_iter().collect())
    }

    /// Year is the filter and grouping key, so every row must carry one.
    fn year_column(df: &DataFrame) -> Result<Vec<i32>, SchemaError> {
        let values = Self::numeric_column(df, COL_YEAR)?;
        values
            .into_iter()
            .enumerate()
            .map(|(row, v)| match v {
                Some(y) if y.fract() == 0.0 && y.abs() <= i32::MAX as f64 => Ok(y as i32),
                Some(_) => Err(Self::incompatible(COL_YEAR, &DataType::Float64)),
                None => Err(SchemaError::MissingValue {
                    column: COL_YEAR.to_string(),
                    row,
                }),
            })
            .collect()
    }
}
