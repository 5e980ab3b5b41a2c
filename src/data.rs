//! Per-copy data records read from a delimited table
//!
//! Each row of the table supplies the text for one copy-set of the template.
//! There is no header row: fields are addressed by position, 1-based, from
//! `txt_<N>` labels in the template.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading the data table
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to open data file '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read data table: {0}")]
    Csv(#[from] csv::Error),

    #[error("delimiter must be a single ASCII character, got '{0}'")]
    InvalidDelimiter(char),
}

/// One row of the input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    fields: Vec<String>,
}

impl DataRecord {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Field by 1-based index, as referenced from a label
    pub fn field(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DataRecord {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Table reader configuration
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Field delimiter
    pub delimiter: char,
    /// Whether to trim whitespace around fields
    pub trim: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            trim: false,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    fn delimiter_byte(&self) -> Result<u8, DataError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(DataError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// Read every record from a table file. The file is closed on return.
pub fn read_records(path: impl AsRef<Path>, config: &TableConfig) -> Result<Vec<DataRecord>, DataError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(file, config)
}

/// Read every record from any reader
pub fn parse_records<R: Read>(reader: R, config: &TableConfig) -> Result<Vec<DataRecord>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(config.delimiter_byte()?)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(row.iter().collect());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_is_one_based() {
        let record: DataRecord = ["Alice", "30"].into_iter().collect();
        assert_eq!(record.field(1), Some("Alice"));
        assert_eq!(record.field(2), Some("30"));
        assert_eq!(record.field(0), None);
        assert_eq!(record.field(3), None);
    }

    #[test]
    fn test_parse_without_header() {
        let records = parse_records("Alice,30\nBob,41\n".as_bytes(), &TableConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields(), &["Alice".to_string(), "30".to_string()]);
        assert_eq!(records[1].field(1), Some("Bob"));
    }

    #[test]
    fn test_parse_ragged_rows() {
        let records = parse_records("a,b,c\nd\n".as_bytes(), &TableConfig::default()).unwrap();
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[1].len(), 1);
    }

    #[test]
    fn test_parse_quoted_fields() {
        let records =
            parse_records("\"Smith, Jane\",\"say \"\"hi\"\"\"\n".as_bytes(), &TableConfig::default())
                .unwrap();
        assert_eq!(records[0].field(1), Some("Smith, Jane"));
        assert_eq!(records[0].field(2), Some("say \"hi\""));
    }

    #[test]
    fn test_parse_semicolon_with_trim() {
        let config = TableConfig::new().with_delimiter(';').with_trim(true);
        let records = parse_records("a ; b\n".as_bytes(), &config).unwrap();
        assert_eq!(records[0].fields(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_empty_table() {
        let records = parse_records("".as_bytes(), &TableConfig::default()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_delimiter() {
        let config = TableConfig::new().with_delimiter('§');
        assert!(matches!(
            parse_records("a".as_bytes(), &config),
            Err(DataError::InvalidDelimiter('§'))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = read_records("/nonexistent/data.csv", &TableConfig::default()).unwrap_err();
        assert!(matches!(err, DataError::Open { .. }));
    }
}
