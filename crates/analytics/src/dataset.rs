//! CSV Dataset

use crate::AnalyticsError;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Cell spellings treated as missing
const MISSING_MARKERS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

#[derive(Debug, Clone)]
enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    fn missing(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    fn cell(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => v[row].map(|x| x.to_string()).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone().unwrap_or_default(),
        }
    }
}

/// Column-oriented table loaded from CSV
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Load a dataset from a CSV file with a header row
    pub fn from_path(path: &Path) -> Result<Self, AnalyticsError> {
        let file = File::open(path).map_err(|source| AnalyticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_reader(BufReader::new(file))?;
        info!(
            "Dataset loaded from {}: {} rows, {} columns",
            path.display(),
            dataset.len(),
            dataset.width()
        );
        Ok(dataset)
    }

    /// Load a dataset from any CSV source with a header row.
    ///
    /// A column is numeric when every non-missing cell parses as a number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnalyticsError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        let mut rows = 0;

        for record in reader.records() {
            let record = record?;
            for (idx, column) in cells.iter_mut().enumerate() {
                let cell = record
                    .get(idx)
                    .filter(|c| !MISSING_MARKERS.contains(c))
                    .map(str::to_string);
                column.push(cell);
            }
            rows += 1;
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| {
                let parsed: Option<Vec<Option<f64>>> = raw
                    .iter()
                    .map(|cell| match cell {
                        Some(text) => text.parse::<f64>().ok().map(Some),
                        None => Some(None),
                    })
                    .collect();
                let data = match parsed {
                    Some(values) => ColumnData::Numeric(values),
                    None => ColumnData::Text(raw),
                };
                debug!("Column {} inferred as {:?}", name, kind_of(&data));
                Column { name, data }
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column names in file order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Names of numeric columns in file order
    pub fn numeric_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| matches!(c.data, ColumnData::Numeric(_)))
            .map(|c| c.name.as_str())
    }

    /// Whether a numeric column exists
    pub fn has_numeric(&self, name: &str) -> bool {
        self.numeric(name).is_some()
    }

    /// Cells of a numeric column, `None` where missing
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| match &c.data {
                ColumnData::Numeric(v) => Some(v.as_slice()),
                ColumnData::Text(_) => None,
            })
    }

    /// Present values of a numeric column
    pub fn values(&self, name: &str) -> Result<Vec<f64>, AnalyticsError> {
        self.numeric(name)
            .map(|cells| cells.iter().flatten().copied().collect())
            .ok_or_else(|| AnalyticsError::MissingColumn(name.to_string()))
    }

    /// Inferred type per column
    pub fn column_types(&self) -> Vec<(String, ColumnKind)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), kind_of(&c.data)))
            .collect()
    }

    /// Missing-cell counts for columns with at least one missing cell
    pub fn missing_values(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.missing()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// First `n` rows rendered as strings, missing cells empty
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        (0..n.min(self.rows))
            .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
            .collect()
    }
}

fn kind_of(data: &ColumnData) -> ColumnKind {
    match data {
        ColumnData::Numeric(_) => ColumnKind::Numeric,
        ColumnData::Text(_) => ColumnKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Country,HDI_Index,GDP_per_Capita_USD,Region
Norway,0.96,82000,Europe
Chad,0.39,,Africa
Chile,0.86,16000,NA
";

    #[test]
    fn test_type_inference() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.width(), 4);
        assert_eq!(
            ds.numeric_columns().collect::<Vec<_>>(),
            vec!["HDI_Index", "GDP_per_Capita_USD"]
        );
        assert!(ds.numeric("Country").is_none());
        assert_eq!(ds.column_types()[3], ("Region".to_string(), ColumnKind::Text));
    }

    #[test]
    fn test_missing_cells() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(ds.values("GDP_per_Capita_USD").unwrap(), vec![82000.0, 16000.0]);
        assert_eq!(
            ds.missing_values(),
            vec![
                ("GDP_per_Capita_USD".to_string(), 1),
                ("Region".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_head() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let head = ds.head(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head[1], vec!["Chad", "0.39", "", "Africa"]);
        assert_eq!(ds.head(10).len(), 3);
    }

    #[test]
    fn test_unknown_column() {
        let ds = Dataset::from_reader(CSV.as_bytes()).unwrap();
        assert!(matches!(
            ds.values("Life_Expectancy_years"),
            Err(AnalyticsError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample_dataset.csv");
        std::fs::write(&path, CSV).unwrap();
        assert_eq!(Dataset::from_path(&path).unwrap().len(), 3);
        assert!(matches!(
            Dataset::from_path(&dir.path().join("absent.csv")),
            Err(AnalyticsError::Io { .. })
        ));
    }
}
