//! CSV Table Loader Module
//! Handles CSV file loading and column extraction using Polars.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("No data loaded")]
    NoData,
}

/// A numeric column cast to f64 with nulls and NaNs dropped.
#[derive(Debug, Clone)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// Handles CSV file loading with Polars for high performance.
#[derive(Default)]
pub struct TableLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));
        let df = read_csv(file_path)?;
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path of the last loaded CSV.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for async loading).
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}

/// Read a CSV with lazy evaluation for memory efficiency, then collect.
pub fn read_csv(file_path: &str) -> Result<DataFrame, LoaderError> {
    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Get list of numeric column names by dtype inspection.
pub fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
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
        })
        .map(|col| col.name().to_string())
        .collect()
}

/// Derive the numeric view every figure builder works from.
pub fn numeric_view(df: &DataFrame) -> Vec<NumericColumn> {
    numeric_column_names(df)
        .into_iter()
        .filter_map(|name| {
            let values = column_f64(df, &name).ok()?;
            Some(NumericColumn { name, values })
        })
        .collect()
}

/// Extract a column as f64 values, dropping nulls and NaNs.
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>, LoaderError> {
    let col = df.column(name)?;
    let cast = col.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
}

/// Extract a column as f64 values with row positions kept.
///
/// Nulls and NaNs stay as `None` so two columns can be zipped row by row.
pub fn column_f64_aligned(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, LoaderError> {
    let col = df.column(name)?;
    let cast = col.cast(&DataType::Float64)?;
    let ca = cast.f64()?;
    Ok(ca.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
}

/// Extract a column as display labels, keeping row positions.
///
/// Works for any dtype so numeric category codes compare like strings.
/// Nulls become empty labels rather than shifting the row pairing.
pub fn column_labels(df: &DataFrame, name: &str) -> Result<Vec<String>, LoaderError> {
    let col = df.column(name)?;
    let labels = (0..col.len())
        .map(|i| match col.get(i) {
            Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
            _ => String::new(),
        })
        .collect();
    Ok(labels)
}

/// First `rows` rows rendered as display strings for the head preview.
pub fn preview_rows(df: &DataFrame, rows: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let header: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let take = rows.min(df.height());
    let body = (0..take)
        .map(|i| {
            df.get_columns()
                .iter()
                .map(|col| match col.get(i) {
                    Ok(val) if !val.is_null() => val.to_string().trim_matches('"').to_string(),
                    _ => String::new(),
                })
                .collect()
        })
        .collect();

    (header, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn loads_csv_and_detects_numeric_columns() {
        let file = write_temp_csv("name,score,weight\nalpha,1,2.5\nbeta,2,3.5\ngamma,3,4.5\n");
        let mut loader = TableLoader::new();
        let df = loader
            .load_csv(file.path().to_str().unwrap())
            .expect("load");

        assert_eq!(df.shape(), (3, 3));
        assert_eq!(
            numeric_column_names(df),
            vec!["score".to_string(), "weight".to_string()]
        );
    }

    #[test]
    fn numeric_view_drops_nulls() {
        let file = write_temp_csv("score,label\n1.0,a\n,b\n3.0,c\n");
        let mut loader = TableLoader::new();
        let df = loader
            .load_csv(file.path().to_str().unwrap())
            .expect("load");

        let view = numeric_view(df);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "score");
        assert_eq!(view[0].values, vec![1.0, 3.0]);
    }

    #[test]
    fn labels_keep_row_positions() {
        let file = write_temp_csv("classification,score\ngood,1\n,2\nbad,3\n");
        let mut loader = TableLoader::new();
        let df = loader
            .load_csv(file.path().to_str().unwrap())
            .expect("load");

        let labels = column_labels(df, "classification").expect("labels");
        assert_eq!(
            labels,
            vec!["good".to_string(), String::new(), "bad".to_string()]
        );
    }

    #[test]
    fn missing_column_propagates_polars_error() {
        let file = write_temp_csv("a\n1\n");
        let mut loader = TableLoader::new();
        let df = loader
            .load_csv(file.path().to_str().unwrap())
            .expect("load");

        assert!(column_f64(df, "does_not_exist").is_err());
    }

    #[test]
    fn preview_caps_row_count() {
        let file = write_temp_csv("a,b\n1,x\n2,y\n3,z\n");
        let mut loader = TableLoader::new();
        let df = loader
            .load_csv(file.path().to_str().unwrap())
            .expect("load");

        let (header, body) = preview_rows(df, 2);
        assert_eq!(header, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(body.len(), 2);
        assert_eq!(body[0], vec!["1".to_string(), "x".to_string()]);
    }
}
