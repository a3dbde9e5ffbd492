//! CSV Data Loader Module
//! Reads chart datasets from CSV files using Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, inferring column types from the first 10000 rows.
    /// Unparseable cells become nulls.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded CSV"
        );
        Ok(df)
    }
}
