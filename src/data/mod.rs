//! Data module - CSV loading and column extraction

mod loader;

pub use loader::{
    column_f64, column_f64_aligned, column_labels, numeric_column_names, numeric_view,
    preview_rows, read_csv, LoaderError, NumericColumn, TableLoader,
};
