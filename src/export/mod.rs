//! Export module - PDF, Word, and comparison results output

mod docx;
mod pdf;
mod results;

pub use docx::DocxGenerator;
pub use pdf::PdfGenerator;
pub use results::{write_figure_png, write_results_csv, write_results_json};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Table error: {0}")]
    Table(#[from] polars::prelude::PolarsError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Nothing to export")]
    Empty,
}
