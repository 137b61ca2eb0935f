//! Comparison Results Export
//! Writes the measure/value table to CSV or JSON and figures to PNG.

use crate::charts::RenderedFigure;
use crate::compare::ResultRecord;
use crate::export::ExportError;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Write comparison records as a two column CSV table.
pub fn write_results_csv(records: &[ResultRecord], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    let measures: Vec<&str> = records.iter().map(|r| r.measure.as_str()).collect();
    let values: Vec<f64> = records.iter().map(|r| r.value).collect();
    let mut df = DataFrame::new(vec![
        Column::new("measure".into(), measures),
        Column::new("value".into(), values),
    ])?;

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
    log::info!("Results CSV written: {}", path.display());
    Ok(())
}

/// Write comparison records as pretty printed JSON.
pub fn write_results_json(records: &[ResultRecord], path: &Path) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    log::info!("Results JSON written: {}", path.display());
    Ok(())
}

/// Write a rendered figure as a standalone PNG file.
pub fn write_figure_png(figure: &RenderedFigure, path: &Path) -> Result<(), ExportError> {
    fs::write(path, &figure.png)?;
    log::info!("Figure PNG written: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    fn sample_records() -> Vec<ResultRecord> {
        vec![
            ResultRecord {
                measure: "accuracy_t_stat".to_string(),
                value: -2.0,
            },
            ResultRecord {
                measure: "accuracy_p_value".to_string(),
                value: 0.0805,
            },
            ResultRecord {
                measure: "classification_kappa".to_string(),
                value: 0.75,
            },
        ]
    }

    #[test]
    fn csv_round_trips_through_the_loader() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("results.csv");
        write_results_csv(&sample_records(), &path).expect("write");

        let df = data::read_csv(path.to_str().expect("path")).expect("read");
        assert_eq!(df.shape(), (3, 2));
        let measures = data::column_labels(&df, "measure").expect("measures");
        assert_eq!(measures[2], "classification_kappa");
        let values = data::column_f64(&df, "value").expect("values");
        assert!((values[0] + 2.0).abs() < 1e-9);
    }

    #[test]
    fn json_keeps_measure_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("results.json");
        write_results_json(&sample_records(), &path).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["measure"], "accuracy_t_stat");
        assert!((parsed[2]["value"].as_f64().expect("f64") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn png_bytes_are_written_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("figure.png");
        let figure = RenderedFigure {
            title: "Comparison".to_string(),
            width: 2,
            height: 2,
            png: vec![0x89, 0x50, 0x4E, 0x47],
        };
        write_figure_png(&figure, &path).expect("write");
        assert_eq!(std::fs::read(&path).expect("read"), figure.png);
    }

    #[test]
    fn empty_record_lists_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            write_results_csv(&[], &dir.path().join("r.csv")),
            Err(ExportError::Empty)
        ));
        assert!(matches!(
            write_results_json(&[], &dir.path().join("r.json")),
            Err(ExportError::Empty)
        ));
    }
}
