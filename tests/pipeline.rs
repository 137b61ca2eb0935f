//! End to end pipeline tests: CSV in, figures and reports out.

use chartlab::charts::{Figure, FigureRenderer};
use chartlab::compare::ComparisonReport;
use chartlab::data;
use chartlab::export::{self, DocxGenerator, PdfGenerator};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

const SCORES_CSV: &str = "\
name,score,weight
a,1.0,2.0
b,2.0,4.5
c,3.0,5.0
d,4.0,8.5
e,5.0,9.5
f,6.0,12.5
g,7.0,14.0
h,8.0,16.5
";

const AI_CSV: &str = "\
accuracy,quality,consistency,classification
0.82,0.78,0.91,good
0.75,0.69,0.88,good
0.64,0.72,0.79,bad
0.91,0.84,0.91,good
0.58,0.61,0.70,bad
0.77,0.74,0.85,good
";

const HUMAN_CSV: &str = "\
accuracy,quality,consistency,classification
0.88,0.83,0.93,good
0.79,0.75,0.90,good
0.70,0.78,0.84,bad
0.93,0.88,0.95,good
0.66,0.69,0.77,good
0.81,0.80,0.88,good
";

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write csv");
    path
}

fn load_csv(path: &Path) -> DataFrame {
    data::read_csv(path.to_str().expect("path")).expect("load csv")
}

#[test]
fn csv_to_pdf_and_docx_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(dir.path(), "scores.csv", SCORES_CSV);

    let df = load_csv(&csv);
    assert_eq!(df.shape(), (8, 3));

    let figures = vec![
        Figure::distribution(&df).expect("distribution"),
        Figure::box_plot(&df).expect("box"),
        Figure::regression(&df).expect("regression"),
    ];

    let rendered: Vec<_> = figures
        .iter()
        .map(|figure| FigureRenderer::render_png(figure).expect("render"))
        .collect();
    for image in &rendered {
        assert!(image.png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    let pdf_path = dir.path().join("report.pdf");
    PdfGenerator::generate_pdf_from_bytes(&rendered, &pdf_path).expect("pdf");
    let pdf = std::fs::read(&pdf_path).expect("read pdf");
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(pdf.ends_with(b"%%EOF\n"));
    assert!(String::from_utf8_lossy(&pdf).contains("/Count 3"));

    let docx_path = dir.path().join("report.docx");
    DocxGenerator::generate_docx_from_bytes(&rendered, &docx_path, "ChartLab Report")
        .expect("docx");
    let file = std::fs::File::open(&docx_path).expect("open docx");
    let mut archive = zip::ZipArchive::new(file).expect("zip");
    assert!(archive.by_name("word/document.xml").is_ok());
    assert!(archive.by_name("word/media/image3.png").is_ok());
}

#[test]
fn comparison_results_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ai = load_csv(&write_csv(dir.path(), "ai.csv", AI_CSV));
    let human = load_csv(&write_csv(dir.path(), "human.csv", HUMAN_CSV));

    let report = ComparisonReport::run(&ai, &human).expect("run");
    assert_eq!(report.metrics.len(), 3);
    assert!(report.kappa.is_finite());

    let records = report.result_records();
    assert_eq!(records.len(), 7);

    let csv_path = dir.path().join("results.csv");
    export::write_results_csv(&records, &csv_path).expect("write results");
    let back = load_csv(&csv_path);
    assert_eq!(back.shape(), (7, 2));
    let measures = data::column_labels(&back, "measure").expect("measures");
    assert_eq!(measures[6], "classification_kappa");

    let figure = report.figure();
    let rendered = FigureRenderer::render_png(&figure).expect("render");
    let png_path = dir.path().join("summary.png");
    export::write_figure_png(&rendered, &png_path).expect("write png");
    let bytes = std::fs::read(&png_path).expect("read png");
    let decoded = image::load_from_memory(&bytes).expect("decode");
    assert_eq!(decoded.width(), rendered.width);
}

#[test]
fn mismatched_shapes_surface_a_clear_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let short = "accuracy,quality,consistency,classification\n0.8,0.7,0.9,good\n";
    let ai = load_csv(&write_csv(dir.path(), "ai.csv", AI_CSV));
    let human = load_csv(&write_csv(dir.path(), "human.csv", short));

    let err = ComparisonReport::run(&ai, &human).expect_err("shape mismatch");
    let message = err.to_string();
    assert!(message.contains("must have the same rows and columns"));
    assert!(message.contains("6x4"));
    assert!(message.contains("1x4"));
}
