//! Word Report Generator Module
//! Generates DOCX reports with a heading and embedded image per figure.
//!
//! Uses direct XML generation and ZIP packaging for the OOXML parts,
//! so no external document library is needed.

use crate::charts::RenderedFigure;
use crate::export::ExportError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// EMU (English Metric Units) conversion: 914400 EMU = 1 inch
const EMU_PER_INCH: i64 = 914_400;
/// Image width inside one inch margins on US Letter (6.5 inches)
const IMAGE_WIDTH_EMU: i64 = 13 * EMU_PER_INCH / 2;
/// Tall figure grids are scaled down to leave room for their heading
const IMAGE_MAX_HEIGHT_EMU: i64 = 8 * EMU_PER_INCH;

/// DOCX generator for figure reports.
pub struct DocxGenerator;

impl DocxGenerator {
    /// Generate a DOCX containing every figure under a document title.
    pub fn generate_docx_from_bytes(
        figures: &[RenderedFigure],
        output_path: &Path,
        title: &str,
    ) -> Result<(), ExportError> {
        if figures.is_empty() {
            return Err(ExportError::Empty);
        }

        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();

        // Content types
        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml().as_bytes())?;

        // Package relationships
        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::package_rels_xml().as_bytes())?;

        // Document part and its image relationships
        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(Self::document_rels_xml(figures.len()).as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(Self::document_xml(figures, title).as_bytes())?;

        // Document properties
        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(Self::core_props_xml(title).as_bytes())?;

        zip.start_file("docProps/app.xml", options)?;
        zip.write_all(Self::app_props_xml().as_bytes())?;

        // Media
        for (idx, figure) in figures.iter().enumerate() {
            zip.start_file(format!("word/media/image{}.png", idx + 1), options)?;
            zip.write_all(&figure.png)?;
        }

        zip.finish()?;
        log::info!(
            "DOCX generated: {} ({} figures)",
            output_path.display(),
            figures.len()
        );
        Ok(())
    }

    fn content_types_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Default Extension="png" ContentType="image/png"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#
    }

    fn package_rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#
    }

    fn document_rels_xml(figure_count: usize) -> String {
        let mut relationships = String::new();
        for idx in 1..=figure_count {
            relationships.push_str(&format!(
                r#"<Relationship Id="rId{idx}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image{idx}.png"/>
"#
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
{relationships}</Relationships>"#
        )
    }

    fn document_xml(figures: &[RenderedFigure], title: &str) -> String {
        let mut body = String::new();
        body.push_str(&format!(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="40"/></w:rPr><w:t>{}</w:t></w:r></w:p>"#,
            xml_escape(title)
        ));

        for (idx, figure) in figures.iter().enumerate() {
            let (cx, cy) = Self::image_extent_emu(figure.width, figure.height);
            body.push_str(&format!(
                r#"<w:p><w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>Plot: {}</w:t></w:r></w:p>"#,
                xml_escape(&figure.title)
            ));
            body.push_str(&format!(
                r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="{id}" name="Figure {id}"/><a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:nvPicPr><pic:cNvPr id="{id}" name="Figure {id}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId{rid}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
                id = idx + 1,
                rid = idx + 1,
            ));
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">
<w:body>
{body}
<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr>
</w:body>
</w:document>"#
        )
    }

    /// Full content width, shrunk when the aspect ratio would overflow a page.
    fn image_extent_emu(width_px: u32, height_px: u32) -> (i64, i64) {
        let mut cx = IMAGE_WIDTH_EMU;
        let mut cy = if width_px > 0 {
            cx * height_px as i64 / width_px as i64
        } else {
            cx * 3 / 4
        };
        if cy > IMAGE_MAX_HEIGHT_EMU {
            cx = cx * IMAGE_MAX_HEIGHT_EMU / cy;
            cy = IMAGE_MAX_HEIGHT_EMU;
        }
        (cx, cy)
    }

    fn core_props_xml(title: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/">
<dc:title>{}</dc:title>
<dc:creator>ChartLab</dc:creator>
</cp:coreProperties>"#,
            xml_escape(title)
        )
    }

    fn app_props_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>ChartLab</Application>
</Properties>"#
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, RgbImage};
    use std::io::{Cursor, Read};

    fn tiny_figure(title: &str) -> RenderedFigure {
        let img: RgbImage = ImageBuffer::from_pixel(8, 6, image::Rgb([40u8, 40, 180]));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("encode");
        RenderedFigure {
            title: title.to_string(),
            width: 8,
            height: 6,
            png,
        }
    }

    #[test]
    fn writes_all_expected_parts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.docx");
        let figures = vec![tiny_figure("Distribution of score"), tiny_figure("Box Plot")];

        DocxGenerator::generate_docx_from_bytes(&figures, &path, "Analysis Report")
            .expect("docx");

        let file = File::open(&path).expect("open");
        let mut archive = zip::ZipArchive::new(file).expect("zip");
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_string())
            .collect();
        assert!(names.contains(&"[Content_Types].xml".to_string()));
        assert!(names.contains(&"word/document.xml".to_string()));
        assert!(names.contains(&"word/media/image1.png".to_string()));
        assert!(names.contains(&"word/media/image2.png".to_string()));

        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .expect("document part")
            .read_to_string(&mut document)
            .expect("read");
        assert!(document.contains("Analysis Report"));
        assert!(document.contains("Distribution of score"));
        assert!(document.contains(r#"r:embed="rId2""#));
    }

    #[test]
    fn escapes_markup_in_titles() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.docx");
        let figures = vec![tiny_figure("a < b & c")];

        DocxGenerator::generate_docx_from_bytes(&figures, &path, "Q&A").expect("docx");

        let file = File::open(&path).expect("open");
        let mut archive = zip::ZipArchive::new(file).expect("zip");
        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .expect("document part")
            .read_to_string(&mut document)
            .expect("read");
        assert!(document.contains("a &lt; b &amp; c"));
        assert!(document.contains("Q&amp;A"));
    }

    #[test]
    fn rejects_empty_figure_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.docx");
        assert!(matches!(
            DocxGenerator::generate_docx_from_bytes(&[], &path, "Report"),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn tall_figures_are_scaled_to_fit_a_page() {
        let (cx, cy) = DocxGenerator::image_extent_emu(420, 1000);
        assert_eq!(cy, IMAGE_MAX_HEIGHT_EMU);
        assert!(cx < IMAGE_WIDTH_EMU);

        let (cx, cy) = DocxGenerator::image_extent_emu(840, 640);
        assert_eq!(cx, IMAGE_WIDTH_EMU);
        assert_eq!(cy, IMAGE_WIDTH_EMU * 640 / 840);
    }
}
