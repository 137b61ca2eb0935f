//! PDF Report Generator Module
//! Writes rendered figures to a PDF, one US Letter page per figure.
//!
//! Emits the PDF objects directly: each figure page carries a JPEG
//! image XObject (DCTDecode) re-encoded from the rendered PNG.

use crate::charts::RenderedFigure;
use crate::export::ExportError;
use image::codecs::jpeg::JpegEncoder;
use std::fs;
use std::path::Path;

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;
const PAGE_MARGIN: f64 = 36.0;
const JPEG_QUALITY: u8 = 90;

/// PDF generator for figure reports.
pub struct PdfGenerator;

impl PdfGenerator {
    /// Generate a PDF with one centered figure per page.
    pub fn generate_pdf_from_bytes(
        figures: &[RenderedFigure],
        output_path: &Path,
    ) -> Result<(), ExportError> {
        if figures.is_empty() {
            return Err(ExportError::Empty);
        }

        let n = figures.len();
        let mut buf: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        buf.extend_from_slice(b"%PDF-1.4\n");
        buf.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);

        // Object 1: document catalog
        begin_obj(&mut buf, &mut offsets, 1);
        buf.extend_from_slice(b"<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        // Object 2: page tree, pages at 3, 6, 9, ...
        begin_obj(&mut buf, &mut offsets, 2);
        let kids: Vec<String> = (0..n).map(|i| format!("{} 0 R", 3 + 3 * i)).collect();
        buf.extend_from_slice(
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
                kids.join(" "),
                n
            )
            .as_bytes(),
        );

        for (i, figure) in figures.iter().enumerate() {
            let page_id = 3 + 3 * i;
            let content_id = page_id + 1;
            let image_id = page_id + 2;

            // PDF cannot embed PNG streams directly, so re-encode as JPEG.
            let rgb = image::load_from_memory(&figure.png)?.to_rgb8();
            let (px_w, px_h) = rgb.dimensions();
            let mut jpeg = Vec::new();
            JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode_image(&rgb)?;

            let (w, h, x, y) = fit_to_page(px_w, px_h);

            begin_obj(&mut buf, &mut offsets, page_id);
            buf.extend_from_slice(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /XObject << /Im{i} {image_id} 0 R >> >> \
                     /Contents {content_id} 0 R >>\nendobj\n"
                )
                .as_bytes(),
            );

            let content = format!("q\n{w:.2} 0 0 {h:.2} {x:.2} {y:.2} cm\n/Im{i} Do\nQ\n");
            begin_obj(&mut buf, &mut offsets, content_id);
            buf.extend_from_slice(
                format!(
                    "<< /Length {} >>\nstream\n{}endstream\nendobj\n",
                    content.len(),
                    content
                )
                .as_bytes(),
            );

            begin_obj(&mut buf, &mut offsets, image_id);
            buf.extend_from_slice(
                format!(
                    "<< /Type /XObject /Subtype /Image /Width {px_w} /Height {px_h} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode \
                     /Length {} >>\nstream\n",
                    jpeg.len()
                )
                .as_bytes(),
            );
            buf.extend_from_slice(&jpeg);
            buf.extend_from_slice(b"\nendstream\nendobj\n");
        }

        // Cross-reference table and trailer
        let xref_offset = buf.len();
        let total = 2 + 3 * n;
        buf.extend_from_slice(format!("xref\n0 {}\n", total + 1).as_bytes());
        buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            buf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                total + 1
            )
            .as_bytes(),
        );

        fs::write(output_path, buf)?;
        log::info!(
            "PDF generated: {} ({} pages)",
            output_path.display(),
            figures.len()
        );
        Ok(())
    }
}

fn begin_obj(buf: &mut Vec<u8>, offsets: &mut Vec<usize>, id: usize) {
    offsets.push(buf.len());
    buf.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
}

/// Scale pixel dimensions into the printable area and center the result.
fn fit_to_page(px_w: u32, px_h: u32) -> (f64, f64, f64, f64) {
    let avail_w = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
    let avail_h = PAGE_HEIGHT - 2.0 * PAGE_MARGIN;
    let scale = (avail_w / px_w.max(1) as f64).min(avail_h / px_h.max(1) as f64);
    let w = px_w as f64 * scale;
    let h = px_h as f64 * scale;
    let x = (PAGE_WIDTH - w) / 2.0;
    let y = (PAGE_HEIGHT - h) / 2.0;
    (w, h, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, RgbImage};
    use std::io::Cursor;

    fn tiny_figure(title: &str) -> RenderedFigure {
        let img: RgbImage = ImageBuffer::from_pixel(8, 6, image::Rgb([180u8, 40, 40]));
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
    fn writes_one_page_per_figure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.pdf");
        let figures = vec![tiny_figure("first"), tiny_figure("second")];

        PdfGenerator::generate_pdf_from_bytes(&figures, &path).expect("pdf");

        let bytes = std::fs::read(&path).expect("read");
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/DCTDecode"));
        assert!(text.contains("/Im0"));
        assert!(text.contains("/Im1"));
    }

    #[test]
    fn rejects_empty_figure_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.pdf");
        assert!(matches!(
            PdfGenerator::generate_pdf_from_bytes(&[], &path),
            Err(ExportError::Empty)
        ));
    }

    #[test]
    fn landscape_images_fit_inside_the_margins() {
        let (w, h, x, y) = fit_to_page(800, 600);
        assert!(w <= PAGE_WIDTH - 2.0 * PAGE_MARGIN + 1e-9);
        assert!(h <= PAGE_HEIGHT - 2.0 * PAGE_MARGIN + 1e-9);
        assert!((w / h - 800.0 / 600.0).abs() < 1e-9);
        assert!(x >= PAGE_MARGIN && y >= PAGE_MARGIN);
    }
}
