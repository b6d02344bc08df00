//! Fixtures shared by the unit tests.

use std::io::Cursor;

use bytes::Bytes;
use serde_json::json;

/// A small valid PNG.
pub fn tiny_png() -> Bytes {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode fixture png");
    Bytes::from(out.into_inner())
}

/// Transcribed resume text comfortably above the minimum length.
pub fn resume_text(name: &str) -> String {
    format!(
        "{name}\nSoftware Engineer\n5 years building distributed systems in Rust and Go.\n\
         Led migration of billing services to Kubernetes."
    )
}

/// A model reply for one analysis, fenced the way models usually answer.
pub fn analysis_reply(name: &str, fit: u32) -> String {
    let body = json!({
        "candidate_name": name,
        "overall_fit_percentage": fit,
        "fit_status": if fit >= 75 { "STRONG MATCH" } else { "PARTIAL MATCH" },
        "scorecard": {"technical_expertise": 4, "domain_knowledge": 3},
        "recommendation": {"decision": "CONDITIONAL", "reasoning": "Solid fundamentals."}
    });
    format!("```json\n{body}\n```")
}

/// A minimal PDF with one Helvetica text line per page, pages in the given order.
pub fn text_pdf(pages: &[&str]) -> Bytes {
    let font_id = 3;
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        String::new(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];
    let mut kids = Vec::new();
    for text in pages {
        let page_id = objects.len() + 1;
        let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {font_id} 0 R >> >> /Contents {} 0 R >>",
            page_id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{stream}\nendstream",
            stream.len()
        ));
        kids.push(format!("{page_id} 0 R"));
    }
    objects[1] = format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    );

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }
    let xref_at = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{offset:010} 00000 n \n"));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    Bytes::from(out)
}
