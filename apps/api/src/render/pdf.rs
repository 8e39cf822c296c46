//! PDF serializer for paginated evaluation reports.
//!
//! Uses the standard Type1 Helvetica faces without embedding, so text is
//! written as WinAnsi bytes and measured with the AFM tables in
//! `layout::font_metrics`.

use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::layout::font_metrics::get_metrics;
use crate::layout::{FontFace, Page, PageGeometry};
use crate::render::{ReportMeta, REPORT_TITLE};

// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const LEFT_MARGIN: f32 = 50.0;
const TOP_MARGIN: f32 = 50.0;
/// Body text on page 1 starts below the title block.
const FIRST_PAGE_TOP_MARGIN: f32 = 200.0;
const BOTTOM_MARGIN: f32 = 50.0;
const LINE_SPACING: f32 = 15.0;
const FOOTER_RIGHT_INSET: f32 = 40.0;
const FOOTER_BASELINE: f32 = 30.0;
const GREY: f32 = 0.5;

/// Page geometry of the PDF report body.
pub fn report_geometry() -> PageGeometry {
    PageGeometry::new(
        PAGE_HEIGHT,
        TOP_MARGIN,
        BOTTOM_MARGIN,
        LINE_SPACING,
        PAGE_WIDTH - 2.0 * LEFT_MARGIN,
    )
    .with_first_page_top_margin(FIRST_PAGE_TOP_MARGIN)
}

/// Serializes `pages` into a PDF. Page 1 carries the title block; every page
/// carries `footer` at the bottom right.
pub fn render_pdf(
    pages: &[Page],
    meta: &ReportMeta,
    overall_grade: Option<&str>,
    footer: &str,
) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_refs: Vec<(Ref, Ref)> = pages.iter().map(|_| (alloc(), alloc())).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_refs.iter().map(|(page_id, _)| *page_id))
        .count(page_refs.len() as i32);

    for (font_id, face) in [
        (regular_id, FontFace::Helvetica),
        (bold_id, FontFace::HelveticaBold),
    ] {
        pdf.type1_font(font_id)
            .base_font(Name(face.base_font_name().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (index, (page, (page_id, content_id))) in pages.iter().zip(&page_refs).enumerate() {
        let mut content = Content::new();
        if index == 0 {
            draw_title_block(&mut content, meta, overall_grade);
        }
        for row in &page.rows {
            draw_text(
                &mut content,
                row.style.face,
                row.style.size,
                LEFT_MARGIN,
                row.y,
                &row.text,
            );
        }
        draw_footer(&mut content, footer);
        pdf.stream(*content_id, &content.finish());

        let mut page_writer = pdf.page(*page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(*content_id);
        page_writer
            .resources()
            .fonts()
            .pair(Name(FontFace::Helvetica.resource_name().as_bytes()), regular_id)
            .pair(Name(FontFace::HelveticaBold.resource_name().as_bytes()), bold_id);
    }

    pdf.finish()
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing helpers
// ────────────────────────────────────────────────────────────────────────────

fn draw_title_block(content: &mut Content, meta: &ReportMeta, overall_grade: Option<&str>) {
    let top = PAGE_HEIGHT;
    draw_text(content, FontFace::HelveticaBold, 18.0, LEFT_MARGIN, top - 50.0, REPORT_TITLE);

    content.save_state();
    content.set_fill_gray(GREY);
    draw_text(
        content,
        FontFace::Helvetica,
        10.0,
        PAGE_WIDTH - 150.0,
        top - 30.0,
        &format!("App Version: {}", meta.app_version),
    );
    content.restore_state();

    draw_rule(content, 2.0, top - 70.0);

    let info = [
        format!("Student Name: {}", meta.student_name),
        format!("Roll Number: {}", meta.student_roll),
        format!("Date: {}", meta.date.format("%Y-%m-%d")),
    ];
    for (i, line) in info.iter().enumerate() {
        let y = top - 90.0 - 20.0 * i as f32;
        draw_text(content, FontFace::Helvetica, 12.0, LEFT_MARGIN, y, line);
    }

    if let Some(grade) = overall_grade {
        draw_text(
            content,
            FontFace::HelveticaBold,
            14.0,
            LEFT_MARGIN,
            top - 160.0,
            &format!("Overall Grade: {}", grade_out_of_ten(grade)),
        );
    }

    draw_rule(content, 1.0, top - 180.0);
}

fn draw_footer(content: &mut Content, footer: &str) {
    if footer.trim().is_empty() {
        return;
    }
    let size = 10.0;
    let width = get_metrics(FontFace::Helvetica).width_pt(footer, size);
    content.save_state();
    content.set_fill_gray(GREY);
    draw_text(
        content,
        FontFace::Helvetica,
        size,
        PAGE_WIDTH - FOOTER_RIGHT_INSET - width,
        FOOTER_BASELINE,
        footer,
    );
    content.restore_state();
}

/// Horizontal separator spanning the text column.
fn draw_rule(content: &mut Content, width: f32, y: f32) {
    content.save_state();
    content.set_line_width(width);
    content.move_to(LEFT_MARGIN, y);
    content.line_to(PAGE_WIDTH - LEFT_MARGIN, y);
    content.stroke();
    content.restore_state();
}

fn draw_text(content: &mut Content, face: FontFace, size: f32, x: f32, y: f32, text: &str) {
    let bytes = to_winansi_bytes(text);
    content
        .begin_text()
        .set_font(Name(face.resource_name().as_bytes()), size)
        .next_line(x, y)
        .show(Str(&bytes))
        .end_text();
}

/// "8" → "8/10"; grades the model already wrote as a fraction are kept.
fn grade_out_of_ten(grade: &str) -> String {
    if grade.contains('/') {
        grade.to_string()
    } else {
        format!("{grade}/10")
    }
}

/// Encodes text for a WinAnsiEncoding simple font. Unmappable characters become '?'.
fn to_winansi_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' => b' ',
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
