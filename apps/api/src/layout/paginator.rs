//! Report paginator — lays feedback lines out as fixed-size pages of wrapped rows.
//!
//! Coordinates follow PDF conventions: y grows upward, the cursor starts at
//! `page_height - top_margin` and is decremented by `line_spacing` per row. A
//! new page starts when the cursor has fallen below `bottom_margin` and another
//! row needs placing, so a line that wraps across the threshold continues on
//! the next page with the cursor reset.
//!
//! Measurement is injected through `TextWrapper`; this module never looks at
//! glyph widths itself and performs no I/O.

use serde::Serialize;

use crate::layout::font_metrics::FontFace;
use crate::layout::headers::{classify, LineClass, LineStyle};

// ────────────────────────────────────────────────────────────────────────────
// Measurement capability
// ────────────────────────────────────────────────────────────────────────────

/// Splits text into rows no wider than `max_width` under the given font.
///
/// Implementations must be deterministic for a given face, size and width,
/// otherwise pagination is not reproducible.
pub trait TextWrapper {
    fn wrap(&self, text: &str, face: FontFace, font_size: f32, max_width: f32) -> Vec<String>;
}

impl<F> TextWrapper for F
where
    F: Fn(&str, FontFace, f32, f32) -> Vec<String>,
{
    fn wrap(&self, text: &str, face: FontFace, font_size: f32, max_width: f32) -> Vec<String> {
        self(text, face, font_size, max_width)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Page dimensions in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageGeometry {
    pub page_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    pub line_spacing: f32,
    pub max_text_width: f32,
    /// Top margin of the first page only, leaving room for a title block.
    /// `None` uses `top_margin`.
    pub first_page_top_margin: Option<f32>,
}

impl PageGeometry {
    pub fn new(
        page_height: f32,
        top_margin: f32,
        bottom_margin: f32,
        line_spacing: f32,
        max_text_width: f32,
    ) -> Self {
        Self {
            page_height,
            top_margin,
            bottom_margin,
            line_spacing,
            max_text_width,
            first_page_top_margin: None,
        }
    }

    pub fn with_first_page_top_margin(mut self, margin: f32) -> Self {
        self.first_page_top_margin = Some(margin);
        self
    }

    fn first_cursor(&self) -> f32 {
        self.page_height - self.first_page_top_margin.unwrap_or(self.top_margin)
    }

    fn top_cursor(&self) -> f32 {
        self.page_height - self.top_margin
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// One width-bounded fragment of a source line, placed at baseline `y`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub text: String,
    pub class: LineClass,
    pub style: LineStyle,
    pub y: f32,
}

/// One physical page. `cursor` is where the next row would have been placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<Row>,
    pub cursor: f32,
}

impl Page {
    fn starting_at(cursor: f32) -> Self {
        Self {
            rows: Vec::new(),
            cursor,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// Lays `lines` out into pages.
///
/// Lines are trimmed; blank lines produce no row and do not move the cursor.
/// Each line is classified once and its style applies to all of its rows.
/// Always returns at least one page (empty input gives one empty page).
pub fn paginate<S, W>(lines: &[S], geometry: &PageGeometry, wrapper: &W) -> Vec<Page>
where
    S: AsRef<str>,
    W: TextWrapper + ?Sized,
{
    let mut pages: Vec<Page> = Vec::new();
    let mut current = Page::starting_at(geometry.first_cursor());

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        let class = classify(line);
        let style = class.style();
        let rows = wrapper.wrap(line, style.face, style.size, geometry.max_text_width);

        for text in rows {
            if current.cursor < geometry.bottom_margin {
                let full = std::mem::replace(&mut current, Page::starting_at(geometry.top_cursor()));
                pages.push(full);
            }
            current.rows.push(Row {
                text,
                class,
                style,
                y: current.cursor,
            });
            current.cursor -= geometry.line_spacing;
        }
    }

    pages.push(current);
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::AfmWrapper;

    /// Every non-blank line becomes exactly one row.
    fn single_row(text: &str, _face: FontFace, _size: f32, _width: f32) -> Vec<String> {
        vec![text.to_string()]
    }

    /// Splits on '|' so tests control exactly how many rows a line wraps into.
    fn pipe_rows(text: &str, _face: FontFace, _size: f32, _width: f32) -> Vec<String> {
        text.split('|').map(|s| s.trim().to_string()).collect()
    }

    fn small_geometry() -> PageGeometry {
        PageGeometry::new(100.0, 10.0, 10.0, 15.0, 80.0)
    }

    fn row_texts(page: &Page) -> Vec<&str> {
        page.rows.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_eleven_single_row_lines_make_two_pages() {
        let lines: Vec<String> = (1..=11).map(|i| format!("line {i}")).collect();
        let pages = paginate(&lines, &small_geometry(), &single_row);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows.len(), 6);
        assert_eq!(pages[1].rows.len(), 5);

        let ys: Vec<f32> = pages[0].rows.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![90.0, 75.0, 60.0, 45.0, 30.0, 15.0]);
        assert_eq!(pages[1].rows[0].y, 90.0);
        assert_eq!(pages[1].rows[0].text, "line 7");
    }

    #[test]
    fn test_rows_are_conserved() {
        let lines = vec![
            "a|b|c",
            "",
            "1. Correctness (0-5):",
            "d|e",
            "   ",
            "f|g|h|i|j|k|l",
            "m",
        ];
        let expected: usize = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| pipe_rows(l.trim(), FontFace::Helvetica, 10.0, 80.0).len())
            .sum();
        let pages = paginate(&lines, &small_geometry(), &pipe_rows);
        let emitted: usize = pages.iter().map(|p| p.rows.len()).sum();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_page_capacity_bound() {
        let geometry = PageGeometry::new(200.0, 20.0, 30.0, 12.0, 80.0);
        let lines: Vec<String> = (0..137).map(|i| format!("{i}|x|y")).collect();
        let pages = paginate(&lines, &geometry, &pipe_rows);
        let bound = geometry.page_height - geometry.top_margin - geometry.bottom_margin
            + geometry.line_spacing;
        for (i, page) in pages.iter().enumerate() {
            let used = page.rows.len() as f32 * geometry.line_spacing;
            assert!(used <= bound, "page {i} uses {used} > {bound}");
        }
    }

    #[test]
    fn test_blank_lines_do_not_affect_layout() {
        let geometry = small_geometry();
        let with_blanks = paginate(&["", "a", "", "b"], &geometry, &single_row);
        let without = paginate(&["a", "b"], &geometry, &single_row);
        assert_eq!(with_blanks, without);
    }

    #[test]
    fn test_wrap_crossing_threshold_moves_remaining_rows() {
        // Five single rows fill y=90..30; the sixth line wraps into three rows.
        let lines = vec!["r1", "r2", "r3", "r4", "r5", "w1|w2|w3"];
        let pages = paginate(&lines, &small_geometry(), &pipe_rows);

        assert_eq!(pages.len(), 2);
        assert_eq!(row_texts(&pages[0]), vec!["r1", "r2", "r3", "r4", "r5", "w1"]);
        assert_eq!(row_texts(&pages[1]), vec!["w2", "w3"]);
        assert_eq!(pages[1].rows[0].y, 90.0, "cursor resets to the top margin");
        assert_eq!(pages[1].rows[1].y, 75.0);
    }

    #[test]
    fn test_style_applies_to_every_wrapped_row() {
        let lines = vec!["1. Correctness (0-5):|continued heading", "plain|text"];
        let pages = paginate(&lines, &small_geometry(), &pipe_rows);
        let rows = &pages[0].rows;
        assert_eq!(rows[0].style, LineStyle::HEADING);
        assert_eq!(rows[1].style, LineStyle::HEADING);
        assert_eq!(rows[1].class, LineClass::Heading);
        assert_eq!(rows[2].style, LineStyle::BODY);
        assert_eq!(rows[3].style, LineStyle::BODY);
    }

    #[test]
    fn test_header_and_body_styles() {
        let lines = vec!["1. Correctness (0-5):", "Scored well overall"];
        let pages = paginate(&lines, &small_geometry(), &single_row);
        assert_eq!(pages[0].rows[0].style.face, FontFace::HelveticaBold);
        assert_eq!(pages[0].rows[1].style.face, FontFace::Helvetica);
    }

    #[test]
    fn test_wrapper_receives_selected_font() {
        let seen = std::cell::RefCell::new(Vec::new());
        let recording = |text: &str, face: FontFace, size: f32, width: f32| {
            seen.borrow_mut().push((face, size, width));
            vec![text.to_string()]
        };
        paginate(
            &["2. Adherence to Instructions (0-5):", "body"],
            &small_geometry(),
            &recording,
        );
        let seen = seen.into_inner();
        assert_eq!(seen[0], (FontFace::HelveticaBold, 12.0, 80.0));
        assert_eq!(seen[1], (FontFace::Helvetica, 10.0, 80.0));
    }

    #[test]
    fn test_lines_are_trimmed_before_classification() {
        let pages = paginate(&["   3. Code Quality (0-5):  "], &small_geometry(), &single_row);
        assert_eq!(pages[0].rows[0].text, "3. Code Quality (0-5):");
        assert_eq!(pages[0].rows[0].class, LineClass::Heading);
    }

    #[test]
    fn test_empty_input_yields_one_empty_page() {
        let lines: Vec<&str> = Vec::new();
        let pages = paginate(&lines, &small_geometry(), &single_row);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].rows.is_empty());
        assert_eq!(pages[0].cursor, 90.0);
    }

    #[test]
    fn test_first_page_top_margin_only_applies_once() {
        let geometry = small_geometry().with_first_page_top_margin(55.0);
        let lines: Vec<String> = (0..8).map(|i| format!("row {i}")).collect();
        let pages = paginate(&lines, &geometry, &single_row);
        // First page: 45, 30, 15 (then cursor 0 < 10).
        assert_eq!(pages[0].rows.len(), 3);
        assert_eq!(pages[0].rows[0].y, 45.0);
        assert_eq!(pages[1].rows[0].y, 90.0);
        assert_eq!(pages[1].rows.len(), 5);
    }

    #[test]
    fn test_source_order_preserved_across_pages() {
        let lines: Vec<String> = (0..40).map(|i| format!("{i}")).collect();
        let pages = paginate(&lines, &small_geometry(), &single_row);
        let flattened: Vec<String> = pages
            .iter()
            .flat_map(|p| p.rows.iter().map(|r| r.text.clone()))
            .collect();
        assert_eq!(flattened, lines);
    }

    #[test]
    fn test_pagination_is_deterministic() {
        let geometry = PageGeometry::new(792.0, 50.0, 50.0, 15.0, 512.0);
        let text = "Reasoning: the notebook loads the dataset, cleans missing values and \
                    trains a baseline model, but the evaluation cell is never executed.";
        let lines: Vec<&str> = std::iter::repeat(text).take(60).collect();
        let first = paginate(&lines, &geometry, &AfmWrapper);
        let second = paginate(&lines, &geometry, &AfmWrapper);
        assert_eq!(first, second);
        assert!(first.len() > 1);
    }
}
