//! In-memory geometry model of a PDF document.
//!
//! The converters never talk to the PDF library directly: the loader in
//! [`pdfium`] materialises each page into positioned text runs and vector
//! rectangles, and everything downstream works on this model. Coordinates are
//! top-left origin with y growing downwards, matching the pixel offsets the
//! statement templates are described in.

pub mod pdfium;

/// Vertical distance within which two text runs count as the same line.
const LINE_TOLERANCE: f32 = 3.0;

/// Horizontal gap above which adjacent runs on a line get a joining space.
const JOIN_GAP: f32 = 1.0;

/// Axis-aligned rectangle, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// A positioned fragment of page text.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub rect: Rect,
}

impl TextRun {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        TextRun {
            text: text.into(),
            rect,
        }
    }
}

/// Bounding box of a vector path drawn on the page, with its fill flag.
///
/// The converters use filled rectangles ("row shading") to recover table row
/// boundaries.
#[derive(Debug, Clone)]
pub struct DrawnRect {
    pub rect: Rect,
    pub filled: bool,
}

/// One page of a loaded document.
#[derive(Debug, Clone)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub runs: Vec<TextRun>,
    pub drawings: Vec<DrawnRect>,
}

/// A text line assembled from runs, with its bounding rectangle.
struct Line {
    text: String,
    rect: Rect,
}

impl Page {
    /// Full page text, top-down, lines separated by `\n`.
    pub fn text(&self) -> String {
        self.text_in(Rect::new(0.0, 0.0, self.width, self.height))
    }

    /// Text of all runs whose centre lies within `clip`, assembled into lines.
    pub fn text_in(&self, clip: Rect) -> String {
        let lines = self.lines_in(clip);
        lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whitespace-normalised text of a single table cell.
    pub fn cell_text(&self, cell: Rect) -> String {
        self.text_in(cell).replace('\n', " ").trim().to_string()
    }

    /// Bounding rectangle of the first (topmost) line containing `needle`.
    pub fn find_text(&self, needle: &str) -> Option<Rect> {
        self.lines_in(Rect::new(0.0, 0.0, self.width, self.height))
            .into_iter()
            .find(|line| line.text.contains(needle))
            .map(|line| line.rect)
    }

    fn lines_in(&self, clip: Rect) -> Vec<Line> {
        let mut runs: Vec<&TextRun> = self
            .runs
            .iter()
            .filter(|run| {
                let cx = (run.rect.x0 + run.rect.x1) / 2.0;
                let cy = (run.rect.y0 + run.rect.y1) / 2.0;
                clip.contains_point(cx, cy)
            })
            .collect();
        runs.sort_by(|a, b| {
            let ay = (a.rect.y0 + a.rect.y1) / 2.0;
            let by = (b.rect.y0 + b.rect.y1) / 2.0;
            ay.total_cmp(&by).then(a.rect.x0.total_cmp(&b.rect.x0))
        });

        let mut lines: Vec<(Vec<&TextRun>, f32)> = Vec::new();
        for run in runs {
            let cy = (run.rect.y0 + run.rect.y1) / 2.0;
            match lines.last_mut() {
                Some((members, line_cy)) if (cy - *line_cy).abs() <= LINE_TOLERANCE => {
                    members.push(run);
                }
                _ => lines.push((vec![run], cy)),
            }
        }

        lines
            .into_iter()
            .map(|(mut members, _)| {
                members.sort_by(|a, b| a.rect.x0.total_cmp(&b.rect.x0));
                let mut text = String::new();
                let mut rect = members[0].rect;
                let mut previous_x1 = f32::NEG_INFINITY;
                for run in members {
                    if !text.is_empty() && run.rect.x0 - previous_x1 > JOIN_GAP {
                        text.push(' ');
                    }
                    text.push_str(&run.text);
                    previous_x1 = run.rect.x1;
                    rect.x0 = rect.x0.min(run.rect.x0);
                    rect.y0 = rect.y0.min(run.rect.y0);
                    rect.x1 = rect.x1.max(run.rect.x1);
                    rect.y1 = rect.y1.max(run.rect.y1);
                }
                Line { text, rect }
            })
            .collect()
    }
}

/// A fully loaded document: every page materialised up front, so the
/// per-bank converters run against plain memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32) -> TextRun {
        let width = text.len() as f32 * 5.0;
        TextRun::new(text, Rect::new(x, y, x + width, y + 10.0))
    }

    fn sample_page() -> Page {
        Page {
            width: 600.0,
            height: 800.0,
            runs: vec![
                run("Statement of Account", 50.0, 40.0),
                run("26 Dec 23", 40.0, 120.0),
                run("EFTPOS PURCHASE", 110.0, 120.0),
                run("50.00", 400.0, 120.0),
                run("27 Dec 23", 40.0, 140.0),
                run("DIRECT CREDIT", 110.0, 140.0),
                run("1,500.00", 480.0, 140.0),
                run("Important information", 40.0, 760.0),
            ],
            drawings: vec![],
        }
    }

    #[test]
    fn test_text_orders_lines_top_down() {
        let page = sample_page();
        let text = page.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Statement of Account");
        assert_eq!(lines[1], "26 Dec 23 EFTPOS PURCHASE 50.00");
        assert_eq!(lines[3], "Important information");
    }

    #[test]
    fn test_text_in_clips_by_run_centre() {
        let page = sample_page();
        let text = page.text_in(Rect::new(0.0, 100.0, 600.0, 200.0));
        assert_eq!(
            text,
            "26 Dec 23 EFTPOS PURCHASE 50.00\n27 Dec 23 DIRECT CREDIT 1,500.00"
        );
    }

    #[test]
    fn test_cell_text_normalises_whitespace() {
        let page = sample_page();
        // Cell spanning two lines vertically: newline collapsed to a space.
        let cell = Rect::new(0.0, 100.0, 100.0, 200.0);
        assert_eq!(page.cell_text(cell), "26 Dec 23 27 Dec 23");
        // Cell over a single column.
        let cell = Rect::new(100.0, 110.0, 390.0, 130.0);
        assert_eq!(page.cell_text(cell), "EFTPOS PURCHASE");
        // Empty cell.
        let cell = Rect::new(500.0, 110.0, 590.0, 130.0);
        assert_eq!(page.cell_text(cell), "");
    }

    #[test]
    fn test_find_text_returns_line_rect() {
        let page = sample_page();
        let rect = page.find_text("Important").unwrap();
        assert_eq!(rect.y0, 760.0);
        assert!(page.find_text("no such phrase").is_none());
    }

    #[test]
    fn test_find_text_matches_phrase_across_runs() {
        let page = sample_page();
        // "EFTPOS PURCHASE 50.00" only exists as an assembled line.
        assert!(page.find_text("PURCHASE 50.00").is_some());
    }
}
