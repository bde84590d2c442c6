//! Table-cell reconstruction from boundary coordinates.
//!
//! Each bank converter derives candidate column/row boundaries from fixed
//! template offsets plus the edges of drawn rectangles, cleans them up, and
//! forms a grid of cell bounding boxes to read text out of.

use crate::pdf::{Page, Rect};

/// Sort boundary coordinates and drop near-duplicates.
pub fn sorted_edges(values: impl IntoIterator<Item = f32>) -> Vec<f32> {
    let mut edges: Vec<f32> = values.into_iter().collect();
    edges.sort_by(f32::total_cmp);
    edges.dedup_by(|a, b| (*a - *b).abs() < 0.5);
    edges
}

/// Remove drawing-artifact coordinates from a sorted list: of any two values
/// closer than `min_gap`, the larger one is dropped.
pub fn merge_close(values: &mut Vec<f32>, min_gap: f32) {
    let mut index = values.len();
    while index > 1 {
        index -= 1;
        if values[index] - values[index - 1] <= min_gap {
            values.remove(index);
        }
    }
}

/// Form the grid of cell bounding boxes. Row `i`, column `j` spans
/// `xs[j]..xs[j+1]` by `ys[i]..ys[i+1]`.
pub fn cell_rows(xs: &[f32], ys: &[f32]) -> Vec<Vec<Rect>> {
    let mut rows = Vec::new();
    for window_y in ys.windows(2) {
        let mut row = Vec::new();
        for window_x in xs.windows(2) {
            row.push(Rect::new(window_x[0], window_y[0], window_x[1], window_y[1]));
        }
        rows.push(row);
    }
    rows
}

/// Extract the text of every cell in the grid.
pub fn extract_rows(page: &Page, xs: &[f32], ys: &[f32]) -> Vec<Vec<String>> {
    cell_rows(xs, ys)
        .into_iter()
        .map(|row| row.into_iter().map(|cell| page.cell_text(cell)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::TextRun;
    use rstest::rstest;

    #[test]
    fn test_sorted_edges_sorts_and_dedups() {
        let edges = sorted_edges(vec![100.0, 20.0, 100.2, 80.0, 20.0]);
        assert_eq!(edges, vec![20.0, 80.0, 100.0]);
    }

    #[rstest]
    #[case(vec![10.0, 15.0, 40.0], 8.0, vec![10.0, 40.0])]
    #[case(vec![10.0, 20.0, 30.0], 8.0, vec![10.0, 20.0, 30.0])]
    #[case(vec![10.0, 13.0, 16.0, 50.0], 8.0, vec![10.0, 50.0])]
    #[case(vec![10.0], 8.0, vec![10.0])]
    #[case(vec![], 8.0, vec![])]
    fn test_merge_close(
        #[case] mut values: Vec<f32>,
        #[case] min_gap: f32,
        #[case] expected: Vec<f32>,
    ) {
        merge_close(&mut values, min_gap);
        assert_eq!(values, expected);
    }

    #[test]
    fn test_cell_rows_shape() {
        let rows = cell_rows(&[0.0, 100.0, 200.0], &[0.0, 50.0, 100.0, 150.0]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1][1], Rect::new(100.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_extract_rows_reads_cell_text() {
        let page = Page {
            width: 300.0,
            height: 200.0,
            runs: vec![
                TextRun::new("26 Dec 23", Rect::new(10.0, 20.0, 60.0, 30.0)),
                TextRun::new("PURCHASE", Rect::new(110.0, 20.0, 160.0, 30.0)),
                TextRun::new("27 Dec 23", Rect::new(10.0, 70.0, 60.0, 80.0)),
            ],
            drawings: vec![],
        };
        let rows = extract_rows(&page, &[0.0, 100.0, 300.0], &[0.0, 50.0, 100.0]);
        assert_eq!(rows, vec![
            vec!["26 Dec 23".to_string(), "PURCHASE".to_string()],
            vec!["27 Dec 23".to_string(), String::new()],
        ]);
    }
}
