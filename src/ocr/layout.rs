// src/ocr/layout.rs
//! Rebuilds reading order from recognized word boxes.
//!
//! Words arrive in whatever order the recognizer emits them. They are grouped
//! into lines by vertical position, each line is ordered left to right and the
//! lines top to bottom.

use serde::Deserialize;

use super::error::OcrError;

/// Fraction of a word's own height used as its line-membership band.
pub const DEFAULT_VERTICAL_TOLERANCE: f64 = 1.0 / 3.0;

/// Four corner points flattened as `[x1, y1, x2, y2, x3, y3, x4, y4]`.
///
/// Corners are top-left, top-right, bottom-right, bottom-left. Boxes are
/// treated as upright rectangles: index 0 is the left edge, indices 1 and 5
/// are the top and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct BoundingBox([f64; 8]);

impl BoundingBox {
    pub fn new(points: [f64; 8]) -> Result<Self, OcrError> {
        if let Some(bad) = points.iter().find(|v| !v.is_finite()) {
            return Err(OcrError::InvalidInput(format!(
                "bounding box coordinate is not finite: {}",
                bad
            )));
        }
        Ok(Self(points))
    }

    /// Axis-aligned box from its left/top/right/bottom edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Result<Self, OcrError> {
        Self::new([left, top, right, top, right, bottom, left, bottom])
    }

    pub fn left(&self) -> f64 {
        self.0[0]
    }

    pub fn top(&self) -> f64 {
        self.0[1]
    }

    pub fn bottom(&self) -> f64 {
        self.0[5]
    }

    pub fn height(&self) -> f64 {
        (self.bottom() - self.top()).abs()
    }

    pub fn center_y(&self) -> f64 {
        (self.top() + self.bottom()) / 2.0
    }
}

impl TryFrom<Vec<f64>> for BoundingBox {
    type Error = OcrError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let len = values.len();
        let points: [f64; 8] = values.try_into().map_err(|_| {
            OcrError::InvalidInput(format!("bounding box needs 8 numbers, got {}", len))
        })?;
        Self::new(points)
    }
}

/// A recognized text element and its box, as returned by the recognizer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,
    pub bounding_box: BoundingBox,
}

impl Word {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bounding_box,
        }
    }
}

/// Words sharing a vertical band.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Center of the first word placed on the line. Never moves afterwards.
    pub vertical_center: f64,
    pub words: Vec<Word>,
}

impl Line {
    fn starting_with(word: Word, vertical_center: f64) -> Self {
        Self {
            vertical_center,
            words: vec![word],
        }
    }

    /// Space-joined text of the non-empty words.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .filter(|w| !w.text.is_empty())
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Cluster one page's words into ordered lines.
///
/// Each word is compared against existing lines in creation order and joins
/// the first one whose center lies within `height * vertical_tolerance_ratio`
/// of the word's own center. Ties therefore go to the earliest line, not the
/// nearest one.
pub fn group_words_into_lines<I>(words: I, vertical_tolerance_ratio: f64) -> Vec<Line>
where
    I: IntoIterator<Item = Word>,
{
    let mut lines: Vec<Line> = Vec::new();

    for word in words {
        let center_y = word.bounding_box.center_y();
        let tolerance = word.bounding_box.height() * vertical_tolerance_ratio;

        match lines
            .iter_mut()
            .find(|line| (line.vertical_center - center_y).abs() <= tolerance)
        {
            Some(line) => line.words.push(word),
            None => lines.push(Line::starting_with(word, center_y)),
        }
    }

    for line in &mut lines {
        line.words
            .sort_by(|a, b| a.bounding_box.left().total_cmp(&b.bounding_box.left()));
    }
    lines.sort_by(|a, b| a.vertical_center.total_cmp(&b.vertical_center));

    lines
}

pub fn render_page(lines: &[Line]) -> String {
    lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
}

/// Page-ordered words to a single transcript, one `\n` between pages.
pub fn reconstruct_document<P>(pages: P) -> String
where
    P: IntoIterator,
    P::Item: IntoIterator<Item = Word>,
{
    reconstruct_pages(pages, DEFAULT_VERTICAL_TOLERANCE).join("\n")
}

/// Per-page transcripts, in input order.
pub fn reconstruct_pages<P>(pages: P, vertical_tolerance_ratio: f64) -> Vec<String>
where
    P: IntoIterator,
    P::Item: IntoIterator<Item = Word>,
{
    pages
        .into_iter()
        .map(|page| render_page(&group_words_into_lines(page, vertical_tolerance_ratio)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, left: f64, center_y: f64, height: f64) -> Word {
        let half = height / 2.0;
        Word::new(
            text,
            BoundingBox::from_edges(left, center_y - half, left + 10.0, center_y + half).unwrap(),
        )
    }

    #[test]
    fn test_words_on_same_band_merge() {
        let words = vec![
            word("Janeiro", 30.0, 10.1, 1.0),
            word("Rio", 0.0, 10.0, 1.0),
            word("de", 15.0, 10.2, 1.0),
        ];

        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);

        assert_eq!(lines.len(), 1);
        assert_eq!(render_page(&lines), "Rio de Janeiro");
    }

    #[test]
    fn test_distant_words_stay_apart_and_sorted() {
        let words = vec![word("below", 0.0, 50.0, 6.0), word("above", 0.0, 10.0, 6.0)];

        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].vertical_center, 10.0);
        assert_eq!(lines[1].vertical_center, 50.0);
        assert_eq!(render_page(&lines), "above\nbelow");
    }

    #[test]
    fn test_empty_page() {
        let lines = group_words_into_lines(Vec::new(), DEFAULT_VERTICAL_TOLERANCE);
        assert!(lines.is_empty());
        assert_eq!(render_page(&lines), "");
    }

    #[test]
    fn test_document_keeps_empty_pages() {
        let pages = vec![
            vec![word("A", 0.0, 5.0, 3.0)],
            vec![],
            vec![word("B", 0.0, 5.0, 3.0)],
        ];
        assert_eq!(reconstruct_document(pages), "A\n\nB");
    }

    #[test]
    fn test_empty_text_is_skipped_without_breaking_line() {
        let words = vec![
            word("Nome:", 0.0, 20.0, 3.0),
            word("", 12.0, 20.0, 3.0),
            word("Maria", 24.0, 20.3, 3.0),
        ];

        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words.len(), 3);
        assert_eq!(render_page(&lines), "Nome: Maria");
    }

    #[test]
    fn test_first_created_line_wins_overlapping_band() {
        // Height 6 gives a band of 2: the last word (center 11) is within
        // reach of both lines (10 and 12) and must join the one created first.
        let words = vec![
            word("first", 0.0, 12.0, 0.3),
            word("second", 0.0, 10.0, 0.3),
            word("tie", 20.0, 11.0, 6.0),
        ];

        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "second");
        assert_eq!(lines[1].text(), "first tie");
    }

    #[test]
    fn test_line_center_fixed_by_first_word() {
        let words = vec![
            word("a", 0.0, 10.0, 3.0),
            word("b", 5.0, 10.9, 3.0),
            word("c", 9.0, 11.8, 3.0),
        ];

        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);

        // "c" is 1.8 away from the anchor 10.0, beyond its band of 1.0,
        // even though it is close to "b".
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].vertical_center, 10.0);
        assert_eq!(lines[0].text(), "a b");
        assert_eq!(lines[1].text(), "c");
    }

    #[test]
    fn test_tolerance_uses_word_height() {
        // Small anchor, tall follower: the follower's own band decides.
        let words = vec![word("small", 0.0, 10.0, 1.0), word("TALL", 20.0, 12.0, 9.0)];
        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);
        assert_eq!(lines.len(), 1);

        let words = vec![word("TALL", 20.0, 12.0, 9.0), word("small", 0.0, 10.0, 1.0)];
        let lines = group_words_into_lines(words, DEFAULT_VERTICAL_TOLERANCE);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_coverage_and_monotonicity() {
        let mut words = Vec::new();
        for row in 0..7 {
            for col in 0..5 {
                let x = ((col * 37 + row * 11) % 5) as f64 * 20.0;
                let y = row as f64 * 15.0 + (col as f64) * 0.1;
                words.push(word(&format!("r{}c{}", row, col), x, y, 4.0));
            }
        }
        words.reverse();
        let input_len = words.len();

        let lines = group_words_into_lines(words.clone(), DEFAULT_VERTICAL_TOLERANCE);

        let mut seen: Vec<String> = lines
            .iter()
            .flat_map(|l| l.words.iter().map(|w| w.text.clone()))
            .collect();
        let mut expected: Vec<String> = words.iter().map(|w| w.text.clone()).collect();
        seen.sort();
        expected.sort();
        assert_eq!(seen.len(), input_len);
        assert_eq!(seen, expected);

        assert!(lines
            .windows(2)
            .all(|pair| pair[0].vertical_center <= pair[1].vertical_center));
        for line in &lines {
            assert!(line
                .words
                .windows(2)
                .all(|pair| pair[0].bounding_box.left() <= pair[1].bounding_box.left()));
        }
    }

    #[test]
    fn test_render_is_repeatable() {
        let lines = group_words_into_lines(
            vec![word("x", 5.0, 1.0, 2.0), word("y", 0.0, 1.0, 2.0)],
            DEFAULT_VERTICAL_TOLERANCE,
        );
        assert_eq!(render_page(&lines), render_page(&lines));
        assert_eq!(render_page(&lines), "y x");
    }

    #[test]
    fn test_bounding_box_rejects_wrong_arity() {
        let err = BoundingBox::try_from(vec![0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, OcrError::InvalidInput(_)));

        let parsed: Result<Word, _> =
            serde_json::from_str(r#"{"text":"oi","boundingBox":[1,2,3,4]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_word_deserializes_from_read_line() {
        let w: Word = serde_json::from_str(
            r#"{"boundingBox":[10,20,90,20,90,32,10,32],"text":"Experiência","appearance":{}}"#,
        )
        .unwrap();
        assert_eq!(w.text, "Experiência");
        assert_eq!(w.bounding_box.left(), 10.0);
        assert_eq!(w.bounding_box.center_y(), 26.0);
        assert_eq!(w.bounding_box.height(), 12.0);
    }
}
