//! Largest-font-size-that-fits search for a wrapped block of text.

use fontdue::Font;

/// Fixed wrap column. Wrapping is a character-count heuristic, not a
/// per-glyph width measurement.
pub const WRAP_COLUMNS: usize = 40;

/// Extra pixels between lines, on top of the glyph box height.
pub const LINE_LEADING: f32 = 10.0;

/// Candidate font sizes step down by this much.
const SIZE_STEP: u32 = 5;

/// Text measurement needed by the fitter. Implemented for [`fontdue::Font`];
/// tests substitute a deterministic fake.
pub trait TextMetrics {
    /// Height of one wrapped line at `size`, leading included.
    fn line_height(&self, size: f32) -> f32;
    /// Rendered width of `line` at `size`.
    fn line_width(&self, line: &str, size: f32) -> f32;
}

impl TextMetrics for Font {
    fn line_height(&self, size: f32) -> f32 {
        // The 'A' glyph box stands in for the cap height, as the renderer's
        // baseline does.
        self.metrics('A', size).height as f32 + LINE_LEADING
    }

    fn line_width(&self, line: &str, size: f32) -> f32 {
        line.chars()
            .map(|ch| self.metrics(ch, size).advance_width)
            .sum()
    }
}

/// Outcome of a fitting search. `Overflow` means no candidate size kept the
/// block inside the box and the minimum size is returned regardless.
#[derive(Debug, Clone, PartialEq)]
pub enum FitResult {
    Fit { size: u32, lines: Vec<String> },
    Overflow { size: u32, lines: Vec<String> },
}

impl FitResult {
    pub fn size(&self) -> u32 {
        match self {
            FitResult::Fit { size, .. } | FitResult::Overflow { size, .. } => *size,
        }
    }

    pub fn into_parts(self) -> (u32, Vec<String>) {
        match self {
            FitResult::Fit { size, lines } | FitResult::Overflow { size, lines } => (size, lines),
        }
    }
}

/// Split on explicit newlines, then greedily word-wrap each paragraph at
/// `columns` characters. Words longer than a full column are broken.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, columns, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, columns: usize, lines: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_chars = 0usize;

    for word in paragraph.split_whitespace() {
        let mut word = word;
        let mut word_chars = word.chars().count();

        while word_chars > columns {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            let split = word
                .char_indices()
                .nth(columns)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split].to_string());
            word = &word[split..];
            word_chars -= columns;
        }
        if word.is_empty() {
            continue;
        }

        if line.is_empty() {
            line.push_str(word);
            line_chars = word_chars;
        } else if line_chars + 1 + word_chars <= columns {
            line.push(' ');
            line.push_str(word);
            line_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_chars = word_chars;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
}

/// Find the largest size in `[min_size, max_size]` (stepping down by 5) at
/// which the wrapped text stays within `max_width` × `max_height`. The first
/// candidate satisfying both constraints wins; if none does, the block is
/// returned at `min_size` as [`FitResult::Overflow`].
pub fn fit(
    text: &str,
    metrics: &dyn TextMetrics,
    max_width: f32,
    max_height: f32,
    max_size: u32,
    min_size: u32,
) -> FitResult {
    let lines = wrap(text, WRAP_COLUMNS);

    let mut size = max_size.max(min_size);
    loop {
        if block_fits(&lines, metrics, size, max_width, max_height) {
            return FitResult::Fit { size, lines };
        }
        match size.checked_sub(SIZE_STEP) {
            Some(next) if next >= min_size => size = next,
            _ => break,
        }
    }

    FitResult::Overflow {
        size: min_size,
        lines,
    }
}

fn block_fits(
    lines: &[String],
    metrics: &dyn TextMetrics,
    size: u32,
    max_width: f32,
    max_height: f32,
) -> bool {
    let size = size as f32;
    let total_height = metrics.line_height(size) * lines.len() as f32;
    let widest = lines
        .iter()
        .map(|line| metrics.line_width(line, size))
        .fold(0.0f32, f32::max);
    total_height <= max_height && widest <= max_width
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every character is `size * 0.5` wide and a line is `size + 10.0`
    /// tall, so fits are easy to predict by hand.
    struct FakeMetrics;

    impl TextMetrics for FakeMetrics {
        fn line_height(&self, size: f32) -> f32 {
            size + LINE_LEADING
        }

        fn line_width(&self, line: &str, size: f32) -> f32 {
            line.chars().count() as f32 * size * 0.5
        }
    }

    #[test]
    fn test_wrap_preserves_paragraph_breaks() {
        let lines = wrap("\"stay hungry\"\n– jobs", WRAP_COLUMNS);
        assert_eq!(lines, vec!["\"stay hungry\"", "– jobs"]);
    }

    #[test]
    fn test_wrap_breaks_at_column_limit() {
        let lines = wrap("aaa bbb ccc", 7);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_wrap_splits_overlong_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_drops_blank_paragraphs() {
        let lines = wrap("one\n\ntwo", WRAP_COLUMNS);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn test_fit_returns_max_size_when_everything_fits() {
        // One 5-char line: widest = 5 * 80 * 0.5 = 200, height = 90.
        let result = fit("hello", &FakeMetrics, 500.0, 200.0, 80, 20);
        assert_eq!(result, FitResult::Fit {
            size: 80,
            lines: vec!["hello".to_string()],
        });
    }

    #[test]
    fn test_fit_takes_largest_passing_candidate() {
        // Width cap of 100 admits a 5-char line only once 5 * s * 0.5 <= 100,
        // i.e. s <= 40; the candidate ladder 80, 75, ... first passes at 40.
        let result = fit("hello", &FakeMetrics, 100.0, 1000.0, 80, 20);
        assert_eq!(result.size(), 40);
        assert!(matches!(result, FitResult::Fit { .. }));
    }

    #[test]
    fn test_fit_overflow_at_minimum_is_observable() {
        let result = fit("hello", &FakeMetrics, 10.0, 10.0, 80, 20);
        assert_eq!(result, FitResult::Overflow {
            size: 20,
            lines: vec!["hello".to_string()],
        });
    }

    #[test]
    fn test_fit_size_stays_within_bounds() {
        let long = "long word ".repeat(120);
        for text in ["", "short", long.as_str()] {
            for (max, min) in [(160, 30), (80, 20), (23, 20), (20, 20)] {
                let size = fit(text, &FakeMetrics, 700.0, 400.0, max, min).size();
                assert!(size >= min && size <= max, "size {size} outside [{min}, {max}]");
            }
        }
    }

    #[test]
    fn test_fit_empty_text_fits_at_max() {
        let result = fit("", &FakeMetrics, 1.0, 1.0, 60, 20);
        assert_eq!(result, FitResult::Fit {
            size: 60,
            lines: Vec::new(),
        });
    }
}
