/// Left margin of every report line, in points.
pub const LEFT_MARGIN: f32 = 50.0;
/// Distance from the top of the page to the first baseline, in points.
/// Keeps the overlay clear of the template's header block.
pub const TOP_OFFSET: f32 = 250.0;
/// Line pitch for the parameter modules (heart, diabetes).
pub const DENSE_LINE_PITCH: f32 = 20.0;
/// Line pitch for the imaging modules (breast, lung).
pub const SPACIOUS_LINE_PITCH: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub font_size: f32,
}

impl ReportLine {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
        }
    }

    /// `"{label} {value}"`, e.g. `"Age: 63"`.
    pub fn labeled(label: &str, value: &str, font_size: f32) -> Self {
        Self::new(format!("{label} {value}"), font_size)
    }
}

/// Ordered lines written top to bottom at a constant pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub lines: Vec<ReportLine>,
    pub line_pitch: f32,
}

impl ReportLayout {
    pub fn new(lines: Vec<ReportLine>, line_pitch: f32) -> Self {
        Self { lines, line_pitch }
    }

    /// Baseline of line `index` on a page whose top edge is at `page_top`.
    pub fn baseline(&self, index: usize, page_top: f32) -> f32 {
        page_top - TOP_OFFSET - index as f32 * self.line_pitch
    }

    /// Lines whose baseline falls below the page's bottom edge.
    pub fn overflow_count(&self, page_top: f32, page_bottom: f32) -> usize {
        (0..self.lines.len())
            .filter(|&i| self.baseline(i, page_top) < page_bottom)
            .count()
    }
}
