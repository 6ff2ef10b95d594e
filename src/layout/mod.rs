use std::str::FromStr;

/// Outer page margin, also the clearance used by the centering rule.
pub const MARGIN_MM: f32 = 10.0;
/// Inset of the decorative border from the page edges.
pub const BORDER_INSET_MM: f32 = 5.0;
pub const BORDER_LINE_PT: f32 = 1.2;
/// Border stroke color (label blue), RGB in 0..1.
pub const BORDER_COLOR: (f32, f32, f32) = (0.10, 0.21, 0.48);

/// Baseline of the bold title line, measured from the top of the page.
pub const TITLE_TOP_MM: f32 = 18.0;
pub const TITLE_SIZE_PT: f32 = 16.0;
/// Gap between the title baseline and the first body line.
pub const TITLE_GAP_MM: f32 = 8.0;

pub const BODY_SIZE_PT: f32 = 11.0;
pub const LINE_HEIGHT_MM: f32 = 6.0;
/// Column width of the wrapped body text block.
pub const BODY_WRAP_COLS: usize = 48;

pub const QR_SIZE_MM: f32 = 40.0;
pub const LOGO_WIDTH_MM: f32 = 18.0;
pub const LOGO_HEIGHT_MM: f32 = 12.0;
pub const LOGO_TOP_MM: f32 = 7.0;

/// Supported page formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
    A5,
}

impl PageSize {
    fn portrait_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "a5" => Ok(PageSize::A5),
            other => Err(format!("unknown page size '{other}' (expected a4 or a5)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!(
                "unknown orientation '{other}' (expected portrait or landscape)"
            )),
        }
    }
}

/// Resolved page dimensions in millimeters.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Geometry {
    pub fn new(size: PageSize, orientation: Orientation) -> Self {
        let (w, h) = size.portrait_mm();
        match orientation {
            Orientation::Portrait => Self {
                width_mm: w,
                height_mm: h,
            },
            Orientation::Landscape => Self {
                width_mm: h,
                height_mm: w,
            },
        }
    }

    /// The label content lives in the upper half of the page.
    pub fn half_height_mm(&self) -> f32 {
        self.height_mm / 2.0
    }
}

/// Vertical cursor for one page, measured in millimeters from the top.
/// Threaded explicitly through the layout steps so each step's effect on
/// the cursor is visible at the call site.
#[derive(Debug, Clone, Copy)]
pub struct PageLayoutState {
    cursor_mm: f32,
}

impl PageLayoutState {
    pub fn new(start_mm: f32) -> Self {
        Self { cursor_mm: start_mm }
    }

    pub fn position(&self) -> f32 {
        self.cursor_mm
    }

    pub fn advance(&mut self, delta_mm: f32) {
        self.cursor_mm += delta_mm;
    }

    /// Center the trailing metadata block in the unused lower part of the
    /// label area: advance by half the remaining space when there is any.
    /// Returns the remaining space that was measured.
    pub fn center_in_leftover(&mut self, half_height_mm: f32, margin_mm: f32) -> f32 {
        let remaining = half_height_mm - self.cursor_mm - margin_mm;
        if remaining > 0.0 {
            self.cursor_mm += remaining / 2.0;
        }
        remaining
    }
}

/// Word-wrap `text` at approximately `width` columns. Words longer than
/// the width occupy a line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + word.len() + 1 > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_landscape_swaps_dimensions() {
        let geometry = Geometry::new(PageSize::A5, Orientation::Landscape);
        assert_eq!(geometry.width_mm, 210.0);
        assert_eq!(geometry.height_mm, 148.0);
        assert_eq!(geometry.half_height_mm(), 74.0);
    }

    #[test]
    fn test_page_size_parses_case_insensitively() {
        assert_eq!("A4".parse::<PageSize>().unwrap(), PageSize::A4);
        assert_eq!("l".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert!("letter".parse::<PageSize>().is_err());
    }

    #[test]
    fn test_center_in_leftover_advances_half_the_remaining_space() {
        let mut state = PageLayoutState::new(40.0);
        let remaining = state.center_in_leftover(74.0, 10.0);
        assert_eq!(remaining, 24.0);
        assert_eq!(state.position(), 52.0);
    }

    #[test]
    fn test_center_in_leftover_never_moves_backwards() {
        let mut state = PageLayoutState::new(70.0);
        let remaining = state.center_in_leftover(74.0, 10.0);
        assert!(remaining < 0.0);
        assert_eq!(state.position(), 70.0);
    }

    #[test]
    fn test_wrap_text_keeps_lines_within_width() {
        let text = "pallets of mixed hardware delivered to the north dock for assembly";
        let lines = wrap_text(text, 20);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 20, "line too long: {line}");
        }
    }

    #[test]
    fn test_wrap_text_handles_long_words_and_empty_input() {
        let lines = wrap_text("antidisestablishmentarianism", 10);
        assert_eq!(lines, vec!["antidisestablishmentarianism".to_string()]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
