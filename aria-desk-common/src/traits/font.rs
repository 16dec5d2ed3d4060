use embedded_graphics::mono_font::MonoFont;

/// 文本宽度测量
///
/// Pagination and drawing must measure with the same implementation or the
/// computed page boundaries drift from what ends up on the panel.
pub trait FontMetrics {
    fn char_width(&self, c: char) -> u32;

    fn text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.char_width(c)).sum()
    }
}

impl FontMetrics for MonoFont<'_> {
    fn char_width(&self, _c: char) -> u32 {
        self.character_size.width + self.character_spacing
    }
}

/// Plain copy of a monospace font's advance, for contexts that must be
/// `Send + Sync`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonoMetrics {
    pub advance: u32,
}

impl MonoMetrics {
    pub fn of(font: &MonoFont<'_>) -> Self {
        Self {
            advance: font.character_size.width + font.character_spacing,
        }
    }
}

impl FontMetrics for MonoMetrics {
    fn char_width(&self, _c: char) -> u32 {
        self.advance
    }
}
