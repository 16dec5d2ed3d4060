use aria_desk_common::FontMetrics;

/// Byte capacity of one visual line; a longer run is wrapped regardless of
/// its measured width.
pub const LINE_BUFFER_BYTES: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// The character went onto the current line.
    Appended,
    /// Carriage return, dropped.
    Ignored,
    /// Newline, the current line is finished.
    Newline,
    /// The character does not fit; the current line is finished and the
    /// character was not consumed.
    Wrap,
}

/// 逐字符折行
///
/// Decides where visual lines end. The paginator and the reader's text
/// renderer both drive one of these so page boundaries match the drawing.
pub struct LineFitter<'m, M: FontMetrics + ?Sized> {
    metrics: &'m M,
    max_width: u32,
    width: u32,
    line: heapless::String<LINE_BUFFER_BYTES>,
}

impl<'m, M: FontMetrics + ?Sized> LineFitter<'m, M> {
    pub fn new(metrics: &'m M, max_width: u32) -> Self {
        Self {
            metrics,
            max_width,
            width: 0,
            line: heapless::String::new(),
        }
    }

    pub fn feed(&mut self, c: char) -> Feed {
        match c {
            '\r' => Feed::Ignored,
            '\n' => Feed::Newline,
            c => {
                let w = self.metrics.char_width(c);
                // an empty line takes anything, even a glyph wider than the
                // whole line, so wrapping always makes progress
                if !self.line.is_empty() && self.width + w > self.max_width {
                    return Feed::Wrap;
                }
                if self.line.push(c).is_err() {
                    return Feed::Wrap;
                }
                self.width += w;
                Feed::Appended
            }
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn take_line(&mut self) -> heapless::String<LINE_BUFFER_BYTES> {
        self.width = 0;
        core::mem::take(&mut self.line)
    }

    pub fn clear(&mut self) {
        self.width = 0;
        self.line.clear();
    }
}
