use aria_desk_common::*;
use alloc::{format, string::String, sync::Arc, vec::Vec};
use embassy_time::{Duration, Instant};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use super::{MUSIC_PAGE, READER_PAGE, widgets};
use crate::scheduler::{Page, PageContext, RenderContext};

const VISIBLE_ROWS: usize = 5;
const POLL_INTERVAL: Duration = Duration::from_secs(2);
const AUDIO_EXTENSIONS: [&str; 4] = ["mp3", "wav", "flac", "aac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Dir,
    Text,
    Audio,
    Other,
}

fn kind_of(entry: &DirEntry) -> Kind {
    if entry.is_dir {
        return Kind::Dir;
    }
    let Some((_, ext)) = entry.name.rsplit_once('.') else {
        return Kind::Other;
    };
    if ext.eq_ignore_ascii_case("txt") {
        Kind::Text
    } else if AUDIO_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)) {
        Kind::Audio
    } else {
        Kind::Other
    }
}

fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{}{}", dir, name)
    } else {
        format!("{}/{}", dir, name)
    }
}

fn parent(dir: &str) -> Option<&str> {
    if dir == "/" {
        return None;
    }
    match dir.trim_end_matches('/').rfind('/') {
        Some(0) | None => Some("/"),
        Some(i) => Some(&dir[..i]),
    }
}

/// 文件浏览页面
pub struct FilesPage<F: FileSystem> {
    fs: Arc<F>,
    cwd: String,
    entries: Vec<DirEntry>,
    highlight: Option<usize>,
    top: usize,
    available: Option<bool>,
    last_poll: Option<Instant>,
}

impl<F: FileSystem> FilesPage<F> {
    pub fn new(fs: Arc<F>) -> Self {
        Self {
            fs,
            cwd: String::from("/"),
            entries: Vec::new(),
            highlight: None,
            top: 0,
            available: None,
            last_poll: None,
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// Re-read the medium state and the listing. Returns whether anything
    /// the page shows changed.
    fn poll(&mut self, now: Instant) -> bool {
        self.last_poll = Some(now);
        let available = self.fs.is_available();
        let entries = if available {
            match self.fs.list_dir(&self.cwd) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("listing {} failed: {:?}", self.cwd, e);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let changed = self.available != Some(available) || entries != self.entries;
        if changed {
            if self.available != Some(available) {
                info!("storage {}", if available { "mounted" } else { "removed" });
            }
            if !available {
                self.cwd = String::from("/");
            }
            self.available = Some(available);
            self.entries = entries;
            self.highlight = self.highlight.filter(|h| *h < self.entries.len());
            self.scroll_to_highlight();
        }
        changed
    }

    fn change_dir(&mut self, dir: String, now: Instant) {
        debug!("cd {}", dir);
        self.cwd = dir;
        self.entries.clear();
        self.highlight = None;
        self.top = 0;
        self.poll(now);
    }

    fn scroll_to_highlight(&mut self) {
        match self.highlight {
            None => self.top = 0,
            Some(h) if h < self.top => self.top = h,
            Some(h) if h >= self.top + VISIBLE_ROWS => self.top = h + 1 - VISIBLE_ROWS,
            Some(_) => {}
        }
    }
}

impl<D: Panel, F: FileSystem> Page<D> for FilesPage<F> {
    fn name(&self) -> &'static str {
        "files"
    }

    fn render(&mut self, display: &mut D, _full: bool, cx: &RenderContext) -> Result<(), D::Error> {
        if self.last_poll.is_none() {
            self.poll(cx.now);
        }
        display.clear(BinaryColor::Off)?;
        let width = display.size().width;

        if self.available != Some(true) {
            widgets::text(display, "No SD card", 10, 40)?;
            widgets::text(display, "insert a card to browse files", 10, 40 + widgets::LINE_HEIGHT)?;
            return widgets::footer(display, "", "");
        }

        widgets::text(display, &widgets::fit_to_width(&self.cwd, width - 10), 5, 4)?;
        widgets::hline(display, 4 + widgets::LINE_HEIGHT)?;
        if self.entries.is_empty() {
            widgets::text(display, "(empty)", 10, 24)?;
        }
        let rows = self.entries.iter().enumerate().skip(self.top).take(VISIBLE_ROWS);
        for (row, (i, entry)) in rows.enumerate() {
            let y = 24 + row as i32 * widgets::LINE_HEIGHT;
            let label = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let label = widgets::fit_to_width(&label, width - 20);
            widgets::text_maybe_inverted(display, &label, 10, y, self.highlight == Some(i))?;
        }

        let count = format!("{} items", self.entries.len());
        widgets::footer(display, "< back", &count)
    }

    fn on_left(&mut self, cx: &mut PageContext) -> bool {
        if let Some(up) = parent(&self.cwd) {
            let up = String::from(up);
            self.change_dir(up, cx.now);
            cx.request_render(false);
            return true;
        }
        if self.highlight.take().is_some() {
            self.top = 0;
            cx.request_render(false);
            return true;
        }
        false
    }

    fn on_right(&mut self, cx: &mut PageContext) -> bool {
        let Some(entry) = self.highlight.and_then(|h| self.entries.get(h)) else {
            return false;
        };
        let path = join(&self.cwd, &entry.name);
        match kind_of(entry) {
            Kind::Dir => {
                self.change_dir(path, cx.now);
                cx.request_render(false);
            }
            Kind::Text => cx.open(READER_PAGE, &path),
            Kind::Audio => cx.open(MUSIC_PAGE, &path),
            Kind::Other => debug!("no viewer for {}", path),
        }
        true
    }

    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        if self.entries.is_empty() {
            return true;
        }
        self.highlight = match self.highlight {
            None => Some(0),
            Some(h) if h + 1 < self.entries.len() => Some(h + 1),
            Some(_) => None,
        };
        self.scroll_to_highlight();
        cx.request_render(false);
        true
    }

    fn on_enter(&mut self) {
        self.last_poll = None;
    }

    fn maintain(&mut self, cx: &mut PageContext) {
        let due = self
            .last_poll
            .is_none_or(|at| cx.now.saturating_duration_since(at) >= POLL_INTERVAL);
        if due && self.poll(cx.now) {
            cx.request_render(false);
        }
    }
}
