use aria_desk_common::*;
use alloc::{format, rc::Rc, string::String, sync::Arc, vec::Vec};
use embassy_time::{Duration, Instant};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

use super::{FILES_PAGE, widgets};
use crate::pagination::{Feed, Layout, LineFitter, Paginator, PrecomputeQueue};
use crate::scheduler::{Page, PageContext, RenderContext};

const TEXT_TOP: i32 = 4;
const PROMPT: &str = "hold 2s to exit";
/// Pages computed synchronously on open so the first flips never wait.
const OPEN_PAGES: usize = 2;
const BOOKMARK_CAPACITY: usize = 8;

/// Preference key of the reading position for `path`.
fn bookmark_key(path: &str) -> String {
    let hash = path
        .bytes()
        .fold(0u16, |h, b| h.wrapping_mul(31).wrapping_add(b as u16));
    format!("p{}", hash)
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split `text` into the visual lines the paginator counted.
fn wrap_lines<M: FontMetrics + ?Sized>(text: &str, metrics: &M, layout: Layout) -> Vec<String> {
    let mut lines = Vec::new();
    let mut fitter = LineFitter::new(metrics, layout.max_width);
    for c in text.chars() {
        match fitter.feed(c) {
            Feed::Appended | Feed::Ignored => {}
            Feed::Newline => lines.push(String::from(fitter.take_line().as_str())),
            Feed::Wrap => {
                lines.push(String::from(fitter.take_line().as_str()));
                fitter.feed(c);
            }
        }
    }
    if !fitter.is_empty() {
        lines.push(String::from(fitter.line()));
    }
    lines.truncate(layout.lines_per_page as usize);
    lines
}

struct Document<F: FileSystem> {
    engine: Arc<Paginator<F, MonoMetrics>>,
    page: usize,
}

/// 电子书阅读页面
///
/// Left/Right turn pages, Center shows the exit prompt and holding Center
/// for [`ReaderConfig::hold_to_exit_ms`] goes back to the file list. The
/// page number is saved per file on every turn.
pub struct ReaderPage<F, K>
where
    F: FileSystem + Send + Sync + 'static,
    K: KeyValueStore,
{
    fs: Arc<F>,
    store: Rc<K>,
    layout: Layout,
    lookahead: usize,
    hold_to_exit: Duration,
    queue: Option<&'static PrecomputeQueue>,
    doc: Option<Document<F>>,
    prompt_since: Option<Instant>,
    shown_minute: Option<(i8, i8)>,
}

impl<F, K> ReaderPage<F, K>
where
    F: FileSystem + Send + Sync + 'static,
    K: KeyValueStore,
{
    pub fn new(fs: Arc<F>, store: Rc<K>, config: &ReaderConfig, panel_width: u32) -> Self {
        Self {
            fs,
            store,
            layout: Layout::new(
                panel_width.saturating_sub(config.horizontal_margin),
                config.lines_per_page,
            ),
            lookahead: config.lookahead_pages,
            hold_to_exit: Duration::from_millis(config.hold_to_exit_ms),
            queue: None,
            doc: None,
            prompt_since: None,
            shown_minute: None,
        }
    }

    /// Hand background pagination to the worker behind `queue`.
    pub fn with_queue(mut self, queue: &'static PrecomputeQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn current_page(&self) -> Option<usize> {
        self.doc.as_ref().map(|d| d.page)
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.prompt_since.is_some()
    }

    pub fn engine(&self) -> Option<&Arc<Paginator<F, MonoMetrics>>> {
        self.doc.as_ref().map(|d| &d.engine)
    }

    fn load_bookmark(&self, path: &str) -> usize {
        let mut buf = [0u8; BOOKMARK_CAPACITY];
        match self.store.load(&bookmark_key(path), &mut buf) {
            Ok(Some(len)) => postcard::from_bytes::<u16>(&buf[..len]).map_or_else(
                |e| {
                    warn!("bookmark for {} unreadable: {:?}", path, e);
                    0
                },
                usize::from,
            ),
            Ok(None) => 0,
            Err(e) => {
                warn!("bookmark lookup failed: {:?}", e);
                0
            }
        }
    }

    fn save_bookmark(&self) {
        let Some(doc) = &self.doc else {
            return;
        };
        let page = u16::try_from(doc.page).unwrap_or(u16::MAX);
        let mut buf = [0u8; BOOKMARK_CAPACITY];
        let result = match postcard::to_slice(&page, &mut buf) {
            Ok(bytes) => self
                .store
                .store(&bookmark_key(doc.engine.path()), bytes)
                .map_err(|e| warn!("bookmark write failed: {:?}", e)),
            Err(e) => {
                warn!("bookmark encode failed: {:?}", e);
                Err(())
            }
        };
        if result.is_ok() {
            trace!("bookmark {} -> {}", doc.engine.path(), page);
        }
    }

    fn turn(&mut self, forward: bool, cx: &mut PageContext) -> bool {
        let Some(doc) = self.doc.as_mut() else {
            return false;
        };
        if self.prompt_since.is_some() {
            return true;
        }

        let target = if forward {
            if let Err(e) = doc.engine.ensure_offset_known_up_to(doc.page + 1) {
                warn!("cannot find page {}: {}", doc.page + 2, e);
                return true;
            }
            Some(doc.page + 1).filter(|p| *p < doc.engine.discovered_pages())
        } else {
            doc.page.checked_sub(1)
        };
        let Some(target) = target else {
            debug!("no page {} the current one", if forward { "after" } else { "before" });
            return true;
        };

        doc.page = target;
        self.save_bookmark();
        cx.request_render(true);
        true
    }

    fn close(&mut self) {
        self.save_bookmark();
        if let Some(doc) = self.doc.take() {
            info!("closed {} at page {}", doc.engine.path(), doc.page + 1);
        }
        self.prompt_since = None;
    }

    fn prompt_area<D: OriginDimensions>(display: &D) -> Rectangle {
        let size = display.size();
        let w = widgets::text_width(PROMPT) + 16;
        let h = 24;
        Rectangle::new(
            Point::new((size.width as i32 - w as i32) / 2, (size.height as i32 - h as i32) / 2),
            Size::new(w, h as u32),
        )
    }

    fn draw_prompt<D: Panel>(display: &mut D) -> Result<(), D::Error> {
        let area = Self::prompt_area(display);
        widgets::fill(display, area, BinaryColor::Off)?;
        widgets::frame(display, area)?;
        widgets::text(display, PROMPT, area.top_left.x + 8, area.top_left.y + 7)
    }

    fn draw_footer<D: Panel>(&self, display: &mut D, wall: jiff::civil::DateTime) -> Result<(), D::Error> {
        let Some(doc) = &self.doc else {
            return widgets::footer(display, "", "");
        };
        let status = format!(
            "{:02}:{:02}  {}/{}",
            wall.hour(),
            wall.minute(),
            doc.page + 1,
            doc.engine.displayed_total_pages()
        );
        let name = widgets::fit_to_width(basename(doc.engine.path()), display.size().width / 2);
        widgets::footer(display, &status, &name)
    }
}

impl<D, F, K> Page<D> for ReaderPage<F, K>
where
    D: Panel,
    F: FileSystem + Send + Sync + 'static,
    K: KeyValueStore,
{
    fn name(&self) -> &'static str {
        "reader"
    }

    fn render(&mut self, display: &mut D, full: bool, cx: &RenderContext) -> Result<(), D::Error> {
        self.shown_minute = Some((cx.wall.hour(), cx.wall.minute()));

        if !full {
            if self.prompt_since.is_some() {
                let area = Self::prompt_area(display);
                display.set_partial_window(area);
                return Self::draw_prompt(display);
            }
            let area = widgets::footer_area(display);
            display.set_partial_window(area);
            return self.draw_footer(display, cx.wall);
        }

        display.clear(BinaryColor::Off)?;
        let Some(doc) = &self.doc else {
            widgets::text(display, "No document open", 10, 40)?;
            return widgets::footer(display, "", "");
        };

        let margin = (display.size().width.saturating_sub(self.layout.max_width) / 2) as i32;
        match doc.engine.load_page_content(doc.page) {
            Ok(text) => {
                let lines = wrap_lines(&text, doc.engine.metrics(), self.layout);
                for (i, line) in lines.iter().enumerate() {
                    widgets::text(display, line, margin, TEXT_TOP + i as i32 * widgets::LINE_HEIGHT)?;
                }
            }
            Err(e) => {
                warn!("page {} of {} unavailable: {}", doc.page, doc.engine.path(), e);
                widgets::text(display, "Cannot read this page", margin, TEXT_TOP)?;
            }
        }
        self.draw_footer(display, cx.wall)?;
        if self.prompt_since.is_some() {
            Self::draw_prompt(display)?;
        }

        doc.engine.start_precompute_async(doc.page);
        Ok(())
    }

    fn on_left(&mut self, cx: &mut PageContext) -> bool {
        self.turn(false, cx)
    }

    fn on_right(&mut self, cx: &mut PageContext) -> bool {
        self.turn(true, cx)
    }

    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        if self.doc.is_none() {
            return true;
        }
        if self.prompt_since.is_none() {
            self.prompt_since = Some(cx.now);
            cx.request_render(false);
        }
        true
    }

    fn open(&mut self, path: &str) -> bool {
        self.close();
        let metrics = MonoMetrics::of(&widgets::FONT);
        let engine = match Paginator::open(self.fs.clone(), metrics, path, self.layout) {
            Ok(engine) => engine.with_lookahead(self.lookahead),
            Err(e) => {
                warn!("cannot open {}: {}", path, e);
                return false;
            }
        };
        let engine = match self.queue {
            Some(queue) => engine.with_queue(queue),
            None => engine,
        };
        if let Err(e) = engine.ensure_offset_known_up_to(OPEN_PAGES) {
            warn!("cannot paginate {}: {}", path, e);
            return false;
        }

        let saved = self.load_bookmark(path);
        if saved > 0
            && let Err(e) = engine.ensure_offset_known_up_to(saved)
        {
            warn!("cannot reach saved page {} of {}: {}", saved + 1, path, e);
        }
        let page = saved.min(engine.discovered_pages() - 1);
        info!("reading {} from page {}", path, page + 1);

        self.doc = Some(Document {
            engine: Arc::new(engine),
            page,
        });
        true
    }

    fn maintain(&mut self, cx: &mut PageContext) {
        if let Some(since) = self.prompt_since {
            if cx.held != Button::Center {
                debug!("prompt released");
                self.prompt_since = None;
                cx.request_render(true);
            } else if cx.now.saturating_duration_since(since) >= self.hold_to_exit {
                self.close();
                cx.switch_to(FILES_PAGE as isize);
            }
            return;
        }

        if self.doc.is_some() && self.shown_minute != Some((cx.wall.hour(), cx.wall.minute())) {
            cx.request_render(false);
        }
    }

    fn holds_screen(&self) -> bool {
        self.doc.is_some()
    }
}
