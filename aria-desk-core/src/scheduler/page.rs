use aria_desk_common::*;
use alloc::string::String;
use embassy_time::Instant;
use jiff::civil::DateTime;

const MAX_PAGE_REQUESTS: usize = 8;

/// 渲染上下文
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub now: Instant,
    pub wall: DateTime,
    /// Page that Left cycles to, if any.
    pub prev: Option<&'static str>,
    /// Page that Right cycles to, if any.
    pub next: Option<&'static str>,
}

impl RenderContext {
    pub fn new(now: Instant, wall: DateTime) -> Self {
        Self {
            now,
            wall,
            prev: None,
            next: None,
        }
    }
}

/// 页面向管理器提出的请求
///
/// Pages never touch the scheduler directly. Requests are queued on the
/// [`PageContext`] and applied in order once the handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    SwitchTo(isize),
    Open { page: usize, path: String },
    Render { full: bool },
    CancelPendingFull,
    Interaction,
}

pub struct PageContext {
    pub now: Instant,
    pub wall: DateTime,
    /// Debounced toggle position at the time of the call.
    pub held: Button,
    requests: heapless::Vec<PageRequest, MAX_PAGE_REQUESTS>,
}

impl PageContext {
    pub fn new(now: Instant, wall: DateTime, held: Button) -> Self {
        Self {
            now,
            wall,
            held,
            requests: heapless::Vec::new(),
        }
    }

    pub fn switch_to(&mut self, index: isize) {
        self.push(PageRequest::SwitchTo(index));
    }

    /// Hand `path` to the page at `page`; the page becomes current if it
    /// accepts, whether or not it is reachable by cycling.
    pub fn open(&mut self, page: usize, path: &str) {
        self.push(PageRequest::Open {
            page,
            path: String::from(path),
        });
    }

    pub fn request_render(&mut self, full: bool) {
        self.push(PageRequest::Render { full });
    }

    pub fn cancel_pending_full(&mut self) {
        self.push(PageRequest::CancelPendingFull);
    }

    /// Count as user activity for the inactivity timeout.
    pub fn touch(&mut self) {
        self.push(PageRequest::Interaction);
    }

    pub fn requests(&self) -> &[PageRequest] {
        &self.requests
    }

    pub(crate) fn requested_navigation(&self) -> bool {
        self.requests
            .iter()
            .any(|r| matches!(r, PageRequest::SwitchTo(_) | PageRequest::Open { .. }))
    }

    pub(crate) fn into_requests(self) -> heapless::Vec<PageRequest, MAX_PAGE_REQUESTS> {
        self.requests
    }

    fn push(&mut self, request: PageRequest) {
        if let Err(dropped) = self.requests.push(request) {
            warn!("page request queue full, dropping {:?}", dropped);
        }
    }
}

/// 页面
///
/// `on_left` / `on_right` return whether the page consumed the event. A page
/// that declines (and did not ask for navigation itself) lets the manager
/// cycle to the neighbouring page.
pub trait Page<D: Panel> {
    fn name(&self) -> &'static str;

    /// Draw into `display`. The manager has already picked the refresh
    /// window and commits afterwards; a partial render may narrow the window.
    fn render(&mut self, display: &mut D, full: bool, cx: &RenderContext) -> Result<(), D::Error>;

    fn on_left(&mut self, cx: &mut PageContext) -> bool;

    fn on_right(&mut self, cx: &mut PageContext) -> bool;

    fn on_center(&mut self, cx: &mut PageContext) -> bool;

    /// Called every time the page becomes current, before its first render.
    fn on_enter(&mut self) {}

    /// Explicit entry with an argument, e.g. a file to show.
    fn open(&mut self, _path: &str) -> bool {
        false
    }

    /// Called on every scheduler tick while current.
    fn maintain(&mut self, _cx: &mut PageContext) {}

    /// While true the inactivity timeout does not send the user home.
    fn holds_screen(&self) -> bool {
        false
    }
}
