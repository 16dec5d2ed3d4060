use aria_desk_common::*;
use embassy_time::{Duration, Instant};
use embedded_graphics::prelude::*;
use jiff::civil::DateTime;

use super::{PageContext, PageRequest, PageSet, Reachability, RefreshGuard, RenderContext};

/// 页面管理与刷新调度
///
/// Every navigation draws a partial frame right away and arms one deferred
/// full refresh for the page that is current at that moment. Navigating
/// again before the delay elapses re-arms it for the new page, so a burst of
/// page flips ends in a single full refresh. At most one full refresh is in
/// flight at any time (see [`RefreshGuard`]).
pub struct PageManager<D: Panel> {
    display: D,
    pages: PageSet<D>,
    current: usize,
    home: usize,
    last_interaction: Instant,
    last_switch: Instant,
    pending_full: Option<usize>,
    refresh: RefreshGuard,
    inactivity_timeout: Option<Duration>,
    deferred_full_delay: Duration,
    takeover: bool,
}

impl<D: Panel> PageManager<D> {
    pub fn new(display: D, pages: PageSet<D>, config: &SchedulerConfig) -> Self {
        let home = if config.home_index < pages.len() {
            config.home_index
        } else {
            warn!("home page {} out of range, using 0", config.home_index);
            0
        };
        Self {
            display,
            pages,
            current: home,
            home,
            last_interaction: Instant::from_ticks(0),
            last_switch: Instant::from_ticks(0),
            pending_full: None,
            refresh: RefreshGuard::new(config.refresh_watchdog()),
            inactivity_timeout: config.inactivity_timeout(),
            deferred_full_delay: config.deferred_full_delay(),
            takeover: false,
        }
    }

    /// First frame after boot: a full refresh of the home page.
    pub fn begin(&mut self, now: Instant, wall: DateTime) {
        info!(
            "page manager starting with {} pages, home is {}",
            self.pages.len(),
            self.pages.name(self.home)
        );
        self.current = self.home;
        self.last_interaction = now;
        self.last_switch = now;
        if let Some(page) = self.pages.page_mut(self.current) {
            page.on_enter();
        }
        self.render_full(now, wall);
    }

    pub fn switch_page(&mut self, target: isize, now: Instant, wall: DateTime) -> bool {
        let Some(index) = self.pages.normalize(target) else {
            return false;
        };
        if self.pages.reachability(index) == Some(Reachability::ExplicitOnly) {
            warn!(
                "page {} is not reachable by switching",
                self.pages.name(index)
            );
            return false;
        }
        self.activate(index, now, wall);
        true
    }

    /// Explicit entry into `index` with an argument. Bypasses the cycling
    /// restriction as long as the page accepts `path`.
    pub fn open_page(&mut self, index: usize, path: &str, now: Instant, wall: DateTime) -> bool {
        let Some(page) = self.pages.page_mut(index) else {
            warn!("open {} on missing page {}", path, index);
            return false;
        };
        if !page.open(path) {
            warn!("page {} refused {}", page.name(), path);
            return false;
        }
        self.activate(index, now, wall);
        true
    }

    fn activate(&mut self, index: usize, now: Instant, wall: DateTime) {
        info!("switch to page {} ({})", index, self.pages.name(index));
        self.current = index;
        self.last_interaction = now;
        self.last_switch = now;
        if let Some(page) = self.pages.page_mut(index) {
            page.on_enter();
        }
        self.render_partial(now, wall);
        self.pending_full = Some(index);
    }

    /// Render the current page without touching the deferred full refresh.
    pub fn request_render(&mut self, full: bool, now: Instant, wall: DateTime) {
        if full {
            self.render_full(now, wall);
        } else {
            self.render_partial(now, wall);
        }
    }

    pub fn handle_button_edge(&mut self, edge: Button, now: Instant, wall: DateTime) {
        if edge == Button::None {
            return;
        }
        self.last_interaction = now;
        if self.takeover {
            return;
        }

        let mut cx = PageContext::new(now, wall, edge);
        let Some(page) = self.pages.page_mut(self.current) else {
            return;
        };
        let handled = match edge {
            Button::Left => page.on_left(&mut cx),
            Button::Right => page.on_right(&mut cx),
            Button::Center => page.on_center(&mut cx),
            Button::None => true,
        };
        let navigated = cx.requested_navigation();
        self.apply_requests(cx, now, wall);

        if handled || navigated {
            return;
        }
        let step = match edge {
            Button::Left => -1,
            Button::Right => 1,
            _ => return,
        };
        match self.pages.next_cycling(self.current, step) {
            Some(target) => {
                self.switch_page(target as isize, now, wall);
            }
            None => debug!("no other page to cycle to"),
        }
    }

    /// One scheduler pass; call on every loop iteration.
    pub fn tick(&mut self, now: Instant, wall: DateTime, held: Button) {
        if let Some(stuck) = self.refresh.maintain(now, self.display.is_busy()) {
            warn!(
                "full refresh flag stuck for {} ms, clearing",
                stuck.as_millis()
            );
        }
        if self.takeover {
            return;
        }

        self.run_deferred_full(now, wall);
        self.check_inactivity(now, wall);

        let mut cx = PageContext::new(now, wall, held);
        if let Some(page) = self.pages.page_mut(self.current) {
            page.maintain(&mut cx);
        }
        self.apply_requests(cx, now, wall);
    }

    fn run_deferred_full(&mut self, now: Instant, wall: DateTime) {
        let Some(pending) = self.pending_full else {
            return;
        };
        if pending != self.current {
            debug!("dropping stale full refresh for page {}", pending);
            self.pending_full = None;
            return;
        }
        if now.saturating_duration_since(self.last_switch) < self.deferred_full_delay {
            return;
        }
        if self.refresh.is_active() {
            trace!("deferred full refresh postponed, panel still refreshing");
            return;
        }
        self.pending_full = None;
        debug!("deferred full refresh of {}", self.pages.name(pending));
        self.render_full(now, wall);
    }

    fn check_inactivity(&mut self, now: Instant, wall: DateTime) {
        let Some(timeout) = self.inactivity_timeout else {
            return;
        };
        if self.current == self.home {
            return;
        }
        if self.pages.page(self.current).is_some_and(|p| p.holds_screen()) {
            return;
        }
        let idle = now.saturating_duration_since(self.last_interaction);
        if idle > timeout {
            info!("idle for {} ms, returning home", idle.as_millis());
            self.activate(self.home, now, wall);
        }
    }

    fn apply_requests(&mut self, cx: PageContext, now: Instant, wall: DateTime) {
        for request in cx.into_requests() {
            match request {
                PageRequest::SwitchTo(target) => {
                    self.switch_page(target, now, wall);
                }
                PageRequest::Open { page, path } => {
                    self.open_page(page, &path, now, wall);
                }
                PageRequest::Render { full } => self.request_render(full, now, wall),
                PageRequest::CancelPendingFull => self.cancel_pending_full(),
                PageRequest::Interaction => self.last_interaction = now,
            }
        }
    }

    fn render_context(&self, now: Instant, wall: DateTime) -> RenderContext {
        let (prev, next) = self.pages.cycling_neighbours(self.current);
        RenderContext {
            now,
            wall,
            prev,
            next,
        }
    }

    fn render_full(&mut self, now: Instant, wall: DateTime) {
        if self.refresh.is_active() {
            debug!("full refresh already in flight, queueing another");
            self.pending_full = Some(self.current);
            return;
        }
        let cx = self.render_context(now, wall);
        let Some(page) = self.pages.page_mut(self.current) else {
            return;
        };

        self.refresh.begin(now);
        self.display.set_full_window();
        let result = page
            .render(&mut self.display, true, &cx)
            .and_then(|_| self.display.commit());
        if let Err(e) = result {
            error!("full render of {} failed: {:?}", page.name(), e);
        }
        if !self.display.is_busy() {
            self.refresh.end();
        }
    }

    fn render_partial(&mut self, now: Instant, wall: DateTime) {
        let cx = self.render_context(now, wall);
        let Some(page) = self.pages.page_mut(self.current) else {
            return;
        };

        let area = self.display.bounding_box();
        self.display.set_partial_window(area);
        let result = page
            .render(&mut self.display, false, &cx)
            .and_then(|_| self.display.commit());
        if let Err(e) = result {
            error!("partial render of {} failed: {:?}", page.name(), e);
        }
    }

    /// Draw a full-window screen that is not a page (the alarm) and hold
    /// off page scheduling until [`Self::end_takeover`].
    pub fn begin_takeover<F>(&mut self, now: Instant, draw: F)
    where
        F: FnOnce(&mut D) -> Result<(), D::Error>,
    {
        info!("display takeover begins");
        self.takeover = true;
        self.pending_full = None;
        self.refresh.begin(now);
        self.display.set_full_window();
        let result = draw(&mut self.display).and_then(|_| self.display.commit());
        if let Err(e) = result {
            error!("takeover render failed: {:?}", e);
        }
        if !self.display.is_busy() {
            self.refresh.end();
        }
    }

    /// Give the panel back to the page that was current before the
    /// takeover, with a full refresh to wipe the takeover screen.
    pub fn end_takeover(&mut self, now: Instant, wall: DateTime) {
        if !self.takeover {
            return;
        }
        info!("display takeover ends, restoring {}", self.pages.name(self.current));
        self.takeover = false;
        self.last_interaction = now;
        self.pending_full = None;
        // the takeover owned the panel; its refresh must not block this one
        self.refresh.end();
        self.render_full(now, wall);
    }

    pub fn cancel_pending_full(&mut self) {
        if let Some(page) = self.pending_full.take() {
            debug!("pending full refresh of {} cancelled", self.pages.name(page));
        }
    }

    pub fn set_inactivity_timeout(&mut self, timeout: Option<Duration>) {
        self.inactivity_timeout = timeout;
    }

    pub fn set_deferred_full_delay(&mut self, delay: Duration) {
        self.deferred_full_delay = delay;
    }

    pub fn deferred_full_delay(&self) -> Duration {
        self.deferred_full_delay
    }

    pub fn pending_page(&self) -> Option<usize> {
        self.pending_full
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_active()
    }

    pub fn in_takeover(&self) -> bool {
        self.takeover
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Page;
    use crate::testing::*;
    use alloc::{rc::Rc, vec, vec::Vec};
    use core::cell::RefCell;
    use proptest::prelude::*;

    type Log = Rc<RefCell<Vec<RenderRecord>>>;

    fn ms(v: u64) -> Instant {
        Instant::from_millis(v)
    }

    fn manager_with(reach: &[Reachability]) -> (PageManager<RecordingPanel>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        for (i, r) in reach.iter().enumerate() {
            pages.register(ScriptedPage::new(i, log.clone()), *r);
        }
        let manager = PageManager::new(
            RecordingPanel::new(),
            pages,
            &SchedulerConfig::default(),
        );
        (manager, log)
    }

    fn full_renders(log: &Log) -> Vec<usize> {
        log.borrow()
            .iter()
            .filter(|r| r.full)
            .map(|r| r.page)
            .collect()
    }

    fn started(reach: &[Reachability]) -> (PageManager<RecordingPanel>, Log) {
        let (mut m, log) = manager_with(reach);
        m.begin(ms(0), wall_at(8, 0, 0));
        log.borrow_mut().clear();
        m.display_mut().commits.clear();
        (m, log)
    }

    const ALL_CYCLING: [Reachability; 4] = [Reachability::Cycling; 4];

    #[test]
    fn begin_renders_home_full() {
        let (mut m, log) = manager_with(&ALL_CYCLING);
        m.begin(ms(0), wall_at(8, 0, 0));
        assert_eq!(full_renders(&log), vec![0]);
        assert_eq!(m.display().commits, vec![Commit::Full]);
    }

    #[test]
    fn switch_renders_partial_then_one_deferred_full() {
        let (mut m, log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);

        assert!(m.switch_page(2, ms(1_000), wall));
        assert_eq!(m.current_index(), 2);
        assert_eq!(m.pending_page(), Some(2));
        assert_eq!(log.borrow().last().map(|r| (r.page, r.full)), Some((2, false)));

        m.tick(ms(1_400), wall, Button::None);
        assert!(full_renders(&log).is_empty());

        m.tick(ms(1_500), wall, Button::None);
        assert_eq!(full_renders(&log), vec![2]);
        assert_eq!(m.pending_page(), None);

        m.tick(ms(5_000), wall, Button::None);
        assert_eq!(full_renders(&log), vec![2]);
    }

    #[test]
    fn rapid_switches_coalesce_into_single_full_refresh() {
        let (mut m, log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);

        m.switch_page(1, ms(1_000), wall);
        m.tick(ms(1_100), wall, Button::None);
        m.switch_page(2, ms(1_200), wall);
        m.tick(ms(1_300), wall, Button::None);
        m.switch_page(3, ms(1_400), wall);
        for t in (1_500..4_000).step_by(80) {
            m.tick(ms(t), wall, Button::None);
        }

        assert_eq!(full_renders(&log), vec![3]);
    }

    #[test]
    fn deferred_full_waits_for_refresh_in_flight() {
        let (mut m, log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);

        m.display_mut().busy = true;
        m.request_render(true, ms(100), wall);
        assert!(m.is_refreshing());
        log.borrow_mut().clear();

        m.switch_page(1, ms(200), wall);
        m.tick(ms(1_000), wall, Button::None);
        assert!(full_renders(&log).is_empty());
        assert_eq!(m.pending_page(), Some(1));

        m.display_mut().busy = false;
        m.tick(ms(1_100), wall, Button::None);
        assert_eq!(full_renders(&log), vec![1]);
    }

    #[test]
    fn watchdog_clears_stuck_refresh_after_ten_seconds() {
        let (mut m, _log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);

        m.display_mut().busy = true;
        m.request_render(true, ms(1_000), wall);
        assert!(m.is_refreshing());

        m.tick(ms(6_000), wall, Button::None);
        assert!(m.is_refreshing());
        m.tick(ms(10_999), wall, Button::None);
        assert!(m.is_refreshing());
        m.tick(ms(11_000), wall, Button::None);
        assert!(!m.is_refreshing());
    }

    #[test]
    fn explicit_only_pages_are_skipped_by_cycling() {
        use Reachability::*;
        let (mut m, _log) = started(&[Cycling, Cycling, ExplicitOnly, Cycling, ExplicitOnly]);
        let wall = wall_at(8, 0, 0);

        let mut visited = Vec::new();
        for i in 0..10 {
            m.handle_button_edge(Button::Right, ms(1_000 + i * 100), wall);
            visited.push(m.current_index());
        }
        assert_eq!(visited, vec![1, 3, 0, 1, 3, 0, 1, 3, 0, 1]);

        m.handle_button_edge(Button::Left, ms(3_000), wall);
        assert_eq!(m.current_index(), 0);
        m.handle_button_edge(Button::Left, ms(3_100), wall);
        assert_eq!(m.current_index(), 3);
    }

    type Hints = Rc<RefCell<Vec<(&'static str, Option<&'static str>, Option<&'static str>)>>>;

    /// Records the cycling hints it is rendered with.
    struct NamedPage {
        name: &'static str,
        seen: Hints,
    }

    impl<D: Panel> Page<D> for NamedPage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn render(&mut self, _display: &mut D, _full: bool, cx: &RenderContext) -> Result<(), D::Error> {
            self.seen.borrow_mut().push((self.name, cx.prev, cx.next));
            Ok(())
        }

        fn on_left(&mut self, _cx: &mut PageContext) -> bool {
            false
        }

        fn on_right(&mut self, _cx: &mut PageContext) -> bool {
            false
        }

        fn on_center(&mut self, _cx: &mut PageContext) -> bool {
            true
        }

        fn open(&mut self, _path: &str) -> bool {
            true
        }
    }

    #[test]
    fn render_hints_name_the_cycling_neighbours() {
        use Reachability::*;
        let seen: Hints = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        for (name, reach) in [
            ("home", Cycling),
            ("calendar", Cycling),
            ("files", Cycling),
            ("reader", ExplicitOnly),
            ("music", ExplicitOnly),
        ] {
            pages.register(NamedPage { name, seen: seen.clone() }, reach);
        }
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        let wall = wall_at(8, 0, 0);

        m.begin(ms(0), wall);
        m.handle_button_edge(Button::Left, ms(1_000), wall);
        assert!(m.open_page(4, "/a.mp3", ms(2_000), wall));

        assert_eq!(
            *seen.borrow(),
            [
                ("home", Some("files"), Some("calendar")),
                ("files", Some("calendar"), Some("home")),
                ("music", Some("files"), Some("home")),
            ]
        );
    }

    #[test]
    fn lone_cycling_page_has_no_hints() {
        use Reachability::*;
        let seen: Hints = Rc::new(RefCell::new(Vec::new()));
        let pages = PageSet::new()
            .with(NamedPage { name: "home", seen: seen.clone() }, Cycling)
            .with(NamedPage { name: "reader", seen: seen.clone() }, ExplicitOnly);
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        m.begin(ms(0), wall_at(8, 0, 0));
        assert_eq!(*seen.borrow(), [("home", None, None)]);
    }

    #[test]
    fn explicit_only_page_rejects_switch_but_accepts_open() {
        use Reachability::*;
        let (mut m, log) = started(&[Cycling, Cycling, ExplicitOnly]);
        let wall = wall_at(8, 0, 0);

        assert!(!m.switch_page(2, ms(100), wall));
        assert!(!m.switch_page(-1, ms(100), wall));
        assert_eq!(m.current_index(), 0);
        assert!(log.borrow().is_empty());

        assert!(m.open_page(2, "/books/a.txt", ms(200), wall));
        assert_eq!(m.current_index(), 2);
        assert_eq!(m.pending_page(), Some(2));
    }

    #[test]
    fn negative_targets_wrap() {
        let (mut m, _log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);
        m.switch_page(-1, ms(100), wall);
        assert_eq!(m.current_index(), 3);
        m.switch_page(9, ms(200), wall);
        assert_eq!(m.current_index(), 1);
    }

    #[test]
    fn handled_edge_suppresses_default_cycling() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        pages.register(
            ScriptedPage::new(0, log.clone()).consuming_directions(),
            Reachability::Cycling,
        );
        pages.register(ScriptedPage::new(1, log.clone()), Reachability::Cycling);
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        m.begin(ms(0), wall_at(8, 0, 0));

        m.handle_button_edge(Button::Right, ms(100), wall_at(8, 0, 0));
        assert_eq!(m.current_index(), 0);
    }

    #[test]
    fn page_navigation_request_replaces_default_cycling() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        pages.register(
            ScriptedPage::new(0, log.clone()).jumping_to(2),
            Reachability::Cycling,
        );
        pages.register(ScriptedPage::new(1, log.clone()), Reachability::Cycling);
        pages.register(ScriptedPage::new(2, log.clone()), Reachability::Cycling);
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        m.begin(ms(0), wall_at(8, 0, 0));

        m.handle_button_edge(Button::Right, ms(100), wall_at(8, 0, 0));
        assert_eq!(m.current_index(), 2);
    }

    #[test]
    fn center_goes_to_page_only() {
        let (mut m, log) = started(&ALL_CYCLING);
        m.handle_button_edge(Button::Center, ms(100), wall_at(8, 0, 0));
        assert_eq!(m.current_index(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn inactivity_returns_home() {
        let (mut m, log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);

        m.switch_page(2, ms(1_000), wall);
        m.tick(ms(20_000), wall, Button::None);
        assert_eq!(m.current_index(), 2);
        m.tick(ms(31_001), wall, Button::None);
        assert_eq!(m.current_index(), 0);
        assert_eq!(log.borrow().last().map(|r| (r.page, r.full)), Some((0, false)));
        assert_eq!(m.pending_page(), Some(0));
    }

    #[test]
    fn disabled_inactivity_timeout_keeps_page() {
        let (mut m, _log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);
        m.set_inactivity_timeout(None);
        m.switch_page(2, ms(1_000), wall);
        m.tick(ms(120_000), wall, Button::None);
        assert_eq!(m.current_index(), 2);
    }

    #[test]
    fn page_holding_screen_suppresses_inactivity() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        pages.register(ScriptedPage::new(0, log.clone()), Reachability::Cycling);
        pages.register(
            ScriptedPage::new(1, log.clone()).holding_screen(),
            Reachability::Cycling,
        );
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        let wall = wall_at(8, 0, 0);
        m.begin(ms(0), wall);
        m.switch_page(1, ms(100), wall);
        m.tick(ms(100_000), wall, Button::None);
        assert_eq!(m.current_index(), 1);
    }

    #[test]
    fn manual_refresh_cancels_pending_full() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        pages.register(
            ScriptedPage::new(0, log.clone()).refreshing_on_center(),
            Reachability::Cycling,
        );
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        let wall = wall_at(8, 0, 0);
        m.begin(ms(0), wall);
        m.switch_page(0, ms(1_000), wall);
        log.borrow_mut().clear();

        m.handle_button_edge(Button::Center, ms(1_100), wall);
        assert_eq!(full_renders(&log), vec![0]);
        assert_eq!(m.pending_page(), None);

        m.tick(ms(2_000), wall, Button::None);
        assert_eq!(full_renders(&log), vec![0]);
    }

    #[test]
    fn request_render_keeps_deferred_timer() {
        let (mut m, log) = started(&ALL_CYCLING);
        let wall = wall_at(8, 0, 0);
        m.switch_page(1, ms(1_000), wall);
        m.request_render(false, ms(1_300), wall);
        assert_eq!(m.pending_page(), Some(1));
        m.tick(ms(1_500), wall, Button::None);
        assert_eq!(full_renders(&log), vec![1]);
    }

    #[test]
    fn maintenance_partial_does_not_disturb_pending_full() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut pages = PageSet::new();
        pages.register(ScriptedPage::new(0, log.clone()), Reachability::Cycling);
        pages.register(
            ScriptedPage::new(1, log.clone()).partial_on_maintain(),
            Reachability::Cycling,
        );
        let mut m = PageManager::new(RecordingPanel::new(), pages, &SchedulerConfig::default());
        let wall = wall_at(8, 0, 0);
        m.begin(ms(0), wall);
        m.switch_page(1, ms(1_000), wall);
        m.tick(ms(1_100), wall, Button::None);
        assert_eq!(m.pending_page(), Some(1));
        m.tick(ms(1_500), wall, Button::None);
        assert_eq!(full_renders(&log), vec![0, 1]);
    }

    #[test]
    fn takeover_suspends_scheduling_and_restores_page() {
        let (mut m, log) = started(&ALL_CYCLING);
        let wall = wall_at(7, 30, 0);

        m.switch_page(2, ms(1_000), wall);
        m.begin_takeover(ms(1_100), |_| Ok(()));
        assert!(m.in_takeover());
        assert_eq!(m.pending_page(), None);
        assert_eq!(m.display().commits.last(), Some(&Commit::Full));

        m.tick(ms(60_000), wall, Button::None);
        assert_eq!(m.current_index(), 2);
        assert!(full_renders(&log).is_empty());

        m.end_takeover(ms(61_000), wall);
        assert!(!m.in_takeover());
        assert_eq!(full_renders(&log), vec![2]);
        assert_eq!(m.current_index(), 2);
    }

    #[test]
    fn partial_render_uses_whole_panel_window_by_default() {
        let (mut m, _log) = started(&ALL_CYCLING);
        m.switch_page(1, ms(100), wall_at(8, 0, 0));
        let area = m.display().bounding_box();
        assert_eq!(m.display().commits, vec![Commit::Partial(area)]);
    }

    proptest! {
        #[test]
        fn at_most_one_pending_full_and_it_targets_the_settled_page(
            ops in proptest::collection::vec((0isize..8, 0u64..700), 1..30)
        ) {
            let (mut m, log) = started(&ALL_CYCLING);
            let wall = wall_at(8, 0, 0);
            let mut t = 1_000u64;
            let mut last_switch = t;
            let mut fired_for_settled = Vec::new();

            for (target, gap) in ops {
                m.switch_page(target, ms(t), wall);
                last_switch = t;
                let before = full_renders(&log).len();
                // tick through the gap in loop-sized steps
                let end = t + gap;
                while t < end {
                    t += 80;
                    m.tick(ms(t), wall, Button::None);
                }
                let after = full_renders(&log);
                prop_assert!(after.len() <= before + 1);
                if after.len() == before + 1 {
                    prop_assert!(t - last_switch >= 500);
                    fired_for_settled.push(m.current_index());
                    prop_assert_eq!(after[after.len() - 1], m.current_index());
                }
                if let Some(p) = m.pending_page() {
                    prop_assert_eq!(p, m.current_index());
                }
            }
            prop_assert_eq!(full_renders(&log), fired_for_settled);
        }

        #[test]
        fn cycling_only_lands_on_cycling_pages(
            mut mask in proptest::collection::vec(any::<bool>(), 1..8),
            pick in any::<prop::sample::Index>(),
            forced in any::<prop::sample::Index>(),
            presses in proptest::collection::vec(any::<bool>(), 0..40),
        ) {
            if !mask.iter().any(|c| *c) {
                let i = forced.index(mask.len());
                mask[i] = true;
            }
            let reach: Vec<Reachability> = mask
                .iter()
                .map(|&c| if c { Reachability::Cycling } else { Reachability::ExplicitOnly })
                .collect();
            let cycling: Vec<usize> = (0..mask.len()).filter(|&i| mask[i]).collect();
            let start = cycling[pick.index(cycling.len())];

            let (mut m, _log) = started(&reach);
            let wall = wall_at(8, 0, 0);
            prop_assert!(m.switch_page(start as isize, ms(100), wall));
            prop_assert_eq!(m.current_index(), start);

            let n = mask.len() as isize;
            let mut expected = start;
            for (i, right) in presses.into_iter().enumerate() {
                let (edge, step) = if right { (Button::Right, 1) } else { (Button::Left, -1) };
                expected = (1..n)
                    .map(|k| (expected as isize + step * k).rem_euclid(n) as usize)
                    .find(|&j| mask[j])
                    .unwrap_or(expected);

                m.handle_button_edge(edge, ms(200 + i as u64 * 10), wall);
                prop_assert!(mask[m.current_index()]);
                prop_assert_eq!(m.current_index(), expected);
                if cycling.len() == 1 {
                    prop_assert_eq!(m.current_index(), start);
                }
            }
        }
    }
}
