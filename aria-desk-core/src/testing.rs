//! Host-side doubles for the hardware traits.

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    string::{String, ToString},
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    vec::Vec,
};

use aria_desk_common::*;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};
use embedded_io::{ErrorKind, ErrorType, Read, Seek, SeekFrom};
use jiff::civil::DateTime;

use crate::scheduler::{Page, PageContext, RenderContext};

pub fn wall_at(hour: i8, minute: i8, second: i8) -> DateTime {
    jiff::civil::date(2024, 5, 6).at(hour, minute, second, 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Full,
    Partial(Rectangle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Window {
    Full,
    Partial(Rectangle),
}

/// 250x122 panel that keeps the set pixels and a log of commits.
pub struct RecordingPanel {
    window: Window,
    pub commits: Vec<Commit>,
    pub lit: usize,
    pub busy: bool,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self {
            window: Window::Full,
            commits: Vec::new(),
            lit: 0,
            busy: false,
        }
    }

    pub fn full_commits(&self) -> usize {
        self.commits.iter().filter(|c| **c == Commit::Full).count()
    }
}

impl OriginDimensions for RecordingPanel {
    fn size(&self) -> Size {
        Size::new(250, 122)
    }
}

impl DrawTarget for RecordingPanel {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.lit += pixels
            .into_iter()
            .filter(|Pixel(_, c)| *c == BinaryColor::On)
            .count();
        Ok(())
    }
}

impl Panel for RecordingPanel {
    fn set_full_window(&mut self) {
        self.window = Window::Full;
    }

    fn set_partial_window(&mut self, area: Rectangle) {
        self.window = Window::Partial(area);
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.commits.push(match self.window {
            Window::Full => Commit::Full,
            Window::Partial(area) => Commit::Partial(area),
        });
        Ok(())
    }

    fn is_busy(&self) -> bool {
        self.busy
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRecord {
    pub page: usize,
    pub full: bool,
}

/// Page that records its renders and can be told how to react to input.
pub struct ScriptedPage {
    id: usize,
    log: Rc<RefCell<Vec<RenderRecord>>>,
    consume_directions: bool,
    jump_to: Option<isize>,
    refresh_on_center: bool,
    partial_on_maintain: bool,
    holds_screen: bool,
}

impl ScriptedPage {
    pub fn new(id: usize, log: Rc<RefCell<Vec<RenderRecord>>>) -> Self {
        Self {
            id,
            log,
            consume_directions: false,
            jump_to: None,
            refresh_on_center: false,
            partial_on_maintain: false,
            holds_screen: false,
        }
    }

    pub fn consuming_directions(mut self) -> Self {
        self.consume_directions = true;
        self
    }

    /// Declines directions but asks for `target` instead.
    pub fn jumping_to(mut self, target: isize) -> Self {
        self.jump_to = Some(target);
        self
    }

    pub fn refreshing_on_center(mut self) -> Self {
        self.refresh_on_center = true;
        self
    }

    pub fn partial_on_maintain(mut self) -> Self {
        self.partial_on_maintain = true;
        self
    }

    pub fn holding_screen(mut self) -> Self {
        self.holds_screen = true;
        self
    }

    fn direction(&mut self, cx: &mut PageContext) -> bool {
        if let Some(target) = self.jump_to {
            cx.switch_to(target);
            return false;
        }
        self.consume_directions
    }
}

impl<D: Panel> Page<D> for ScriptedPage {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn render(&mut self, _display: &mut D, full: bool, _cx: &RenderContext) -> Result<(), D::Error> {
        self.log.borrow_mut().push(RenderRecord { page: self.id, full });
        Ok(())
    }

    fn on_left(&mut self, cx: &mut PageContext) -> bool {
        self.direction(cx)
    }

    fn on_right(&mut self, cx: &mut PageContext) -> bool {
        self.direction(cx)
    }

    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        if self.refresh_on_center {
            cx.cancel_pending_full();
            cx.request_render(true);
        }
        true
    }

    fn open(&mut self, _path: &str) -> bool {
        true
    }

    fn maintain(&mut self, cx: &mut PageContext) {
        if self.partial_on_maintain {
            cx.request_render(false);
        }
    }

    fn holds_screen(&self) -> bool {
        self.holds_screen
    }
}

/// ADC that replays a script, then keeps reporting the idle level.
pub struct ScriptedAdc {
    script: VecDeque<Result<u16, ()>>,
}

impl ScriptedAdc {
    pub fn new(samples: &[u16]) -> Self {
        Self {
            script: samples.iter().map(|s| Ok(*s)).collect(),
        }
    }

    pub fn with_results(results: &[Result<u16, ()>]) -> Self {
        Self {
            script: results.iter().copied().collect(),
        }
    }
}

impl ButtonAdc for ScriptedAdc {
    type Error = ();

    fn sample(&mut self) -> Result<u16, Self::Error> {
        self.script.pop_front().unwrap_or(Ok(4095))
    }
}

/// ADC whose level the test sets directly.
#[derive(Clone)]
pub struct LevelAdc(pub Rc<Cell<u16>>);

impl LevelAdc {
    pub fn idle() -> Self {
        Self(Rc::new(Cell::new(4095)))
    }

    pub fn set(&self, raw: u16) {
        self.0.set(raw);
    }
}

impl ButtonAdc for LevelAdc {
    type Error = ();

    fn sample(&mut self) -> Result<u16, Self::Error> {
        Ok(self.0.get())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneEvent {
    Start(u32),
    Stop,
}

#[derive(Clone, Default)]
pub struct RecordingTone(pub Rc<RefCell<Vec<ToneEvent>>>);

impl RecordingTone {
    pub fn events(&self) -> Vec<ToneEvent> {
        self.0.borrow().clone()
    }
}

impl ToneOutput for RecordingTone {
    type Error = ();

    fn start_tone(&mut self, frequency: u32) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(ToneEvent::Start(frequency));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(ToneEvent::Stop);
        Ok(())
    }
}

#[derive(Clone)]
pub struct FixedClock(pub Rc<Cell<DateTime>>);

impl FixedClock {
    pub fn at(wall: DateTime) -> Self {
        Self(Rc::new(Cell::new(wall)))
    }

    pub fn set(&self, wall: DateTime) {
        self.0.set(wall);
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> DateTime {
        self.0.get()
    }
}

#[derive(Clone, Default)]
pub struct MemoryKv(pub Rc<RefCell<BTreeMap<String, Vec<u8>>>>);

impl MemoryKv {
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.0.borrow().get(key).cloned()
    }

    pub fn put_raw(&self, key: &str, value: &[u8]) {
        self.0.borrow_mut().insert(key.to_string(), value.to_vec());
    }
}

impl KeyValueStore for MemoryKv {
    type Error = core::convert::Infallible;

    fn load(&self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, Self::Error> {
        Ok(self.0.borrow().get(key).map(|v| {
            let n = v.len().min(buf.len());
            buf[..n].copy_from_slice(&v[..n]);
            n
        }))
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// In-memory card. Counts opens so tests can tell whether pagination went
/// back to storage.
#[derive(Default)]
pub struct MemoryFs {
    files: BTreeMap<String, Arc<[u8]>>,
    dirs: BTreeMap<String, Vec<DirEntry>>,
    missing: AtomicBool,
    opens: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, data: impl AsRef<[u8]>) -> Self {
        let data: Arc<[u8]> = Arc::from(data.as_ref());
        let (dir, name) = match path.rfind('/') {
            Some(0) => ("/", &path[1..]),
            Some(i) => (&path[..i], &path[i + 1..]),
            None => ("/", path),
        };
        self.dirs.entry(dir.to_string()).or_default().push(DirEntry {
            name: name.to_string(),
            is_dir: false,
            size: data.len() as u64,
        });
        self.files.insert(path.to_string(), data);
        self
    }

    pub fn with_dir(mut self, parent: &str, name: &str) -> Self {
        self.dirs.entry(parent.to_string()).or_default().insert(
            0,
            DirEntry {
                name: name.to_string(),
                is_dir: true,
                size: 0,
            },
        );
        self
    }

    pub fn set_available(&self, available: bool) {
        self.missing.store(!available, Ordering::SeqCst);
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl FileSystem for MemoryFs {
    type File = MemoryFile;
    type Error = ErrorKind;

    fn is_available(&self) -> bool {
        !self.missing.load(Ordering::SeqCst)
    }

    fn open(&self, path: &str) -> Result<Self::File, Self::Error> {
        if !self.is_available() {
            return Err(ErrorKind::NotConnected);
        }
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(path)
            .map(|data| MemoryFile {
                data: data.clone(),
                pos: 0,
            })
            .ok_or(ErrorKind::NotFound)
    }

    fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, Self::Error> {
        if !self.is_available() {
            return Err(ErrorKind::NotConnected);
        }
        Ok(self.dirs.get(path).cloned().unwrap_or_default())
    }
}

pub struct MemoryFile {
    data: Arc<[u8]>,
    pos: u64,
}

impl ErrorType for MemoryFile {
    type Error = ErrorKind;
}

impl Read for MemoryFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let start = (self.pos as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for MemoryFile {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let len = self.data.len() as i64;
        let target = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(d) => len + d,
            SeekFrom::Current(d) => self.pos as i64 + d,
        };
        if target < 0 {
            return Err(ErrorKind::InvalidInput);
        }
        self.pos = target as u64;
        Ok(self.pos)
    }
}

pub struct StubInfo {
    pub quote: Result<Quote, NetworkError>,
    pub weather: Result<WeatherReport, NetworkError>,
    pub calls: Rc<Cell<usize>>,
    pub offline: Rc<Cell<bool>>,
}

impl StubInfo {
    pub fn offline() -> Self {
        Self {
            quote: Err(NetworkError::NotConnected),
            weather: Err(NetworkError::NotConnected),
            calls: Rc::new(Cell::new(0)),
            offline: Rc::new(Cell::new(true)),
        }
    }

    pub fn online() -> Self {
        Self {
            quote: Ok(Quote {
                text: "Stay hungry".to_string(),
                author: "SJ".to_string(),
            }),
            weather: Ok(WeatherReport {
                temp: 21,
                humidity: 40,
                condition: "Sunny".to_string(),
            }),
            calls: Rc::new(Cell::new(0)),
            offline: Rc::new(Cell::new(false)),
        }
    }
}

impl InfoSource for StubInfo {
    fn fetch_quote(&mut self) -> Result<Quote, NetworkError> {
        self.calls.set(self.calls.get() + 1);
        if self.offline.get() {
            return Err(NetworkError::NotConnected);
        }
        self.quote.clone()
    }

    fn fetch_weather(&mut self) -> Result<WeatherReport, NetworkError> {
        if self.offline.get() {
            return Err(NetworkError::Timeout);
        }
        self.weather.clone()
    }
}

#[derive(Default)]
pub struct StubPlayer {
    pub track: Option<String>,
    pub active: bool,
}

impl AudioPlayer for StubPlayer {
    type Error = ();

    fn play(&mut self, path: &str) -> Result<(), Self::Error> {
        self.track = Some(path.to_string());
        self.active = true;
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }
}
