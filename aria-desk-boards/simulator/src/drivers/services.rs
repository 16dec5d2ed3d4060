use aria_desk_common::*;
use jiff::civil::DateTime;

/// 宿主机本地时间
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> DateTime {
        jiff::Zoned::now().datetime()
    }
}

const QUOTES: [(&str, &str); 3] = [
    ("Simplicity is prerequisite for reliability.", "Dijkstra"),
    ("Make it work, make it right, make it fast.", "Kent Beck"),
    ("Premature optimization is the root of all evil.", "Knuth"),
];

/// 离线信息源
///
/// No network on the simulator: quotes come from a short built-in list and
/// weather is always unavailable, which exercises the placeholder path.
pub struct OfflineInfo {
    next: usize,
}

impl OfflineInfo {
    pub fn new() -> Self {
        Self { next: 0 }
    }
}

impl InfoSource for OfflineInfo {
    fn fetch_quote(&mut self) -> Result<Quote, NetworkError> {
        let (text, author) = QUOTES[self.next % QUOTES.len()];
        self.next += 1;
        Ok(Quote {
            text: text.into(),
            author: author.into(),
        })
    }

    fn fetch_weather(&mut self) -> Result<WeatherReport, NetworkError> {
        Err(NetworkError::NotConnected)
    }
}

/// 只记录日志的播放器
pub struct LoggingPlayer {
    track: Option<String>,
    active: bool,
}

impl LoggingPlayer {
    pub fn new() -> Self {
        Self {
            track: None,
            active: false,
        }
    }
}

impl AudioPlayer for LoggingPlayer {
    type Error = core::convert::Infallible;

    fn play(&mut self, path: &str) -> Result<(), Self::Error> {
        info!("[Simulator Audio] play {}", path);
        self.track = Some(path.to_string());
        self.active = true;
        Ok(())
    }

    fn set_active(&mut self, active: bool) {
        info!("[Simulator Audio] {}", if active { "resume" } else { "pause" });
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }
}
