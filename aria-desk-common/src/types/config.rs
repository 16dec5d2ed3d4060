use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// 设备整体配置
///
/// Every section falls back to its defaults when missing, so a partial JSON
/// file on the simulator only has to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub scheduler: SchedulerConfig,
    pub button: ButtonConfig,
    pub reader: ReaderConfig,
    pub alarm: AlarmConfig,
    pub main_loop: LoopConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// `None` disables the return to the home page.
    pub inactivity_timeout_ms: Option<u64>,
    pub deferred_full_delay_ms: u64,
    pub refresh_watchdog_ms: u64,
    pub home_index: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_ms: Some(30_000),
            deferred_full_delay_ms: 500,
            refresh_watchdog_ms: 10_000,
            home_index: 0,
        }
    }
}

impl SchedulerConfig {
    pub fn inactivity_timeout(&self) -> Option<Duration> {
        self.inactivity_timeout_ms.map(Duration::from_millis)
    }

    pub fn deferred_full_delay(&self) -> Duration {
        Duration::from_millis(self.deferred_full_delay_ms)
    }

    pub fn refresh_watchdog(&self) -> Duration {
        Duration::from_millis(self.refresh_watchdog_ms)
    }
}

/// Inclusive ADC range for one toggle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdcBand {
    pub min: u16,
    pub max: u16,
}

impl AdcBand {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, raw: u16) -> bool {
        (self.min..=self.max).contains(&raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub right: AdcBand,
    pub left: AdcBand,
    pub center: AdcBand,
    pub debounce_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            right: AdcBand::new(3000, 3300),
            left: AdcBand::new(2000, 2500),
            center: AdcBand::new(0, 99),
            debounce_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub lines_per_page: u8,
    pub lookahead_pages: usize,
    /// Pixels subtracted from the panel width to get the text width.
    pub horizontal_margin: u32,
    pub hold_to_exit_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            lines_per_page: 6,
            lookahead_pages: 2,
            horizontal_margin: 40,
            hold_to_exit_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub note_gap_ms: u64,
    pub repeat_pause_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            note_gap_ms: 100,
            repeat_pause_ms: 100,
            poll_interval_ms: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub poll_interval_ms: u64,
    pub housekeeping_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 80,
            housekeeping_interval_ms: 1000,
        }
    }
}
