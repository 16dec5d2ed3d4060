use serde::{Deserialize, Serialize};

pub const ALARM_SLOT_COUNT: usize = 5;
pub const ALARM_TONE_COUNT: u8 = 5;

/// 每周重复掩码中的全部七天
pub const WEEKDAY_MASK: u8 = 0x7F;

/// 闹钟槽位
///
/// `weekdays` uses bit0 = Sunday .. bit6 = Saturday; zero means every day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSlot {
    pub hour: u8,
    pub minute: u8,
    pub weekdays: u8,
    pub tone: u8,
    pub enabled: bool,
}

impl Default for AlarmSlot {
    fn default() -> Self {
        Self {
            hour: 7,
            minute: 0,
            weekdays: 0,
            tone: 1,
            enabled: false,
        }
    }
}

impl AlarmSlot {
    /// Pull every field back into its legal range. Returns true if anything
    /// had to be changed.
    pub fn sanitize(&mut self) -> bool {
        let before = *self;
        self.hour = self.hour.min(23);
        self.minute = self.minute.min(59);
        self.weekdays &= WEEKDAY_MASK;
        self.tone = self.tone.clamp(1, ALARM_TONE_COUNT);
        before != *self
    }

    /// `weekday` counts from Sunday = 0.
    pub fn rings_on(&self, weekday: u8) -> bool {
        self.weekdays == 0 || self.weekdays & (1 << (weekday % 7)) != 0
    }

    pub fn matches(&self, hour: u8, minute: u8) -> bool {
        self.hour == hour && self.minute == minute
    }
}

pub fn get_weekday_name(weekday: u8) -> &'static str {
    const WEEK_NAMES: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
    WEEK_NAMES[weekday as usize % 7]
}
