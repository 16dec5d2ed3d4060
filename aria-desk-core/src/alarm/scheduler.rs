use aria_desk_common::*;
use jiff::civil::{Date, DateTime};

/// 闹钟触发判定
///
/// Checked from the once-per-second housekeeping. A slot fires at most once
/// per matching minute; the marker is dropped as soon as the clock leaves
/// that minute.
#[derive(Debug, Default)]
pub struct AlarmScheduler {
    last_triggered: [Option<(Date, i8, i8)>; ALARM_SLOT_COUNT],
}

impl AlarmScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the slot that should ring now, if any.
    pub fn check(&mut self, slots: &[AlarmSlot], wall: DateTime) -> Option<usize> {
        let now = (wall.date(), wall.hour(), wall.minute());
        let weekday = wall.weekday().to_sunday_zero_offset() as u8;

        let mut fire = None;
        for (i, (slot, marker)) in slots.iter().zip(self.last_triggered.iter_mut()).enumerate() {
            if marker.is_some_and(|m| m != now) {
                *marker = None;
            }
            if fire.is_some() || !slot.enabled || !slot.rings_on(weekday) {
                continue;
            }
            if !slot.matches(now.1 as u8, now.2 as u8) || marker.is_some() {
                continue;
            }
            *marker = Some(now);
            fire = Some(i);
        }
        fire
    }
}
