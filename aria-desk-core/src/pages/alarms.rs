use aria_desk_common::*;
use alloc::{format, rc::Rc};
use core::cell::RefCell;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use super::widgets;
use crate::alarm::AlarmBook;
use crate::scheduler::{Page, PageContext, RenderContext};

const FIELD_HOUR: u8 = 0;
const FIELD_MINUTE: u8 = 1;
const FIELD_FIRST_WEEKDAY: u8 = 2;
const FIELD_LAST_WEEKDAY: u8 = 8;
const FIELD_TONE: u8 = 9;
const FIELD_ENABLED: u8 = 10;

const ROW_TOP: i32 = 6;

/// 闹钟设置页面
///
/// Center walks the rows, Right/Left walk the fields of the current row and
/// Center then edits the field under the cursor. Every edit is written to
/// the store at once.
pub struct AlarmsPage<K: KeyValueStore> {
    book: Rc<RefCell<AlarmBook<K>>>,
    row: Option<usize>,
    field: Option<u8>,
}

impl<K: KeyValueStore> AlarmsPage<K> {
    pub fn new(book: Rc<RefCell<AlarmBook<K>>>) -> Self {
        Self {
            book,
            row: None,
            field: None,
        }
    }

    pub fn cursor(&self) -> (Option<usize>, Option<u8>) {
        (self.row, self.field)
    }

    fn edit(&mut self, row: usize, field: u8) {
        let result = self.book.borrow_mut().update(row, |slot| match field {
            FIELD_HOUR => slot.hour = (slot.hour + 1) % 24,
            FIELD_MINUTE => slot.minute = (slot.minute + 1) % 60,
            FIELD_FIRST_WEEKDAY..=FIELD_LAST_WEEKDAY => {
                slot.weekdays ^= 1 << (field - FIELD_FIRST_WEEKDAY);
            }
            FIELD_TONE => slot.tone = slot.tone % ALARM_TONE_COUNT + 1,
            _ => slot.enabled = !slot.enabled,
        });
        if let Err(e) = result {
            warn!("saving alarm {} failed: {}", row, e);
        }
    }

    fn draw_row<D: Panel>(&self, display: &mut D, index: usize, slot: &AlarmSlot) -> Result<(), D::Error> {
        let y = ROW_TOP + index as i32 * widgets::LINE_HEIGHT;
        let on_row = self.row == Some(index);
        let selected = |field: u8| on_row && self.field == Some(field);

        widgets::text_maybe_inverted(display, &format!("{}", index + 1), 2, y, on_row && self.field.is_none())?;
        let mut x = 16;
        let hour = format!("{:02}", slot.hour);
        widgets::text_maybe_inverted(display, &hour, x, y, selected(FIELD_HOUR))?;
        x += widgets::text_width(&hour) as i32;
        widgets::text(display, ":", x, y)?;
        x += widgets::text_width(":") as i32;
        let minute = format!("{:02}", slot.minute);
        widgets::text_maybe_inverted(display, &minute, x, y, selected(FIELD_MINUTE))?;
        x += widgets::text_width(&minute) as i32 + 8;

        for day in 0..7u8 {
            let name = get_weekday_name(day);
            let active = slot.weekdays & (1 << day) != 0;
            let label = if active { name } else { ".." };
            widgets::text_maybe_inverted(display, label, x, y, selected(FIELD_FIRST_WEEKDAY + day))?;
            x += widgets::text_width(name) as i32 + 3;
        }
        x += 5;

        let tone = format!("T{}", slot.tone);
        widgets::text_maybe_inverted(display, &tone, x, y, selected(FIELD_TONE))?;
        x += widgets::text_width(&tone) as i32 + 8;
        let state = if slot.enabled { "ON" } else { "OFF" };
        widgets::text_maybe_inverted(display, state, x, y, selected(FIELD_ENABLED))
    }
}

impl<D: Panel, K: KeyValueStore> Page<D> for AlarmsPage<K> {
    fn name(&self) -> &'static str {
        "alarms"
    }

    fn render(&mut self, display: &mut D, _full: bool, _cx: &RenderContext) -> Result<(), D::Error> {
        display.clear(BinaryColor::Off)?;
        let slots = *self.book.borrow().slots();
        for (i, slot) in slots.iter().enumerate() {
            self.draw_row(display, i, slot)?;
        }
        let hint = if self.row.is_none() { "center: edit" } else { "every day if none set" };
        widgets::footer(display, hint, "")
    }

    fn on_left(&mut self, cx: &mut PageContext) -> bool {
        if self.row.is_none() {
            return false;
        }
        self.field = match self.field {
            None => Some(FIELD_ENABLED),
            Some(0) => None,
            Some(f) => Some(f - 1),
        };
        cx.request_render(false);
        true
    }

    fn on_right(&mut self, cx: &mut PageContext) -> bool {
        if self.row.is_none() {
            return false;
        }
        self.field = match self.field {
            None => Some(FIELD_HOUR),
            Some(FIELD_ENABLED) => None,
            Some(f) => Some(f + 1),
        };
        cx.request_render(false);
        true
    }

    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        match (self.row, self.field) {
            (None, _) => self.row = Some(0),
            (Some(row), None) => {
                self.row = Some(row + 1).filter(|r| *r < ALARM_SLOT_COUNT);
            }
            (Some(row), Some(field)) => self.edit(row, field),
        }
        cx.request_render(false);
        true
    }

    fn on_enter(&mut self) {
        self.row = None;
        self.field = None;
    }
}
