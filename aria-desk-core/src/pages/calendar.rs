use aria_desk_common::*;
use alloc::format;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use jiff::{ToSpan, civil::Date};

use super::widgets;
use crate::scheduler::{Page, PageContext, RenderContext};

const GRID_X: i32 = 10;
const GRID_Y: i32 = 30;
const CELL_W: i32 = 34;
const CELL_H: i32 = 14;

/// 日历光标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarCursor {
    #[default]
    Off,
    Day,
    Month,
    Year,
}

impl CalendarCursor {
    fn next(self) -> Self {
        match self {
            Self::Off => Self::Day,
            Self::Day => Self::Month,
            Self::Month => Self::Year,
            Self::Year => Self::Off,
        }
    }
}

/// 月历页面
#[derive(Debug, Default)]
pub struct CalendarPage {
    cursor: CalendarCursor,
    selected: Option<Date>,
}

impl CalendarPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> CalendarCursor {
        self.cursor
    }

    pub fn selected(&self) -> Option<Date> {
        self.selected
    }

    /// Move the selection one unit in the cursor's field. Out-of-range
    /// results leave the selection where it was.
    fn step(&mut self, forward: bool) -> bool {
        let Some(selected) = self.selected else {
            return false;
        };
        let sign: i32 = if forward { 1 } else { -1 };
        let span = match self.cursor {
            CalendarCursor::Off => return false,
            CalendarCursor::Day => sign.days(),
            CalendarCursor::Month => sign.months(),
            CalendarCursor::Year => sign.years(),
        };
        match selected.checked_add(span) {
            Ok(date) => self.selected = Some(date),
            Err(e) => debug!("calendar step out of range: {}", e),
        }
        true
    }

    fn adjust(&mut self, forward: bool, cx: &mut PageContext) -> bool {
        if !self.step(forward) {
            return false;
        }
        cx.request_render(false);
        true
    }
}

impl<D: Panel> Page<D> for CalendarPage {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn render(&mut self, display: &mut D, _full: bool, cx: &RenderContext) -> Result<(), D::Error> {
        display.clear(BinaryColor::Off)?;
        let today = cx.wall.date();
        let shown = self.selected.unwrap_or(today);

        let month = format!("{:02}", shown.month());
        let year = format!("{:04}", shown.year());
        widgets::text_maybe_inverted(display, &year, GRID_X, 4, self.cursor == CalendarCursor::Year)?;
        widgets::text(display, "-", GRID_X + widgets::text_width(&year) as i32, 4)?;
        widgets::text_maybe_inverted(
            display,
            &month,
            GRID_X + widgets::text_width(&year) as i32 + widgets::text_width("-") as i32,
            4,
            self.cursor == CalendarCursor::Month,
        )?;

        for weekday in 0..7u8 {
            let x = GRID_X + weekday as i32 * CELL_W;
            widgets::text(display, get_weekday_name(weekday), x, GRID_Y - CELL_H)?;
        }

        let first = shown.first_of_month();
        let lead = first.weekday().to_sunday_zero_offset() as i32;
        for day in 1..=shown.days_in_month() {
            let cell = lead + day as i32 - 1;
            let x = GRID_X + (cell % 7) * CELL_W;
            let y = GRID_Y + (cell / 7) * CELL_H;
            let label = format!("{:2}", day);
            let is_selected = self.cursor == CalendarCursor::Day && day == shown.day();
            let is_today = shown.year() == today.year() && shown.month() == today.month() && day == today.day();
            widgets::text_maybe_inverted(display, &label, x, y, is_selected)?;
            if is_today && !is_selected {
                widgets::text(display, "*", x + widgets::text_width(&label) as i32, y)?;
            }
        }
        Ok(())
    }

    fn on_left(&mut self, cx: &mut PageContext) -> bool {
        self.adjust(false, cx)
    }

    fn on_right(&mut self, cx: &mut PageContext) -> bool {
        self.adjust(true, cx)
    }

    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        self.cursor = self.cursor.next();
        self.selected = match self.cursor {
            CalendarCursor::Off => None,
            _ => Some(self.selected.unwrap_or(cx.wall.date())),
        };
        debug!("calendar cursor {:?}", self.cursor);
        cx.request_render(false);
        true
    }

    fn on_enter(&mut self) {
        self.cursor = CalendarCursor::Off;
        self.selected = None;
    }
}
