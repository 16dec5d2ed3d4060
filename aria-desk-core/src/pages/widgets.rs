//! 页面共用的绘制小部件

use aria_desk_common::*;
use alloc::{format, string::String};
use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder, ascii::FONT_6X10},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use jiff::civil::DateTime;

pub const FONT: MonoFont<'static> = FONT_6X10;
pub const LINE_HEIGHT: i32 = 14;
pub const FOOTER_HEIGHT: u32 = 18;

pub fn text<D>(display: &mut D, s: &str, x: i32, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT, BinaryColor::On);
    Text::with_baseline(s, Point::new(x, y), style, Baseline::Top).draw(display)?;
    Ok(())
}

/// White on black, used for the cursor.
pub fn inverted_text<D>(display: &mut D, s: &str, x: i32, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyleBuilder::new()
        .font(&FONT)
        .text_color(BinaryColor::Off)
        .background_color(BinaryColor::On)
        .build();
    Text::with_baseline(s, Point::new(x, y), style, Baseline::Top).draw(display)?;
    Ok(())
}

pub fn text_maybe_inverted<D>(display: &mut D, s: &str, x: i32, y: i32, inverted: bool) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    if inverted {
        inverted_text(display, s, x, y)
    } else {
        text(display, s, x, y)
    }
}

pub fn text_width(s: &str) -> u32 {
    FONT.text_width(s)
}

pub fn hline<D>(display: &mut D, y: i32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let w = display.size().width as i32;
    Line::new(Point::new(0, y), Point::new(w - 1, y))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display)
}

pub fn fill<D>(display: &mut D, area: Rectangle, color: BinaryColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    area.into_styled(PrimitiveStyle::with_fill(color)).draw(display)
}

pub fn frame<D>(display: &mut D, area: Rectangle) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    area.into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display)
}

/// Strip along the bottom edge reserved for the footer.
pub fn footer_area<D: OriginDimensions>(display: &D) -> Rectangle {
    let size = display.size();
    let h = FOOTER_HEIGHT.min(size.height);
    Rectangle::new(
        Point::new(0, (size.height - h) as i32),
        Size::new(size.width, h),
    )
}

/// Divider plus a label on each side.
pub fn footer<D>(display: &mut D, left: &str, right: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let area = footer_area(display);
    let y = area.top_left.y;
    fill(display, area, BinaryColor::Off)?;
    hline(display, y)?;
    text(display, left, 5, y + 5)?;
    let w = display.size().width as i32;
    text(display, right, w - 5 - text_width(right) as i32, y + 5)
}

/// Longest prefix of `s` that fits in `max_width` pixels, with a trailing
/// ".." when cut.
pub fn fit_to_width(s: &str, max_width: u32) -> String {
    if text_width(s) <= max_width {
        return String::from(s);
    }
    let budget = max_width.saturating_sub(text_width(".."));
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = FONT.char_width(c);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str("..");
    out
}

/// Full-window screen shown while an alarm rings.
pub fn draw_alarm_screen<D>(display: &mut D, index: usize, slot: &AlarmSlot, wall: DateTime) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    display.clear(BinaryColor::Off)?;
    let size = display.size();
    let border = Rectangle::new(Point::new(4, 4), Size::new(size.width - 8, size.height - 8));
    frame(display, border)?;

    let clock = format!("{:02}:{:02}", slot.hour, slot.minute);
    let headline = format!("ALARM {}  {}", index + 1, clock);
    let x = (size.width as i32 - text_width(&headline) as i32) / 2;
    text(display, &headline, x, 40)?;

    let date = format!("{} {}", wall.date(), get_weekday_name(wall.weekday().to_sunday_zero_offset() as u8));
    let x = (size.width as i32 - text_width(&date) as i32) / 2;
    text(display, &date, x, 58)?;

    let hint = "press any key";
    let x = (size.width as i32 - text_width(hint) as i32) / 2;
    text(display, hint, x, 84)
}
