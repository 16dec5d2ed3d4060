use aria_desk_common::*;
use alloc::{format, string::String};
use embassy_time::{Duration, Instant};
use embedded_graphics::{
    mono_font::{MonoTextStyle, ascii::FONT_10X20},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};

use super::widgets;
use crate::scheduler::{Page, PageContext, RenderContext};

/// A full refresh this often keeps minute-by-minute partials from ghosting.
const FULL_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
const INFO_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);
const PLACEHOLDER: &str = "--";

/// 首页：时钟、日期、天气、每日一句
pub struct HomePage<I: InfoSource> {
    info: I,
    weather: Option<WeatherReport>,
    quote: Option<Quote>,
    shown_minute: Option<(i8, i8)>,
    last_full: Option<Instant>,
    last_fetch: Option<Instant>,
}

impl<I: InfoSource> HomePage<I> {
    pub fn new(info: I) -> Self {
        Self {
            info,
            weather: None,
            quote: None,
            shown_minute: None,
            last_full: None,
            last_fetch: None,
        }
    }

    /// Failed fetches keep whatever was shown before.
    fn refresh_info(&mut self, now: Instant) {
        self.last_fetch = Some(now);
        match self.info.fetch_weather() {
            Ok(weather) => self.weather = Some(weather),
            Err(e) => warn!("weather fetch failed: {}", e),
        }
        match self.info.fetch_quote() {
            Ok(quote) => self.quote = Some(quote),
            Err(e) => warn!("quote fetch failed: {}", e),
        }
    }

    pub fn weather_line(&self) -> String {
        match &self.weather {
            Some(w) => format!("{}C  {}%  {}", w.temp, w.humidity, w.condition),
            None => String::from(PLACEHOLDER),
        }
    }

    pub fn quote_line(&self) -> String {
        match &self.quote {
            Some(q) if q.author.is_empty() => q.text.clone(),
            Some(q) => format!("{} - {}", q.text, q.author),
            None => String::from(PLACEHOLDER),
        }
    }
}

fn nav_hints(cx: &RenderContext) -> (String, String) {
    (
        cx.prev.map(|p| format!("< {}", p)).unwrap_or_default(),
        cx.next.map(|n| format!("{} >", n)).unwrap_or_default(),
    )
}

impl<D: Panel, I: InfoSource> Page<D> for HomePage<I> {
    fn name(&self) -> &'static str {
        "home"
    }

    fn render(&mut self, display: &mut D, full: bool, cx: &RenderContext) -> Result<(), D::Error> {
        if full {
            self.last_full = Some(cx.now);
        }
        let wall = cx.wall;
        self.shown_minute = Some((wall.hour(), wall.minute()));

        display.clear(BinaryColor::Off)?;
        let width = display.size().width;

        let clock = format!("{:02}:{:02}", wall.hour(), wall.minute());
        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let x = (width as i32 - 10 * clock.len() as i32) / 2;
        Text::with_baseline(&clock, Point::new(x, 8), style, Baseline::Top).draw(display)?;

        let weekday = get_weekday_name(wall.weekday().to_sunday_zero_offset() as u8);
        let date = format!("{}  {}", wall.date(), weekday);
        let x = (width as i32 - widgets::text_width(&date) as i32) / 2;
        widgets::text(display, &date, x, 36)?;

        widgets::hline(display, 52)?;
        let weather = widgets::fit_to_width(&self.weather_line(), width - 10);
        widgets::text(display, &weather, 5, 60)?;
        let quote = widgets::fit_to_width(&self.quote_line(), width - 10);
        widgets::text(display, &quote, 5, 78)?;

        let (left, right) = nav_hints(cx);
        widgets::footer(display, &left, &right)
    }

    fn on_left(&mut self, _cx: &mut PageContext) -> bool {
        false
    }

    fn on_right(&mut self, _cx: &mut PageContext) -> bool {
        false
    }

    /// Refresh now: fetch, redraw in full, and skip the deferred refresh
    /// that would otherwise follow.
    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        info!("manual refresh");
        self.refresh_info(cx.now);
        cx.cancel_pending_full();
        cx.request_render(true);
        true
    }

    fn maintain(&mut self, cx: &mut PageContext) {
        let now = cx.now;
        let stale = self
            .last_fetch
            .is_none_or(|at| now.saturating_duration_since(at) >= INFO_REFRESH_INTERVAL);
        if stale {
            self.refresh_info(now);
        }

        if self.shown_minute != Some((cx.wall.hour(), cx.wall.minute())) {
            let full_due = self
                .last_full
                .is_none_or(|at| now.saturating_duration_since(at) >= FULL_REFRESH_INTERVAL);
            cx.request_render(full_due);
        }
    }
}
