use std::io::Write;

use aria_desk_common::*;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

const WIDTH: u32 = 250;
const HEIGHT: u32 = 122;

/// Terminal cells per pixel block.
const BLOCK_W: u32 = 2;
const BLOCK_H: u32 = 4;

/// 终端模拟墨水屏
///
/// Keeps a 1-bit frame buffer and prints a coarse text rendering of it on
/// every commit. A partial commit only prints the rows of its window.
pub struct ConsolePanel {
    pixels: Vec<bool>,
    window: Option<Rectangle>,
    full_refreshes: usize,
    partial_refreshes: usize,
}

impl ConsolePanel {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; (WIDTH * HEIGHT) as usize],
            window: None,
            full_refreshes: 0,
            partial_refreshes: 0,
        }
    }

    fn block_is_set(&self, bx: u32, by: u32) -> bool {
        (by * BLOCK_H..((by + 1) * BLOCK_H).min(HEIGHT)).any(|y| {
            (bx * BLOCK_W..((bx + 1) * BLOCK_W).min(WIDTH))
                .any(|x| self.pixels[(y * WIDTH + x) as usize])
        })
    }

    fn print_rows(&self, top: u32, bottom: u32) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        for by in top / BLOCK_H..bottom.div_ceil(BLOCK_H) {
            let row: String = (0..WIDTH.div_ceil(BLOCK_W))
                .map(|bx| if self.block_is_set(bx, by) { '#' } else { ' ' })
                .collect();
            writeln!(out, "|{}|", row)?;
        }
        out.flush()
    }
}

impl OriginDimensions for ConsolePanel {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for ConsolePanel {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y))
                && x < WIDTH
                && y < HEIGHT
            {
                self.pixels[(y * WIDTH + x) as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Panel for ConsolePanel {
    fn set_full_window(&mut self) {
        self.window = None;
    }

    fn set_partial_window(&mut self, area: Rectangle) {
        self.window = Some(area);
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        let (top, bottom) = match self.window {
            None => {
                self.full_refreshes += 1;
                info!("[panel] full refresh #{}", self.full_refreshes);
                (0, HEIGHT)
            }
            Some(area) => {
                self.partial_refreshes += 1;
                debug!(
                    "[panel] partial refresh #{} at {:?} {:?}",
                    self.partial_refreshes, area.top_left, area.size
                );
                let top = area.top_left.y.clamp(0, HEIGHT as i32) as u32;
                (top, (top + area.size.height).min(HEIGHT))
            }
        };
        if let Err(e) = self.print_rows(top, bottom) {
            warn!("[panel] cannot print frame: {}", e);
        }
        Ok(())
    }
}
