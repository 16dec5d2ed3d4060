use aria_desk_common::*;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};

use super::widgets;
use crate::scheduler::{Page, PageContext, RenderContext};

/// 音乐播放页面
pub struct MusicPage<P: AudioPlayer> {
    player: P,
}

impl<P: AudioPlayer> MusicPage<P> {
    pub fn new(player: P) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &P {
        &self.player
    }
}

impl<D: Panel, P: AudioPlayer> Page<D> for MusicPage<P> {
    fn name(&self) -> &'static str {
        "music"
    }

    fn render(&mut self, display: &mut D, _full: bool, _cx: &RenderContext) -> Result<(), D::Error> {
        display.clear(BinaryColor::Off)?;
        let width = display.size().width;
        let track = self
            .player
            .track()
            .map(|t| t.rsplit('/').next().unwrap_or(t))
            .unwrap_or("no track");
        widgets::text(display, &widgets::fit_to_width(track, width - 20), 10, 30)?;
        let state = if self.player.is_active() { "playing" } else { "paused" };
        widgets::text(display, state, 10, 30 + 2 * widgets::LINE_HEIGHT)?;
        widgets::footer(display, "center: play/pause", "")
    }

    fn on_left(&mut self, _cx: &mut PageContext) -> bool {
        false
    }

    fn on_right(&mut self, _cx: &mut PageContext) -> bool {
        false
    }

    fn on_center(&mut self, cx: &mut PageContext) -> bool {
        if self.player.track().is_none() {
            return true;
        }
        let active = !self.player.is_active();
        self.player.set_active(active);
        info!("playback {}", if active { "resumed" } else { "paused" });
        cx.request_render(false);
        true
    }

    fn open(&mut self, path: &str) -> bool {
        match self.player.play(path) {
            Ok(()) => {
                info!("playing {}", path);
                true
            }
            Err(e) => {
                warn!("cannot play {}: {:?}", path, e);
                false
            }
        }
    }
}
