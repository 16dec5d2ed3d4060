use aria_desk_common::*;
use embassy_time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Tone { note: usize, until: Instant },
    Gap { next: usize, until: Instant },
    Pause { until: Instant },
}

/// 响铃状态机
///
/// Plays the melody note by note with a short gap between notes and a
/// pause before each repeat, until a button is pressed. Driven by
/// [`Self::poll`] from the main loop; never blocks.
pub struct AlarmRinger<T: ToneOutput> {
    output: T,
    phase: Phase,
    melody: Melody,
    note_gap: Duration,
    repeat_pause: Duration,
}

impl<T: ToneOutput> AlarmRinger<T> {
    pub fn new(output: T, config: &AlarmConfig) -> Self {
        Self {
            output,
            phase: Phase::Idle,
            melody: Melody::Twinkle,
            note_gap: Duration::from_millis(config.note_gap_ms),
            repeat_pause: Duration::from_millis(config.repeat_pause_ms),
        }
    }

    pub fn start(&mut self, melody: Melody, now: Instant) {
        info!("ringing {:?}", melody);
        self.melody = melody;
        self.play(0, now);
    }

    pub fn is_ringing(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Advance the tune. A press stops it immediately. Returns whether the
    /// alarm is still ringing.
    pub fn poll(&mut self, pressed: bool, now: Instant) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        if pressed {
            self.stop();
            return false;
        }

        match self.phase {
            Phase::Tone { note, until } if now >= until => {
                self.silence();
                let next = note + 1;
                self.phase = if next < self.melody.notes().len() {
                    Phase::Gap {
                        next,
                        until: now + self.note_gap,
                    }
                } else {
                    Phase::Pause {
                        until: now + self.repeat_pause,
                    }
                };
            }
            Phase::Gap { next, until } if now >= until => self.play(next, now),
            Phase::Pause { until } if now >= until => self.play(0, now),
            _ => {}
        }
        true
    }

    pub fn stop(&mut self) {
        if self.phase != Phase::Idle {
            info!("alarm stopped");
        }
        self.silence();
        self.phase = Phase::Idle;
    }

    fn play(&mut self, note: usize, now: Instant) {
        let Some(n) = self.melody.notes().get(note) else {
            self.phase = Phase::Idle;
            return;
        };
        if let Err(e) = self.output.start_tone(n.freq) {
            debug!("tone output failed: {:?}", e);
        }
        self.phase = Phase::Tone {
            note,
            until: now + Duration::from_millis(n.duration_ms as u64),
        };
    }

    fn silence(&mut self) {
        if let Err(e) = self.output.stop() {
            debug!("tone output failed: {:?}", e);
        }
    }
}
