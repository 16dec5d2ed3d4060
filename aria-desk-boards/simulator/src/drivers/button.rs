use std::{
    io::BufRead,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use aria_desk_common::*;

const IDLE_LEVEL: u16 = 4095;
const RIGHT_LEVEL: u16 = 3150;
const LEFT_LEVEL: u16 = 2250;
const CENTER_LEVEL: u16 = 20;

const TAP: Duration = Duration::from_millis(250);
const HOLD: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, Copy)]
struct Level {
    raw: u16,
    until: Instant,
}

/// 键盘模拟拨杆
///
/// Reads commands from stdin on a background thread and turns each into an
/// ADC level held for a while: `a` left, `d` right, `s` center, `S` long
/// center press.
#[derive(Clone)]
pub struct KeyboardAdc {
    level: Arc<Mutex<Option<Level>>>,
}

impl KeyboardAdc {
    pub fn spawn() -> Self {
        let adc = Self {
            level: Arc::new(Mutex::new(None)),
        };
        let shared = adc.level.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let (raw, hold) = match line.trim() {
                    "a" => (LEFT_LEVEL, TAP),
                    "d" => (RIGHT_LEVEL, TAP),
                    "s" => (CENTER_LEVEL, TAP),
                    "S" => (CENTER_LEVEL, HOLD),
                    "" => continue,
                    other => {
                        warn!("unknown key {:?}, use a/d/s/S", other);
                        continue;
                    }
                };
                if let Ok(mut level) = shared.lock() {
                    *level = Some(Level {
                        raw,
                        until: Instant::now() + hold,
                    });
                }
            }
            info!("stdin closed, keyboard input stopped");
        });
        adc
    }
}

impl ButtonAdc for KeyboardAdc {
    type Error = core::convert::Infallible;

    fn sample(&mut self) -> Result<u16, Self::Error> {
        let level = self.level.lock().ok().and_then(|l| *l);
        Ok(match level {
            Some(l) if Instant::now() < l.until => l.raw,
            _ => IDLE_LEVEL,
        })
    }
}
