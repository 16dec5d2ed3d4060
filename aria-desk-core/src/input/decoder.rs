use aria_desk_common::*;
use embassy_time::{Duration, Instant};

/// 单线模拟按键解码
///
/// The toggle shares one ADC pin between its three positions. Each sample is
/// mapped onto a band, then debounced against the last accepted change: a
/// change that arrives inside the debounce window is taken as bounce, it
/// updates the remembered state but never produces an edge.
pub struct ButtonDecoder<A: ButtonAdc> {
    adc: A,
    bands: ButtonConfig,
    debounce: Duration,
    last_state: Button,
    last_change: Option<Instant>,
}

impl<A: ButtonAdc> ButtonDecoder<A> {
    pub fn new(adc: A, config: &ButtonConfig) -> Self {
        Self {
            adc,
            bands: *config,
            debounce: Duration::from_millis(config.debounce_ms),
            last_state: Button::None,
            last_change: None,
        }
    }

    pub fn classify(&self, raw: u16) -> Button {
        if self.bands.right.contains(raw) {
            Button::Right
        } else if self.bands.left.contains(raw) {
            Button::Left
        } else if self.bands.center.contains(raw) {
            Button::Center
        } else {
            Button::None
        }
    }

    /// Current position without debouncing.
    pub fn read_raw(&mut self) -> Button {
        match self.adc.sample() {
            Ok(raw) => self.classify(raw),
            Err(e) => {
                debug!("button sample failed: {:?}", e);
                Button::None
            }
        }
    }

    pub fn read_edge(&mut self, now: Instant) -> Button {
        let state = self.read_raw();
        self.observe(state, now)
    }

    /// Feed one classified sample. Returns the pressed position on an
    /// accepted press, `Button::None` otherwise (releases included).
    pub fn observe(&mut self, state: Button, now: Instant) -> Button {
        if state == self.last_state {
            return Button::None;
        }

        let bounced = self
            .last_change
            .is_some_and(|at| now.saturating_duration_since(at) < self.debounce);
        self.last_state = state;
        if bounced {
            trace!("button bounce absorbed: {:?}", state);
            return Button::None;
        }

        self.last_change = Some(now);
        state
    }

    pub fn last_state(&self) -> Button {
        self.last_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedAdc;

    fn decoder() -> ButtonDecoder<ScriptedAdc> {
        ButtonDecoder::new(ScriptedAdc::new(&[]), &ButtonConfig::default())
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn classifies_default_bands() {
        let d = decoder();
        assert_eq!(d.classify(3150), Button::Right);
        assert_eq!(d.classify(3000), Button::Right);
        assert_eq!(d.classify(2200), Button::Left);
        assert_eq!(d.classify(40), Button::Center);
        assert_eq!(d.classify(4095), Button::None);
    }

    #[test]
    fn gaps_between_bands_read_as_none() {
        let d = decoder();
        for raw in [100, 1500, 2600, 3400, 3999] {
            assert_eq!(d.classify(raw), Button::None, "raw {raw}");
        }
    }

    #[test]
    fn edge_inside_debounce_window_is_absorbed() {
        let mut d = decoder();
        assert_eq!(d.observe(Button::Left, at(1000)), Button::Left);
        assert_eq!(d.observe(Button::Right, at(1040)), Button::None);
        assert_eq!(d.last_state(), Button::Right);
        assert_eq!(d.observe(Button::Left, at(1150)), Button::Left);
    }

    #[test]
    fn release_restarts_window_without_edge() {
        let mut d = decoder();
        assert_eq!(d.observe(Button::Center, at(0)), Button::Center);
        assert_eq!(d.observe(Button::None, at(200)), Button::None);
        // 50 ms after the accepted release
        assert_eq!(d.observe(Button::Center, at(250)), Button::None);
        assert_eq!(d.observe(Button::None, at(260)), Button::None);
        assert_eq!(d.observe(Button::Center, at(400)), Button::Center);
    }

    #[test]
    fn steady_state_produces_single_edge() {
        let mut d = decoder();
        assert_eq!(d.observe(Button::Right, at(0)), Button::Right);
        for t in (20..2000).step_by(20) {
            assert_eq!(d.observe(Button::Right, at(t)), Button::None);
        }
    }

    #[test]
    fn sampling_errors_degrade_to_none() {
        let mut d = ButtonDecoder::new(
            ScriptedAdc::with_results(&[Err(()), Ok(2200)]),
            &ButtonConfig::default(),
        );
        assert_eq!(d.read_raw(), Button::None);
        assert_eq!(d.read_edge(at(500)), Button::Left);
    }
}
