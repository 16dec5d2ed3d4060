use aria_desk_common::*;

pub struct SimulatorBuzzer {
    sounding: Option<u32>,
}

impl SimulatorBuzzer {
    pub fn new() -> Self {
        Self { sounding: None }
    }
}

impl ToneOutput for SimulatorBuzzer {
    type Error = core::convert::Infallible;

    fn start_tone(&mut self, frequency: u32) -> Result<(), Self::Error> {
        debug!("[Simulator Buzzer] {}Hz", frequency);
        self.sounding = Some(frequency);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        if self.sounding.take().is_some() {
            trace!("[Simulator Buzzer] silent");
        }
        Ok(())
    }
}
