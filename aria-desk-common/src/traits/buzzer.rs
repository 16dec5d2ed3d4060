/// 蜂鸣器
///
/// Non-blocking: `start_tone` keeps sounding until `stop` or the next
/// `start_tone`. Note timing is owned by the caller.
pub trait ToneOutput {
    type Error: core::fmt::Debug;

    fn start_tone(&mut self, frequency: u32) -> Result<(), Self::Error>;

    fn stop(&mut self) -> Result<(), Self::Error>;
}
