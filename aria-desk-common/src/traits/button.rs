/// 拨杆所在的模拟输入
///
/// One raw ADC conversion per call. Classification into [`crate::Button`]
/// states happens in the decoder, not in the driver.
pub trait ButtonAdc {
    type Error: core::fmt::Debug;

    fn sample(&mut self) -> Result<u16, Self::Error>;
}
