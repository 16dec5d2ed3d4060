use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions},
    primitives::Rectangle,
};

/// 墨水屏
///
/// Drawing goes into the frame buffer through `DrawTarget`; nothing reaches
/// the glass until `commit`. The window chosen before drawing decides
/// whether `commit` performs a full refresh (slow, flashes, clears ghosting)
/// or a partial one limited to the window.
pub trait Panel: DrawTarget<Color = BinaryColor, Error: core::fmt::Debug> + OriginDimensions {
    fn set_full_window(&mut self);

    fn set_partial_window(&mut self, area: Rectangle);

    fn commit(&mut self) -> Result<(), Self::Error>;

    /// True while the controller is still driving a refresh.
    fn is_busy(&self) -> bool {
        false
    }
}
