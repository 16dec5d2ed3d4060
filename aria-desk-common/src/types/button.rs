/// 拨杆的四种互斥状态
///
/// The front toggle has a single analog line; each position pulls it into
/// its own voltage band. `None` doubles as "released".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    None,
    Left,
    Right,
    Center,
}

impl Button {
    pub fn is_pressed(&self) -> bool {
        !matches!(self, Button::None)
    }
}
