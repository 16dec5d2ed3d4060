pub mod audio;
pub mod button;
pub mod buzzer;
pub mod clock;
pub mod font;
pub mod info;
pub mod panel;
pub mod storage;

pub use audio::*;
pub use button::*;
pub use buzzer::*;
pub use clock::*;
pub use font::*;
pub use info::*;
pub use panel::*;
pub use storage::*;
