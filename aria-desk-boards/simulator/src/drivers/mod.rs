mod button;
mod buzzer;
mod panel;
mod services;
mod storage;

pub use button::KeyboardAdc;
pub use buzzer::SimulatorBuzzer;
pub use panel::ConsolePanel;
pub use services::{LoggingPlayer, OfflineInfo, SystemClock};
pub use storage::{HostFileSystem, JsonFileStore};
