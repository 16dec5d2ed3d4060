//! 具体页面
//!
//! Layouts target a 250x122 panel and the 6x10 mono font; they are
//! deliberately plain.

mod alarms;
mod calendar;
mod files;
mod home;
mod music;
mod reader;
pub mod widgets;

pub use alarms::AlarmsPage;
pub use calendar::{CalendarCursor, CalendarPage};
pub use files::FilesPage;
pub use home::HomePage;
pub use music::MusicPage;
pub use reader::ReaderPage;

pub const HOME_PAGE: usize = 0;
pub const CALENDAR_PAGE: usize = 1;
pub const ALARMS_PAGE: usize = 2;
pub const FILES_PAGE: usize = 3;
pub const READER_PAGE: usize = 4;
pub const MUSIC_PAGE: usize = 5;
