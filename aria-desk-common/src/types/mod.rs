pub mod alarm;
pub mod button;
pub mod config;
pub mod error;
pub mod info;
pub mod melody;

pub use alarm::*;
pub use button::*;
pub use config::*;
pub use error::*;
pub use info::*;
pub use melody::*;
