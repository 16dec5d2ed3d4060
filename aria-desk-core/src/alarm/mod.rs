//! 闹钟：持久化、触发判定与响铃状态机

mod book;
mod ringer;
mod scheduler;

pub use book::{ALARMS_KEY, AlarmBook};
pub use ringer::AlarmRinger;
pub use scheduler::AlarmScheduler;
