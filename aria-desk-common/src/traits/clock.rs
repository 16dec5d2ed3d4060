use jiff::civil::DateTime;

/// 墙上时间（本地时区）
pub trait WallClock {
    fn now(&self) -> DateTime;
}
