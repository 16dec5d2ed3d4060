use alloc::string::String;

/// 首页显示的天气摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub temp: i16,
    pub humidity: u8,
    pub condition: String,
}

/// 每日一句
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}
