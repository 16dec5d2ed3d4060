use crate::types::{NetworkError, Quote, WeatherReport};

/// 天气与每日一句的数据来源
///
/// Calls block until the data arrives or the source gives up.
pub trait InfoSource {
    fn fetch_quote(&mut self) -> Result<Quote, NetworkError>;

    fn fetch_weather(&mut self) -> Result<WeatherReport, NetworkError>;
}
