// error.rs - 時間工具錯誤類型

use thiserror::Error;

/// 時間工具錯誤類型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// 一天內毫秒數超出範圍
    #[error("一天內毫秒數超出範圍: {millis_of_day}，有效範圍為 0..86400000")]
    MillisOfDayOutOfRange { millis_of_day: i64 },
}

/// 時間工具結果類型別名
pub type TimeResult<T> = Result<T, TimeError>;
