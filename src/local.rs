// local.rs - 行程本地時區的便利包裝
//
// 以行程當前配置的本地時區（chrono::Local）求值的自由函數，
// 每個函數都委派給 Truncator::new(Local)。結果只在行程的時區
// 配置固定不變時才可重現；需要可重現結果的呼叫端應直接使用
// 帶顯式時區的 Truncator。

use chrono::Local;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::TimeResult;
use crate::truncate::Truncator;

/// 回傳同一天本地時間 12:00:00.000 的時間戳
pub fn noon(timestamp: i64) -> i64 {
    Truncator::new(Local).noon(timestamp)
}

/// 回傳同一天本地時間 00:00:00.000 的時間戳
pub fn start_of_day(timestamp: i64) -> i64 {
    Truncator::new(Local).start_of_day(timestamp)
}

/// 截斷秒和毫秒
pub fn start_of_minute(timestamp: i64) -> i64 {
    Truncator::new(Local).start_of_minute(timestamp)
}

/// 只截斷毫秒
pub fn start_of_second(timestamp: i64) -> i64 {
    Truncator::new(Local).start_of_second(timestamp)
}

/// 回傳 h:m:59.999
pub fn end_of_minute(timestamp: i64) -> i64 {
    Truncator::new(Local).end_of_minute(timestamp)
}

/// 回傳同一天本地時間 23:59:59.000 的時間戳
pub fn end_of_day(timestamp: i64) -> i64 {
    Truncator::new(Local).end_of_day(timestamp)
}

/// 回傳同一天的 (start_of_day, end_of_day) 區間
pub fn day_bounds(timestamp: i64) -> (i64, i64) {
    Truncator::new(Local).day_bounds(timestamp)
}

/// 回傳時間戳距本地午夜的毫秒數；輸入非正數時回傳 0
pub fn millis_of_day(timestamp: i64) -> i64 {
    Truncator::new(Local).millis_of_day(timestamp)
}

/// 保留日期，把時間部分替換為距午夜 `millis_of_day` 毫秒
pub fn with_millis_of_day(timestamp: i64, millis_of_day: i64) -> TimeResult<i64> {
    Truncator::new(Local).with_millis_of_day(timestamp, millis_of_day)
}

/// 獲取當前系統時間的毫秒時間戳
pub fn current_timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
