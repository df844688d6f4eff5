// convert.rs
//
// 提供毫秒時間戳與日曆時間之間的基礎轉換函數。
// 主要功能：
// 1. 在毫秒時間戳和帶時區的 DateTime 之間互相轉換
// 2. 可選值（Option）形式的轉換，用於呼叫端的邊界層
// 3. 在「非正數即缺值」哨兵編碼和顯式 Option 編碼之間轉換

use chrono::{DateTime, LocalResult, TimeZone, Utc};

//
// 基礎時間轉換函數
//

/// 將 DateTime<Tz> 轉換為毫秒時間戳
pub fn datetime_to_timestamp_ms<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp_millis()
}

/// 將毫秒時間戳轉換為 DateTime<Tz>
///
/// 超出 chrono 可表示範圍的輸入會被鉗制到最近的可表示時刻。
pub fn timestamp_ms_to_datetime<Tz: TimeZone>(tz: &Tz, ts: i64) -> DateTime<Tz> {
    match tz.timestamp_millis_opt(ts) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            if ts < 0 {
                DateTime::<Utc>::MIN_UTC.with_timezone(tz)
            } else {
                DateTime::<Utc>::MAX_UTC.with_timezone(tz)
            }
        }
    }
}

//
// 可選值轉換函數
//

/// 將可選的 DateTime<Tz> 轉換為可選的毫秒時間戳
pub fn opt_datetime_to_opt_timestamp_ms<Tz: TimeZone>(dt: &Option<DateTime<Tz>>) -> Option<i64> {
    dt.as_ref().map(datetime_to_timestamp_ms)
}

/// 將可選的毫秒時間戳轉換為可選的 DateTime<Tz>
pub fn opt_timestamp_ms_to_opt_datetime<Tz: TimeZone>(
    tz: &Tz,
    ts: Option<i64>,
) -> Option<DateTime<Tz>> {
    ts.map(|t| timestamp_ms_to_datetime(tz, t))
}

//
// 哨兵編碼 <-> 顯式 Option 編碼
//

/// 將哨兵編碼的時間戳轉換為顯式的 Option 編碼
///
/// 非正數代表「缺值」，對應 None。
pub fn sentinel_to_opt(ts: i64) -> Option<i64> {
    (ts > 0).then_some(ts)
}

/// 將顯式的 Option 編碼轉換回哨兵編碼
pub fn opt_to_sentinel(ts: Option<i64>) -> i64 {
    ts.filter(|&t| t > 0).unwrap_or(0)
}
