// truncate.rs
//
// 時間戳截斷核心。將毫秒時間戳正規化到日曆單位的邊界：
// 一天的開始/結束、分鐘/秒的開始、分鐘的結束、正午，
// 以及讀寫時間戳在當天內的「毫秒數」分量。
//
// 所有運算都以顯式時區求值；時區由 Truncator 持有，
// 而不是在每次轉換時讀取行程的環境時區。

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use tracing::{trace, warn};

use crate::convert::timestamp_ms_to_datetime;
use crate::error::{TimeError, TimeResult};

/// 一天的毫秒數
pub const MILLIS_PER_DAY: i64 = 86_400_000;

// 夏令時間隙探測：步長 15 分鐘，上限一天
const GAP_PROBE_STEP: i64 = 15;
const GAP_PROBE_LIMIT: usize = 96;

/// 時間戳截斷器
///
/// 持有求值用的時區。對任何非正數輸入，每個運算都直接回傳 0
/// （哨兵值，代表「缺值」），不做任何時區轉換。
#[derive(Debug, Clone)]
pub struct Truncator<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> Truncator<Tz> {
    /// 以指定時區創建截斷器
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// 取得截斷器使用的時區
    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    //
    // 截斷運算
    //

    /// 回傳同一天的 12:00:00.000
    pub fn noon(&self, timestamp: i64) -> i64 {
        self.snap(timestamp, |_| (12, 0, 0, 0))
    }

    /// 回傳同一天的 00:00:00.000
    pub fn start_of_day(&self, timestamp: i64) -> i64 {
        self.snap(timestamp, |_| (0, 0, 0, 0))
    }

    /// 截斷秒和毫秒，回傳 h:m:00.000
    pub fn start_of_minute(&self, timestamp: i64) -> i64 {
        self.snap(timestamp, |t| (t.hour(), t.minute(), 0, 0))
    }

    /// 只截斷毫秒，回傳 h:m:s.000
    pub fn start_of_second(&self, timestamp: i64) -> i64 {
        self.snap(timestamp, |t| (t.hour(), t.minute(), t.second(), 0))
    }

    /// 回傳 h:m:59.999
    pub fn end_of_minute(&self, timestamp: i64) -> i64 {
        self.snap(timestamp, |t| (t.hour(), t.minute(), 59, 999))
    }

    /// 回傳同一天的 23:59:59.000
    ///
    /// 注意毫秒分量是 0 而非 999，與 `end_of_minute` 不對稱。
    pub fn end_of_day(&self, timestamp: i64) -> i64 {
        self.snap(timestamp, |_| (23, 59, 59, 0))
    }

    /// 回傳同一天的 (start_of_day, end_of_day) 區間
    pub fn day_bounds(&self, timestamp: i64) -> (i64, i64) {
        (self.start_of_day(timestamp), self.end_of_day(timestamp))
    }

    //
    // 當天毫秒數分量
    //

    /// 回傳時間戳距離當地午夜的毫秒數；輸入非正數時回傳 0
    pub fn millis_of_day(&self, timestamp: i64) -> i64 {
        if timestamp <= 0 {
            return 0;
        }
        let time = timestamp_ms_to_datetime(&self.tz, timestamp).time();
        i64::from(time.num_seconds_from_midnight()) * 1_000
            + i64::from(time.nanosecond() / 1_000_000)
    }

    /// 把時間戳的日期保留，時間部分替換為距午夜 `millis_of_day` 毫秒
    ///
    /// `millis_of_day` 必須落在 `0..MILLIS_PER_DAY`，否則回傳
    /// `TimeError::MillisOfDayOutOfRange`。輸入時間戳非正數時回傳 Ok(0)，
    /// 不檢查 `millis_of_day`。
    pub fn with_millis_of_day(&self, timestamp: i64, millis_of_day: i64) -> TimeResult<i64> {
        if timestamp <= 0 {
            return Ok(0);
        }
        if !(0..MILLIS_PER_DAY).contains(&millis_of_day) {
            warn!(millis_of_day, "拒絕超出一天範圍的當天毫秒數");
            return Err(TimeError::MillisOfDayOutOfRange { millis_of_day });
        }
        let secs = (millis_of_day / 1_000) as u32;
        let nanos = ((millis_of_day % 1_000) * 1_000_000) as u32;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
            .ok_or(TimeError::MillisOfDayOutOfRange { millis_of_day })?;
        let local = timestamp_ms_to_datetime(&self.tz, timestamp);
        Ok(self.resolve_local_ms(local.date_naive().and_time(time)))
    }

    //
    // 內部輔助
    //

    /// 把輸入時間戳換算為當地日曆時刻，替換其時間部分後換算回時間戳
    fn snap<F>(&self, timestamp: i64, time_of_day: F) -> i64
    where
        F: FnOnce(&DateTime<Tz>) -> (u32, u32, u32, u32),
    {
        if timestamp <= 0 {
            return 0;
        }
        let local = timestamp_ms_to_datetime(&self.tz, timestamp);
        let (hour, minute, second, milli) = time_of_day(&local);
        let time = NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
            .unwrap_or(NaiveTime::MIN);
        self.resolve_local_ms(local.date_naive().and_time(time))
    }

    /// 把牆上時刻解析為唯一的時間戳
    ///
    /// 模糊時刻（秋季回撥，同一牆上時刻出現兩次）取較早的一個；
    /// 落在夏令時間隙的時刻往後探測，取間隙後第一個可表示的時刻。
    fn resolve_local_ms(&self, naive: NaiveDateTime) -> i64 {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.timestamp_millis(),
            LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
            LocalResult::None => {
                let mut probe = naive;
                for _ in 0..GAP_PROBE_LIMIT {
                    probe = probe + Duration::minutes(GAP_PROBE_STEP);
                    if let Some(dt) = self.tz.from_local_datetime(&probe).earliest() {
                        trace!(requested = %naive, resolved = %probe, "牆上時刻落在時區轉換間隙");
                        return dt.timestamp_millis();
                    }
                }
                // 間隙不可能長達一天；保底按 UTC 解釋
                naive.and_utc().timestamp_millis()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    // 2024-03-15 14:37:22.500 +08:00
    const BASE: i64 = 1_710_484_642_500;

    fn truncator() -> Truncator<FixedOffset> {
        Truncator::new(FixedOffset::east_opt(8 * 3600).unwrap())
    }

    #[test]
    fn test_truncation_table() {
        let t = truncator();
        assert_eq!(t.start_of_day(BASE), 1_710_432_000_000); // 00:00:00.000
        assert_eq!(t.noon(BASE), 1_710_475_200_000); // 12:00:00.000
        assert_eq!(t.start_of_minute(BASE), 1_710_484_620_000); // 14:37:00.000
        assert_eq!(t.start_of_second(BASE), 1_710_484_642_000); // 14:37:22.000
        assert_eq!(t.end_of_minute(BASE), 1_710_484_679_999); // 14:37:59.999
        assert_eq!(t.end_of_day(BASE), 1_710_518_399_000); // 23:59:59.000
    }

    #[test]
    fn test_non_positive_sentinel() {
        let t = truncator();
        for ts in [0_i64, -1, i64::MIN] {
            assert_eq!(t.noon(ts), 0);
            assert_eq!(t.start_of_day(ts), 0);
            assert_eq!(t.start_of_minute(ts), 0);
            assert_eq!(t.start_of_second(ts), 0);
            assert_eq!(t.end_of_minute(ts), 0);
            assert_eq!(t.end_of_day(ts), 0);
            assert_eq!(t.millis_of_day(ts), 0);
            assert_eq!(t.day_bounds(ts), (0, 0));
            // 哨兵優先於參數檢查
            assert_eq!(t.with_millis_of_day(ts, -1), Ok(0));
        }
    }

    #[test]
    fn test_millis_of_day() {
        let t = truncator();
        // 14:37:22.500 = 52,642,500 毫秒
        assert_eq!(t.millis_of_day(BASE), 52_642_500);
        assert_eq!(t.millis_of_day(t.start_of_day(BASE)), 0);
    }

    #[test]
    fn test_with_millis_of_day_round_trip() {
        let t = truncator();
        let restored = t.with_millis_of_day(BASE, t.millis_of_day(BASE)).unwrap();
        assert_eq!(restored, BASE);
    }

    #[test]
    fn test_with_millis_of_day_rejects_out_of_range() {
        let t = truncator();
        assert_eq!(
            t.with_millis_of_day(BASE, -1),
            Err(TimeError::MillisOfDayOutOfRange { millis_of_day: -1 })
        );
        assert_eq!(
            t.with_millis_of_day(BASE, MILLIS_PER_DAY),
            Err(TimeError::MillisOfDayOutOfRange {
                millis_of_day: MILLIS_PER_DAY
            })
        );
        // 上界內的最大值是合法的
        assert!(t.with_millis_of_day(BASE, MILLIS_PER_DAY - 1).is_ok());
    }

    #[test]
    fn test_idempotence() {
        let t = truncator();
        assert_eq!(t.start_of_day(t.start_of_day(BASE)), t.start_of_day(BASE));
        assert_eq!(t.noon(t.noon(BASE)), t.noon(BASE));
        assert_eq!(
            t.start_of_minute(t.start_of_minute(BASE)),
            t.start_of_minute(BASE)
        );
        assert_eq!(
            t.start_of_second(t.start_of_second(BASE)),
            t.start_of_second(BASE)
        );
    }

    #[test]
    fn test_day_ordering() {
        let t = truncator();
        assert!(t.start_of_day(BASE) <= t.noon(BASE));
        assert!(t.noon(BASE) <= t.end_of_day(BASE));
    }
}
