//! 时间工具函数
//!
//! 所有持久化时间戳统一为 `i64` Unix millis，
//! 日期→月份等转换在 API handler 层完成。

use chrono::{DateTime, Datelike, Utc};

/// 当前时间的 Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → 日历月 (1-12)，跨年份合并
pub fn month_of_millis(millis: i64) -> u32 {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.month())
        .unwrap_or(1)
}

/// 月份编号 (1-12) → 英文月份名
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn month_ignores_year() {
        let a = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2025, 3, 20, 22, 0, 0).unwrap();
        assert_eq!(month_of_millis(a.timestamp_millis()), 3);
        assert_eq!(month_of_millis(b.timestamp_millis()), 3);
    }

    #[test]
    fn month_names_cover_full_year() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
