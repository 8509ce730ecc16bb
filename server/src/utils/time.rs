//! 时间工具函数
//!
//! 全栈时间戳统一使用 `i64` Unix millis，
//! repository 层只接收和返回毫秒时间戳。

/// Current time as unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Convert whole minutes to milliseconds
pub fn minutes_to_millis(minutes: i64) -> i64 {
    minutes * 60_000
}
