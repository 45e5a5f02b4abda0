//! Time-related utilities with clock abstraction for testability.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Local, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Manually driven clock for testing time-window logic.
///
/// Clones share the same underlying time, so a test can keep one handle
/// and advance it while another handle is owned by the code under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a new manual clock starting at the given timestamp
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_millis)),
        }
    }

    /// Move the clock forward by `millis`
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    /// Set the clock to an absolute timestamp
    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to a local wall-clock time (`HH:MM:SS`)
///
/// Out-of-range timestamps are rendered as `--:--:--`.
pub fn timestamp_to_local_time(timestamp_millis: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

/// Format an RFC 3339 timestamp as `DD/MM/YYYY at HH:MM` in local time
///
/// Returns `None` if the input cannot be parsed.
pub fn format_rfc3339_local(rfc3339: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(rfc3339).ok()?;
    Some(
        parsed
            .with_timezone(&Local)
            .format("%d/%m/%Y at %H:%M")
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_fixed_clock_returns_consistent_timestamp() {
        // テスト項目: FixedClock が複数回呼び出しても同じタイムスタンプを返す
        // given (前提条件):
        let fixed_time = 9876543210987;
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let timestamp1 = clock.now_millis();
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert_eq!(timestamp1, fixed_time);
        assert_eq!(timestamp2, fixed_time);
    }

    #[test]
    fn test_manual_clock_advance_is_shared_between_clones() {
        // テスト項目: ManualClock の進めた時刻がクローン間で共有される
        // given (前提条件):
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();

        // when (操作):
        handle.advance(250);

        // then (期待する結果):
        assert_eq!(clock.now_millis(), 1_250);
    }

    #[test]
    fn test_manual_clock_set() {
        // テスト項目: ManualClock に絶対時刻を設定できる
        // given (前提条件):
        let clock = ManualClock::new(0);

        // when (操作):
        clock.set(42);

        // then (期待する結果):
        assert_eq!(clock.now_millis(), 42);
    }

    #[test]
    fn test_timestamp_to_local_time_format() {
        // テスト項目: タイムスタンプが HH:MM:SS 形式に変換される
        // given (前提条件):
        let timestamp = 1672498800123;

        // when (操作):
        let result = timestamp_to_local_time(timestamp);

        // then (期待する結果):
        assert_eq!(result.len(), 8);
        assert_eq!(result.matches(':').count(), 2);
    }

    #[test]
    fn test_format_rfc3339_local_valid() {
        // テスト項目: RFC 3339 文字列が日付形式に変換される
        // given (前提条件):
        let input = "2024-03-15T12:30:00Z";

        // when (操作):
        let result = format_rfc3339_local(input);

        // then (期待する結果):
        let formatted = result.expect("valid RFC 3339 should parse");
        assert!(formatted.contains("/2024 at "));
    }

    #[test]
    fn test_format_rfc3339_local_invalid() {
        // テスト項目: 不正な文字列は None を返す
        // given (前提条件):
        let input = "not a date";

        // when (操作):
        let result = format_rfc3339_local(input);

        // then (期待する結果):
        assert!(result.is_none());
    }
}
