//! Connection lifecycle state and reconnection policy.
//!
//! The functions here are pure so the policy can be tested without a
//! transport or timers.

use std::{fmt, time::Duration};

/// WebSocket close code sent on deliberate teardown (going away)
pub const DELIBERATE_CLOSE_CODE: u16 = 1001;

/// Lifecycle of the single chat connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Never connected
    Idle,
    /// Transport open in flight
    Connecting,
    /// Transport established
    Open,
    /// Deliberate close requested, waiting for the transport
    Closing,
    /// Not connected; a reconnect may be pending
    Closed,
    /// Reconnect attempts exhausted; no further automatic retries
    Failed,
}

impl ConnectionState {
    /// `true` while a transport exists or is being established
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Connecting)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A reconnect that has been scheduled after an unexpected close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReconnect {
    /// 1-indexed attempt number
    pub attempt: u32,
    /// Delay before the attempt starts
    pub delay: Duration,
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `attempts_so_far` - Reconnect attempts already made since the last successful open
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(attempts_so_far: u32, max_attempts: u32) -> bool {
    attempts_so_far < max_attempts
}

/// Linear backoff: `base × attempt`
pub fn reconnect_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

/// Plan the next reconnect after an unexpected close.
///
/// The attempt counter is incremented before it is used to compute the delay,
/// so the first reconnect waits `base × 1`. Returns `None` once the budget is
/// spent.
pub fn next_reconnect(
    attempts_so_far: u32,
    max_attempts: u32,
    base: Duration,
) -> Option<ScheduledReconnect> {
    if !should_attempt_reconnect(attempts_so_far, max_attempts) {
        return None;
    }

    let attempt = attempts_so_far + 1;
    Some(ScheduledReconnect {
        attempt,
        delay: reconnect_delay(base, attempt),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Duration = Duration::from_secs(5);

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let attempts = 3;

        // when (操作):
        let result = should_attempt_reconnect(attempts, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let attempts = 5;

        // when (操作):
        let result = should_attempt_reconnect(attempts, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_next_reconnect_first_attempt_uses_base_delay() {
        // テスト項目: 初回の再接続は base × 1 の遅延となる
        // given (前提条件):
        let attempts = 0;

        // when (操作):
        let plan = next_reconnect(attempts, 5, BASE);

        // then (期待する結果):
        assert_eq!(
            plan,
            Some(ScheduledReconnect {
                attempt: 1,
                delay: BASE
            })
        );
    }

    #[test]
    fn test_next_reconnect_third_attempt_is_linear() {
        // テスト項目: 3回目の再接続は base × 3 の遅延となる
        // given (前提条件):
        let attempts = 2;

        // when (操作):
        let plan = next_reconnect(attempts, 5, BASE);

        // then (期待する結果):
        let plan = plan.expect("third attempt should be scheduled");
        assert_eq!(plan.attempt, 3);
        assert_eq!(plan.delay, Duration::from_secs(15));
    }

    #[test]
    fn test_next_reconnect_exhausted() {
        // テスト項目: 上限に達した後は再接続が計画されない
        // given (前提条件):
        let attempts = 5;

        // when (操作):
        let plan = next_reconnect(attempts, 5, BASE);

        // then (期待する結果):
        assert!(plan.is_none());
    }

    #[test]
    fn test_is_active() {
        // テスト項目: Open と Connecting のみがアクティブと判定される
        // given (前提条件):
        let states = [
            (ConnectionState::Idle, false),
            (ConnectionState::Connecting, true),
            (ConnectionState::Open, true),
            (ConnectionState::Closing, false),
            (ConnectionState::Closed, false),
            (ConnectionState::Failed, false),
        ];

        // when (操作) / then (期待する結果):
        for (state, expected) in states {
            assert_eq!(state.is_active(), expected, "state: {}", state);
        }
    }
}
