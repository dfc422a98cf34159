use std::time::Duration;

/// Retry/timeout policy for a layer of invocations.
///
/// Attempt numbering is 1-based: an operation that succeeds immediately
/// used 1 attempt and waited no backoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Hard ceiling on attempts, including the first.
  pub max_attempts: u32,
  /// Backoff waited after the first failed attempt.
  pub initial_backoff: Duration,
  /// Multiplier applied to the backoff after each failed attempt.
  pub backoff_multiplier: u32,
  /// Upper bound on any single backoff interval.
  pub max_backoff: Duration,
  /// Timeout applied to each individual attempt.
  pub attempt_timeout: Duration,
}

impl RetryPolicy {
  /// Policy applied around every pipeline step invocation.
  pub fn pipeline_step() -> Self {
    Self {
      max_attempts: 3,
      initial_backoff: Duration::from_secs(1),
      backoff_multiplier: 2,
      max_backoff: Duration::from_secs(10),
      attempt_timeout: Duration::from_secs(30),
    }
  }

  /// Policy applied around the supervisor's start/status calls.
  pub fn supervision() -> Self {
    Self {
      max_attempts: 5,
      initial_backoff: Duration::from_millis(500),
      backoff_multiplier: 2,
      max_backoff: Duration::from_secs(5),
      attempt_timeout: Duration::from_secs(10),
    }
  }

  /// Backoff to wait after the given failed attempt (1-based).
  pub fn backoff_for(&self, attempt: u32) -> Duration {
    let factor = self
      .backoff_multiplier
      .saturating_pow(attempt.saturating_sub(1));
    self
      .initial_backoff
      .saturating_mul(factor)
      .min(self.max_backoff)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pipeline_step_schedule() {
    let policy = RetryPolicy::pipeline_step();
    assert_eq!(policy.backoff_for(1), Duration::from_secs(1));
    assert_eq!(policy.backoff_for(2), Duration::from_secs(2));
    assert_eq!(policy.backoff_for(3), Duration::from_secs(4));
  }

  #[test]
  fn test_supervision_schedule_caps() {
    let policy = RetryPolicy::supervision();
    assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
    assert_eq!(policy.backoff_for(2), Duration::from_secs(1));
    assert_eq!(policy.backoff_for(4), Duration::from_secs(4));
    // 500ms * 2^4 = 8s, capped at 5s
    assert_eq!(policy.backoff_for(5), Duration::from_secs(5));
  }

  #[test]
  fn test_backoff_saturates_on_large_attempt() {
    let policy = RetryPolicy::pipeline_step();
    assert_eq!(policy.backoff_for(u32::MAX), Duration::from_secs(10));
  }
}
