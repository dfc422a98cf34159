use std::time::Duration;

use tracing::warn;

use crate::policy::RetryPolicy;

/// Classification of a fault returned by a wrapped operation.
///
/// Transient faults (infrastructure errors, timeouts) are retried up to
/// the policy's ceiling. Terminal faults surface immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
  Transient,
  Terminal,
}

/// Successful outcome of a retried operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome<T> {
  pub value: T,
  /// Attempts used, including the successful one.
  pub attempts: u32,
}

/// Failure of a retried operation.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
  /// The final attempt exceeded the per-attempt timeout.
  #[error("attempt timed out after {timeout:?} ({attempts} attempts)")]
  TimedOut { attempts: u32, timeout: Duration },

  /// The attempt ceiling was exhausted; carries the last fault.
  #[error("retry budget exhausted after {attempts} attempts: {last}")]
  Exhausted { attempts: u32, last: E },

  /// The operation reported a fault classified as terminal.
  #[error("terminal fault: {0}")]
  Terminal(E),
}

/// Run `op` under `policy`, retrying transient faults.
///
/// Each attempt is bounded by the policy's per-attempt timeout; a timed
/// out attempt is dropped (its future is cancelled) before the next one
/// starts, so only one attempt is ever in flight. Backoff doubles after
/// each failed attempt up to the policy's cap.
pub async fn retry<T, E, C, F, Fut>(
  policy: &RetryPolicy,
  classify: C,
  mut op: F,
) -> Result<RetryOutcome<T>, RetryError<E>>
where
  E: std::fmt::Display,
  C: Fn(&E) -> FaultKind,
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, E>>,
{
  let mut attempts = 0u32;

  loop {
    attempts += 1;

    match tokio::time::timeout(policy.attempt_timeout, op()).await {
      Ok(Ok(value)) => return Ok(RetryOutcome { value, attempts }),

      Ok(Err(fault)) => match classify(&fault) {
        FaultKind::Terminal => return Err(RetryError::Terminal(fault)),
        FaultKind::Transient => {
          if attempts >= policy.max_attempts {
            return Err(RetryError::Exhausted {
              attempts,
              last: fault,
            });
          }
          warn!(attempt = attempts, fault = %fault, "transient fault, retrying");
        }
      },

      Err(_) => {
        if attempts >= policy.max_attempts {
          return Err(RetryError::TimedOut {
            attempts,
            timeout: policy.attempt_timeout,
          });
        }
        warn!(
          attempt = attempts,
          timeout_ms = policy.attempt_timeout.as_millis() as u64,
          "attempt timed out, retrying"
        );
      }
    }

    tokio::time::sleep(policy.backoff_for(attempts)).await;
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use super::*;

  #[derive(Debug, thiserror::Error)]
  enum TestFault {
    #[error("flaky")]
    Flaky,
    #[error("fatal")]
    Fatal,
  }

  fn classify(fault: &TestFault) -> FaultKind {
    match fault {
      TestFault::Flaky => FaultKind::Transient,
      TestFault::Fatal => FaultKind::Terminal,
    }
  }

  fn test_policy() -> RetryPolicy {
    RetryPolicy {
      max_attempts: 3,
      initial_backoff: Duration::from_millis(100),
      backoff_multiplier: 2,
      max_backoff: Duration::from_secs(1),
      attempt_timeout: Duration::from_secs(5),
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_immediate_success_uses_one_attempt() {
    let outcome = retry(&test_policy(), classify, || async { Ok::<_, TestFault>(7) })
      .await
      .unwrap();

    assert_eq!(outcome.value, 7);
    assert_eq!(outcome.attempts, 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_transient_faults_then_success() {
    let calls = AtomicU32::new(0);

    let outcome = retry(&test_policy(), classify, || {
      let n = calls.fetch_add(1, Ordering::SeqCst);
      async move {
        if n < 2 {
          Err(TestFault::Flaky)
        } else {
          Ok("done")
        }
      }
    })
    .await
    .unwrap();

    assert_eq!(outcome.value, "done");
    assert_eq!(outcome.attempts, 3);
  }

  #[tokio::test(start_paused = true)]
  async fn test_exhaustion_surfaces_last_fault() {
    let result = retry(&test_policy(), classify, || async {
      Err::<(), _>(TestFault::Flaky)
    })
    .await;

    match result {
      Err(RetryError::Exhausted { attempts, last }) => {
        assert_eq!(attempts, 3);
        assert!(matches!(last, TestFault::Flaky));
      }
      other => panic!("expected exhaustion, got {:?}", other),
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_terminal_fault_is_not_retried() {
    let calls = AtomicU32::new(0);

    let result = retry(&test_policy(), classify, || {
      calls.fetch_add(1, Ordering::SeqCst);
      async { Err::<(), _>(TestFault::Fatal) }
    })
    .await;

    assert!(matches!(result, Err(RetryError::Terminal(TestFault::Fatal))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn test_timeout_counts_as_transient() {
    let calls = AtomicU32::new(0);

    let outcome = retry(&test_policy(), classify, || {
      let n = calls.fetch_add(1, Ordering::SeqCst);
      async move {
        if n == 0 {
          // Exceeds the 5s per-attempt timeout; the attempt is dropped.
          tokio::time::sleep(Duration::from_secs(60)).await;
        }
        Ok::<_, TestFault>(n)
      }
    })
    .await
    .unwrap();

    assert_eq!(outcome.attempts, 2);
  }

  #[tokio::test(start_paused = true)]
  async fn test_all_attempts_time_out() {
    let result = retry(&test_policy(), classify, || async {
      tokio::time::sleep(Duration::from_secs(60)).await;
      Ok::<_, TestFault>(())
    })
    .await;

    match result {
      Err(RetryError::TimedOut { attempts, timeout }) => {
        assert_eq!(attempts, 3);
        assert_eq!(timeout, Duration::from_secs(5));
      }
      other => panic!("expected timeout, got {:?}", other),
    }
  }
}
