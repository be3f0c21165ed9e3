//! Bounded polling for endpoints that race the server's background agents.
//!
//! After an upload is accepted, FOSSology unpacks and scans it in the
//! background. Until that work is done, detail, summary and license queries
//! answer 503. The policy here re-issues such a request after a fixed delay,
//! up to a fixed number of attempts. There is no backoff and no jitter.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Delay primitive used between polling attempts.
///
/// The default implementation awaits `tokio::time::sleep`. Swap it out with
/// [`FossologyClient::with_sleeper`](crate::FossologyClient::with_sleeper)
/// to run under another scheduler or to observe delays in tests.
#[async_trait]
pub trait Sleeper: Send + Sync + fmt::Debug {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay between two attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Upload detail fetch, which may run right after the upload was created
    /// and has to wait for the unpack agent.
    pub const UNPACK: Self = Self {
        max_attempts: 10,
        delay: Duration::from_secs(20),
    };

    /// Summary and license queries, usually issued once the upload is processed.
    pub const ANALYSIS: Self = Self {
        max_attempts: 3,
        delay: Duration::from_secs(3),
    };

    /// Report generation and download, which wait for the report agent.
    pub const REPORT: Self = Self {
        max_attempts: 10,
        delay: Duration::from_secs(3),
    };

    /// Waiting for a scheduled job to finish.
    pub const JOB: Self = Self {
        max_attempts: 30,
        delay: Duration::from_secs(10),
    };

    /// Run `attempt` until it is ready or the attempt budget is spent.
    ///
    /// `attempt` receives the 1-based attempt number. Errors are returned
    /// immediately and never retried.
    pub async fn run<T, F, Fut>(&self, sleeper: &dyn Sleeper, mut attempt: F) -> Result<Polled<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Attempt<T>>>,
    {
        for number in 1..=self.max_attempts {
            match attempt(number).await? {
                Attempt::Ready(value) => return Ok(Polled::Ready(value)),
                Attempt::NotReady if number < self.max_attempts => {
                    tracing::debug!(
                        attempt = number,
                        max = self.max_attempts,
                        delay_secs = self.delay.as_secs(),
                        "Server not ready, polling again"
                    );
                    sleeper.sleep(self.delay).await;
                }
                Attempt::NotReady => {}
            }
        }

        Ok(Polled::Exhausted {
            attempts: self.max_attempts,
        })
    }
}

/// Result of a single polling attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    /// The server answered with the final result.
    Ready(T),
    /// Background processing is still running.
    NotReady,
}

/// Result of a complete polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled<T> {
    /// An attempt produced a value.
    Ready(T),
    /// Every attempt reported "not ready".
    Exhausted { attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::error::FossologyError;

    #[derive(Debug, Default)]
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    impl RecordingSleeper {
        fn delays(&self) -> Vec<Duration> {
            self.delays.lock().unwrap().clone()
        }
    }

    #[test]
    fn test_ready_after_two_not_ready() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;

        let result = tokio_test::block_on(RetryPolicy::UNPACK.run(&sleeper, |number| {
            calls += 1;
            async move {
                if number < 3 {
                    Ok(Attempt::NotReady)
                } else {
                    Ok(Attempt::Ready(42))
                }
            }
        }))
        .unwrap();

        assert_eq!(result, Polled::Ready(42));
        assert_eq!(calls, 3);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(20); 2]);
    }

    #[test]
    fn test_exhausts_after_max_attempts_without_trailing_delay() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;

        let result: Polled<()> = tokio_test::block_on(RetryPolicy::UNPACK.run(&sleeper, |_| {
            calls += 1;
            async { Ok(Attempt::NotReady) }
        }))
        .unwrap();

        assert_eq!(result, Polled::Exhausted { attempts: 10 });
        assert_eq!(calls, 10);
        assert_eq!(sleeper.delays().len(), 9);
    }

    #[test]
    fn test_first_attempt_ready_never_sleeps() {
        let sleeper = RecordingSleeper::default();

        let result = tokio_test::block_on(
            RetryPolicy::ANALYSIS.run(&sleeper, |_| async { Ok(Attempt::Ready("done")) }),
        )
        .unwrap();

        assert_eq!(result, Polled::Ready("done"));
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_errors_are_not_retried() {
        let sleeper = RecordingSleeper::default();
        let mut calls = 0;

        let result: Result<Polled<()>> =
            tokio_test::block_on(RetryPolicy::ANALYSIS.run(&sleeper, |_| {
                calls += 1;
                async { Err(FossologyError::incomplete("boom")) }
            }));

        assert!(result.is_err());
        assert_eq!(calls, 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_analysis_policy_bounds() {
        assert_eq!(RetryPolicy::ANALYSIS.max_attempts, 3);
        assert_eq!(RetryPolicy::ANALYSIS.delay, Duration::from_secs(3));
        assert_eq!(RetryPolicy::UNPACK.max_attempts, 10);
        assert_eq!(RetryPolicy::UNPACK.delay, Duration::from_secs(20));
    }
}
