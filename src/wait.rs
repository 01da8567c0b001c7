use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Tags for predicate failures that callers can whitelist as "not ready yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Hostname could not be resolved.
    Resolve,
    /// ICMP socket could not be opened.
    Socket,
    /// Target did not answer within the probe timeout.
    Unreachable,
    /// Underlying I/O failure.
    Io,
    /// Anything that does not fit the kinds above.
    Other,
}

/// Implemented by error types whose failures can be classified for retry.
pub trait Fault {
    fn kind(&self) -> FaultKind;
}

#[derive(Debug, Error)]
pub enum WaitError<E: std::error::Error> {
    #[error("timed out after {elapsed:?} waiting for {waiting_for}")]
    Timeout {
        waiting_for: String,
        elapsed: Duration,
    },
    #[error(transparent)]
    Check(E),
}

/// How long to keep polling and how long to sleep between checks.
#[derive(Debug, Clone)]
pub struct WaitOpts {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitOpts {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(1),
        }
    }
}

impl WaitOpts {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Polls `check` until it reports ready, a non-retryable error occurs, or
/// `opts.timeout` elapses.
///
/// `check` returns `Ok(Some(v))` when the awaited condition holds (`v` is
/// handed back to the caller), `Ok(None)` when it does not hold yet, and
/// `Err(e)` on failure. Errors whose [`Fault::kind`] appears in `retry_on`
/// are treated like "not yet" and retried; any other error aborts the wait
/// immediately, unmodified.
///
/// The predicate is always evaluated at least once, so a zero timeout means
/// "check exactly once". The timeout error embeds `waiting_for` so a failed
/// wait is diagnosable from the message alone.
pub fn wait_for<T, E, F>(
    waiting_for: &str,
    opts: &WaitOpts,
    retry_on: &[FaultKind],
    mut check: F,
) -> Result<T, WaitError<E>>
where
    E: std::error::Error + Fault,
    F: FnMut() -> Result<Option<T>, E>,
{
    let started = Instant::now();
    loop {
        match check() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                log::debug!("still waiting for {waiting_for}");
            }
            Err(e) if retry_on.contains(&e.kind()) => {
                log::debug!("transient failure while waiting for {waiting_for}: {e}");
            }
            Err(e) => return Err(WaitError::Check(e)),
        }

        let elapsed = started.elapsed();
        if elapsed >= opts.timeout {
            return Err(WaitError::Timeout {
                waiting_for: waiting_for.to_string(),
                elapsed,
            });
        }
        thread::sleep(opts.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Error)]
    enum TestError {
        #[error("connection refused")]
        Connection,
        #[error("bad value")]
        BadValue,
    }

    impl Fault for TestError {
        fn kind(&self) -> FaultKind {
            match self {
                TestError::Connection => FaultKind::Unreachable,
                TestError::BadValue => FaultKind::Other,
            }
        }
    }

    fn quick_opts() -> WaitOpts {
        WaitOpts::new(Duration::from_millis(200), Duration::from_millis(50))
    }

    #[test]
    fn returns_immediately_when_already_true() {
        let started = Instant::now();
        let value: Result<u32, WaitError<TestError>> =
            wait_for("nothing at all", &quick_opts(), &[], || Ok(Some(7)));
        assert_eq!(value.unwrap(), 7);
        // No sleep cycle should have happened.
        assert!(started.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn times_out_with_description_in_message() {
        let started = Instant::now();
        let result: Result<(), WaitError<TestError>> =
            wait_for("router agent to come back", &quick_opts(), &[], || Ok(None));
        let err = result.unwrap_err();
        assert!(matches!(err, WaitError::Timeout { .. }));
        assert!(err.to_string().contains("router agent to come back"));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[test]
    fn retries_through_whitelisted_errors() {
        let calls = Cell::new(0u32);
        let result: Result<bool, WaitError<TestError>> = wait_for(
            "probe to succeed",
            &WaitOpts::new(Duration::from_secs(5), Duration::from_millis(10)),
            &[FaultKind::Unreachable],
            || {
                calls.set(calls.get() + 1);
                if calls.get() <= 3 {
                    Err(TestError::Connection)
                } else {
                    Ok(Some(true))
                }
            },
        );
        assert!(result.unwrap());
        assert!(calls.get() >= 4);
    }

    #[test]
    fn fails_fast_on_unlisted_errors() {
        let started = Instant::now();
        let calls = Cell::new(0u32);
        let result: Result<(), WaitError<TestError>> = wait_for(
            "a condition that errors out",
            &WaitOpts::new(Duration::from_secs(60), Duration::from_secs(1)),
            &[FaultKind::Unreachable],
            || {
                calls.set(calls.get() + 1);
                Err(TestError::BadValue)
            },
        );
        assert!(matches!(result, Err(WaitError::Check(TestError::BadValue))));
        assert_eq!(calls.get(), 1);
        // Must not have waited out any part of the 60 s budget.
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn zero_timeout_still_checks_once() {
        let calls = Cell::new(0u32);
        let result: Result<u32, WaitError<TestError>> = wait_for(
            "instant condition",
            &WaitOpts::new(Duration::ZERO, Duration::from_millis(10)),
            &[],
            || {
                calls.set(calls.get() + 1);
                Ok(Some(1))
            },
        );
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.get(), 1);

        let result: Result<(), WaitError<TestError>> = wait_for(
            "never-true condition",
            &WaitOpts::new(Duration::ZERO, Duration::from_millis(10)),
            &[],
            || {
                calls.set(calls.get() + 1);
                Ok(None)
            },
        );
        assert!(matches!(result, Err(WaitError::Timeout { .. })));
        assert_eq!(calls.get(), 2);
    }
}
