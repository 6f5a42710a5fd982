//! Bounded waiting against applications we cannot script directly.

use std::thread;
use std::time::{Duration, Instant};

/// Run `attempt` until it returns `true`, at most `max_attempts` times,
/// sleeping `delay` between failed attempts. `attempt` receives the 1-based
/// attempt number. Returns whether any attempt succeeded.
pub fn retry<F>(max_attempts: u32, delay: Duration, mut attempt: F) -> bool
where
    F: FnMut(u32) -> bool,
{
    for n in 1..=max_attempts {
        if attempt(n) {
            return true;
        }
        if n < max_attempts && !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    false
}

/// Poll `check` every `interval` until it yields a value or `timeout`
/// elapses. `check` always runs at least once.
pub fn poll_until<T, F>(timeout: Duration, interval: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    let start = Instant::now();
    loop {
        if let Some(value) = check() {
            return Some(value);
        }
        if start.elapsed() >= timeout {
            return None;
        }
        thread::sleep(interval.min(timeout.saturating_sub(start.elapsed())));
    }
}

/// Block the calling thread, skipping the syscall for zero durations.
pub fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
