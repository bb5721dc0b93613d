use std::thread;
use std::time::{Duration, Instant};

pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run `probe` until it yields a value or `timeout` elapses
///
/// The probe always runs at least once, so a zero timeout is a single check.
pub fn poll_until<T, E>(
    timeout: Duration,
    mut probe: impl FnMut() -> Result<Option<T>, E>,
) -> Result<Option<T>, E> {
    let start = Instant::now();

    loop {
        if let Some(value) = probe()? {
            return Ok(Some(value));
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}
