//! Minimum-interval pacing without blocking a thread.

use tokio::time::{Duration, Instant, sleep_until};

/// Ensures consecutive [`ready`](Self::ready) calls return at least
/// `interval` apart. A zero interval never waits.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last: Option<Instant>,
}

impl Pacer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Wait until the interval since the previous call has elapsed, then
    /// record this call.
    pub async fn ready(&mut self) {
        let at = self.next_at();
        if at > Instant::now() {
            sleep_until(at).await;
        }
        self.mark();
    }

    /// Earliest instant the next call may proceed. Callers that cannot
    /// park inside [`ready`](Self::ready) sleep until this, then [`mark`](Self::mark).
    #[must_use]
    pub fn next_at(&self) -> Instant {
        self.last
            .map_or_else(Instant::now, |last| last + self.interval)
    }

    /// Record a call made now.
    pub fn mark(&mut self) {
        self.last = Some(Instant::now());
    }
}
