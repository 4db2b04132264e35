//! Clock used to measure network uptime.
//!
//! A network reads [`Clock::now`] once when it is built and reports
//! [`Clock::elapsed_since`] that instant as its uptime. Tests replace the
//! system source with a [`MockClock`] and step it forward by hand.
//!
//! ```
//! use flowline_core::Clock;
//!
//! let clock = Clock::default();
//! let started = clock.now();
//! let uptime = clock.elapsed_since(started);
//! assert!(uptime.as_secs() < 60);
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of instants behind a [`Clock`].
///
/// ```
/// use std::sync::Arc;
/// use std::time::Instant;
/// use flowline_core::{Clock, ClockProvider};
///
/// struct Frozen(Instant);
///
/// impl ClockProvider for Frozen {
///     fn now(&self) -> Instant {
///         self.0
///     }
/// }
///
/// let started = Instant::now();
/// let clock = Clock::with_provider(Arc::new(Frozen(started)));
/// assert!(clock.elapsed_since(started).is_zero());
/// ```
pub trait ClockProvider: Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
struct SystemClock;

impl ClockProvider for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cloneable handle over a [`ClockProvider`]. Defaults to the monotonic
/// system clock.
#[derive(Clone)]
pub struct Clock {
    provider: Arc<dyn ClockProvider>,
}

impl core::fmt::Debug for Clock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Clock").finish_non_exhaustive()
    }
}

impl Clock {
    /// Reads `std::time::Instant::now`.
    #[must_use]
    pub fn system() -> Self {
        Self {
            provider: Arc::new(SystemClock),
        }
    }

    /// Reads from `provider`.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ClockProvider>) -> Self {
        Self { provider }
    }

    /// Returns the provider's current instant.
    #[must_use]
    pub fn now(&self) -> Instant {
        self.provider.now()
    }

    /// Returns how long ago `earlier` was, or zero if the provider has moved
    /// behind it.
    #[must_use]
    pub fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

/// Hand-driven [`ClockProvider`] for uptime assertions.
///
/// ```ignore
/// use std::sync::Arc;
/// use std::time::{Duration, Instant};
/// use flowline_core::{Clock, MockClock};
///
/// let mock = Arc::new(MockClock::new(Instant::now()));
/// let clock = Clock::with_provider(mock.clone());
/// let started = clock.now();
///
/// mock.advance(Duration::from_secs(5));
/// assert_eq!(clock.elapsed_since(started), Duration::from_secs(5));
/// ```
#[cfg(any(test, feature = "test-utils"))]
pub struct MockClock {
    current: parking_lot::RwLock<Instant>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockClock {
    /// Starts the mock at `start`.
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self {
            current: parking_lot::RwLock::new(start),
        }
    }

    /// Moves the mock forward.
    pub fn advance(&self, duration: Duration) {
        *self.current.write() += duration;
    }

    /// Jumps to `instant`, which may be earlier than the current one.
    pub fn set(&self, instant: Instant) {
        *self.current.write() = instant;
    }

    /// Returns the instant the mock currently reports.
    #[must_use]
    pub fn current(&self) -> Instant {
        *self.current.read()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl ClockProvider for MockClock {
    fn now(&self) -> Instant {
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mocked() -> (Arc<MockClock>, Clock, Instant) {
        let mock = Arc::new(MockClock::new(Instant::now() + Duration::from_secs(60)));
        let clock = Clock::with_provider(mock.clone());
        let started = clock.now();
        (mock, clock, started)
    }

    #[test]
    fn system_clock_reads_between_surrounding_instants() {
        let before = Instant::now();
        let read = Clock::system().now();
        assert!(before <= read && read <= Instant::now());
    }

    #[test]
    fn uptime_starts_at_zero() {
        let (_mock, clock, started) = mocked();
        assert_eq!(clock.elapsed_since(started), Duration::ZERO);
    }

    #[test]
    fn uptime_accumulates_advances() {
        let (mock, clock, started) = mocked();

        mock.advance(Duration::from_millis(250));
        mock.advance(Duration::from_secs(1));

        assert_eq!(clock.elapsed_since(started), Duration::from_millis(1_250));
    }

    #[test]
    fn clones_share_the_provider() {
        let (mock, clock, started) = mocked();
        let copy = clock.clone();

        mock.advance(Duration::from_secs(3));

        assert_eq!(copy.elapsed_since(started), clock.elapsed_since(started));
    }

    #[test]
    fn uptime_saturates_when_the_mock_jumps_back() {
        let (mock, clock, started) = mocked();
        mock.set(started - Duration::from_secs(10));

        assert_eq!(mock.current() + Duration::from_secs(10), started);
        assert_eq!(clock.elapsed_since(started), Duration::ZERO);
    }
}
