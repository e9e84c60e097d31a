use std::time::Duration;

/// A cancellable periodic cadence measured in simulation time.
///
/// The ticker does not read any clock itself; callers feed it elapsed time
/// via [`Ticker::advance()`] and it reports how many periods have passed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Ticker {
    period: Duration,
    /// Time accumulated since the last tick, or `None` while stopped
    elapsed: Option<Duration>,
}

impl Ticker {
    /// Create a stopped ticker.  A zero `period` is treated as one
    /// millisecond.
    pub(crate) fn new(period: Duration) -> Ticker {
        Ticker {
            period: period.max(Duration::from_millis(1)),
            elapsed: None,
        }
    }

    /// Start ticking.  Does nothing if the ticker is already running.
    pub(crate) fn start(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = Some(Duration::ZERO);
        }
    }

    /// Stop ticking and discard any partially-elapsed period
    pub(crate) fn cancel(&mut self) {
        self.elapsed = None;
    }

    pub(crate) fn is_active(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Time remaining until the next tick, or `None` if stopped
    pub(crate) fn until_next(&self) -> Option<Duration> {
        self.elapsed.map(|e| self.period.saturating_sub(e))
    }

    /// Let `dt` pass and return the number of ticks that fell due
    pub(crate) fn advance(&mut self, dt: Duration) -> u32 {
        let Some(elapsed) = self.elapsed.as_mut() else {
            return 0;
        };
        *elapsed = elapsed.saturating_add(dt);
        let mut due = 0;
        while *elapsed >= self.period {
            *elapsed -= self.period;
            due += 1;
        }
        due
    }
}
