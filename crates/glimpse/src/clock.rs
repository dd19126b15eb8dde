use std::time::Instant;

/// Millisecond wall clock.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Monotonic clock for native targets.
///
/// `Instant` is unavailable on `wasm32-unknown-unknown`; use
/// `web::PerformanceClock` there.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}
