/// Elapsed animation time with pause/resume.
///
/// All values are milliseconds. While running, `elapsed = now - start`;
/// resuming rebases `start` so elapsed time continues where it stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    start: f64,
    elapsed: f64,
    paused: bool,
}

impl Timeline {
    pub fn new(now: f64) -> Self {
        Self {
            start: now,
            elapsed: 0.0,
            paused: false,
        }
    }

    /// Advance to `now` unless paused; returns the elapsed time.
    pub fn tick(&mut self, now: f64) -> f64 {
        if !self.paused {
            self.elapsed = now - self.start;
        }
        self.elapsed
    }

    pub fn pause(&mut self, now: f64) {
        self.tick(now);
        self.paused = true;
    }

    pub fn resume(&mut self, now: f64) {
        self.start = now - self.elapsed;
        self.paused = false;
    }

    /// Move elapsed time forward by exactly `delta`, independent of the clock.
    ///
    /// When running, `start` moves too so the next tick keeps the offset.
    pub fn step(&mut self, delta: f64) {
        self.elapsed += delta;
        self.start -= delta;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_follows_clock() {
        let mut timeline = Timeline::new(1000.0);
        assert_eq!(timeline.tick(1250.0), 250.0);
        assert_eq!(timeline.tick(2000.0), 1000.0);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut timeline = Timeline::new(0.0);
        timeline.pause(100.0);
        assert_eq!(timeline.tick(5000.0), 100.0);
        assert!(timeline.is_paused());
    }

    #[test]
    fn test_resume_is_continuous() {
        let mut timeline = Timeline::new(0.0);
        timeline.pause(100.0);
        timeline.resume(900.0);
        assert_eq!(timeline.tick(900.0), 100.0);
        assert_eq!(timeline.tick(950.0), 150.0);
    }

    #[test]
    fn test_step_while_paused() {
        let mut timeline = Timeline::new(0.0);
        timeline.pause(40.0);
        for _ in 0..3 {
            timeline.step(5.0);
        }
        assert_eq!(timeline.elapsed(), 55.0);
        assert_eq!(timeline.tick(10_000.0), 55.0);
    }

    #[test]
    fn test_step_while_running_survives_tick() {
        let mut timeline = Timeline::new(0.0);
        timeline.tick(10.0);
        timeline.step(1.0);
        assert_eq!(timeline.elapsed(), 11.0);
        assert_eq!(timeline.tick(20.0), 21.0);
    }
}
