// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

pub struct FpsCounter {
    interval: Duration,
    last_time: Instant,
    frames: u32,
    count: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            interval: Duration::from_secs(1),
            last_time: Instant::now(),
            frames: 0,
            count: 0,
        }
    }

    pub fn tick(&mut self) {
        self.count += 1;
        let now = Instant::now();
        if now.saturating_duration_since(self.last_time) > self.interval {
            self.frames = self.count;
            self.count = 0;
            self.last_time = now;
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rollover_publishes_count() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.frames(), 0);

        fps.tick();
        fps.tick();
        assert_eq!(fps.frames(), 0);

        fps.last_time = Instant::now() - Duration::from_secs(2);
        fps.tick();
        assert_eq!(fps.frames(), 3);
        assert_eq!(fps.count, 0);
    }
}
