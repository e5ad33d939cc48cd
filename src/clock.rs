//! Frame counter for the 50 Hz loop, with periodic FPS logging.

use std::time::Instant;

use log::debug;

/// Log measured frame rate every 5 seconds of PAL frames.
const LOG_INTERVAL: u64 = 250;

pub struct FrameClock {
    frame: u64,
    interval_start: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame: 0,
            interval_start: Instant::now(),
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn tick(&mut self) {
        self.frame += 1;
        if self.frame % LOG_INTERVAL == 0 {
            let elapsed = self.interval_start.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                debug!(
                    "frame {}: {:.1} fps",
                    self.frame,
                    LOG_INTERVAL as f64 / elapsed
                );
            }
            self.interval_start = Instant::now();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_frame_count() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        for _ in 0..7 {
            clock.tick();
        }
        assert_eq!(clock.frame(), 7);
    }
}
