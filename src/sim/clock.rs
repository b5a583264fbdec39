//! Fixed-timestep frame clock
//!
//! Converts wall-clock callbacks into a whole number of SIM_DT substeps,
//! capped so a long stall cannot snowball into a spiral of death.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest wall-clock delta we are willing to simulate in one frame
const MAX_FRAME_DELTA: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a wall-clock timestamp (seconds); returns how many fixed
    /// substeps the caller should tick.
    pub fn advance(&mut self, now_secs: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((now_secs - last) as f32).clamp(0.0, MAX_FRAME_DELTA),
            None => SIM_DT,
        };
        self.last_time = Some(now_secs);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the remainder if we hit the cap; better to slow down than
        // to accumulate an unpayable debt.
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Forget elapsed time (after pause/resume so the gap is not simulated)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_one_step() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.0), 1);
    }

    #[test]
    fn test_steady_sixty_hz() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let mut total = 0;
        for i in 1..=60 {
            total += clock.advance(i as f64 / 60.0);
        }
        // One tick per frame, within rounding slack
        assert!((58..=62).contains(&total), "total={total}");
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let steps = clock.advance(10.0);
        assert_eq!(steps, MAX_SUBSTEPS);
        // Debt is discarded, not carried
        assert_eq!(clock.advance(10.0 + SIM_DT as f64 / 2.0), 0);
    }

    #[test]
    fn test_reset_forgets_gap() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.reset();
        assert_eq!(clock.advance(100.0), 1);
    }
}
