//! Fixed-timestep accumulator
//!
//! Real frame time goes in, a whole number of simulation ticks comes out.
//! Frame deltas are clamped and the substep count is capped so a long stall
//! never spirals into an ever-growing backlog.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone)]
pub struct FixedStepper {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::with_step(SIM_DT, MAX_SUBSTEPS)
    }

    pub fn with_step(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Accumulate `frame_dt` seconds and run `tick` once per whole step
    ///
    /// Returns the number of ticks run.
    pub fn advance<F: FnMut(f32)>(&mut self, frame_dt: f32, mut tick: F) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            tick(self.step);
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }

    /// Fraction of a step left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    /// Drop any accumulated time (after a pause or reset)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
