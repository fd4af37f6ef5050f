//! The play surface: one run's frame loop
//!
//! Mounting a surface starts its frame loop; each frame updates the run and
//! then draws it. The terminal outcome is handed back exactly once. Dropping
//! the surface cancels the pending frame request.

use rand_pcg::Pcg32;

use crate::platform::{FrameLoop, FrameScheduler};
use crate::renderer::{Canvas, draw_scene};
use crate::settings::Settings;
use crate::sim::{Autopilot, Outcome, RunState, TapSide, apply_tap, seeded, tick};
use crate::tuning::Tuning;

/// Mixed into the run seed so speed lines never share the gameplay stream
const COSMETIC_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Terminal result of a run, handed to the shell once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeReport {
    pub outcome: Outcome,
    /// Frames simulated before the outcome
    pub frames: u64,
}

/// One mounted run
#[derive(Debug)]
pub struct PlaySurface<S: FrameScheduler> {
    state: RunState,
    tuning: Tuning,
    settings: Settings,
    rng: Pcg32,
    cosmetic_rng: Pcg32,
    frame_loop: FrameLoop<S>,
    autopilot: Option<Autopilot>,
    reported: bool,
}

impl<S: FrameScheduler> PlaySurface<S> {
    /// Create a fresh run and start its frame loop
    pub fn mount(tuning: Tuning, settings: Settings, seed: u64, scheduler: S) -> Self {
        let mut frame_loop = FrameLoop::new(scheduler);
        frame_loop.start();
        log::info!("Run mounted with seed {}", seed);

        Self {
            state: RunState::new(&tuning),
            tuning,
            settings,
            rng: seeded(seed),
            cosmetic_rng: seeded(seed ^ COSMETIC_SEED_SALT),
            frame_loop,
            autopilot: None,
            reported: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Whether a frame request is outstanding
    pub fn is_looping(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn frames_run(&self) -> u64 {
        self.frame_loop.frames_run()
    }

    /// Pointer-down at `x` on a surface `width` wide
    pub fn tap(&mut self, x: f32, width: f32) -> bool {
        let side = TapSide::from_pointer(x, width);
        apply_tap(&mut self.state, side, &self.tuning, &mut self.rng)
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled.then(Autopilot::new);
    }

    pub fn autopilot_enabled(&self) -> bool {
        self.autopilot.is_some()
    }

    /// Run one scheduled frame: update, render, request the next frame
    ///
    /// Without a canvas the frame is skipped but the loop keeps going.
    /// Returns the report on the frame the outcome is reached.
    pub fn on_frame<C: Canvas>(&mut self, canvas: Option<&mut C>) -> Option<OutcomeReport> {
        if !self.frame_loop.begin_frame() {
            return None;
        }

        let report = match canvas {
            Some(canvas) => {
                let report = self.update();
                draw_scene(
                    canvas,
                    &self.state,
                    &self.tuning,
                    &self.settings,
                    &mut self.cosmetic_rng,
                );
                report
            }
            None => {
                log::trace!("No drawing surface yet, skipping frame");
                None
            }
        };

        self.frame_loop.end_frame();
        report
    }

    /// Stop the frame loop
    pub fn unmount(&mut self) {
        self.frame_loop.cancel();
    }

    fn update(&mut self) -> Option<OutcomeReport> {
        if let Some(pilot) = self.autopilot.as_mut() {
            if let Some(side) = pilot.decide(&self.state, &self.tuning) {
                apply_tap(&mut self.state, side, &self.tuning, &mut self.rng);
            }
        }

        let outcome = tick(&mut self.state, &self.tuning, &mut self.rng)?;
        if self.reported {
            return None;
        }
        self.reported = true;
        log::info!(
            "Run finished after {} frames: {:?}",
            self.state.frames,
            outcome
        );
        Some(OutcomeReport {
            outcome,
            frames: self.state.frames,
        })
    }
}
