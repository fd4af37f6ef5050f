//! Screen flow: menu, playing, result
//!
//! The shell owns at most one [`PlaySurface`]. Starting a run mounts a fresh
//! surface (dropping any previous one); an outcome unmounts it and switches
//! to the matching result screen.

use crate::highscores::HighScores;
use crate::platform::FrameScheduler;
use crate::renderer::Canvas;
use crate::settings::Settings;
use crate::sim::{Outcome, RunState};
use crate::surface::{OutcomeReport, PlaySurface};
use crate::tuning::Tuning;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    Won,
    Exploded,
    Crashed,
}

impl Screen {
    pub fn is_result(&self) -> bool {
        matches!(self, Screen::Won | Screen::Exploded | Screen::Crashed)
    }

    /// Value of the `data-screen` attribute on the game root
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Playing => "playing",
            Screen::Won => "won",
            Screen::Exploded => "exploded",
            Screen::Crashed => "crashed",
        }
    }
}

impl From<Outcome> for Screen {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won { .. } => Screen::Won,
            Outcome::Exploded => Screen::Exploded,
            Outcome::Crashed => Screen::Crashed,
        }
    }
}

/// Rank awarded for a winning score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Legendary,
    Epic,
    Rare,
    Common,
}

impl Rank {
    /// Highest threshold first
    pub fn for_score(score: f32) -> Self {
        if score > 9000.0 {
            Rank::Legendary
        } else if score > 7000.0 {
            Rank::Epic
        } else if score > 4000.0 {
            Rank::Rare
        } else {
            Rank::Common
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rank::Legendary => "Golden Bladder",
            Rank::Epic => "Iron Bladder",
            Rank::Rare => "Holding Master",
            Rank::Common => "Barely Held It",
        }
    }

    pub fn tier(&self) -> &'static str {
        match self {
            Rank::Legendary => "legendary",
            Rank::Epic => "epic",
            Rank::Rare => "rare",
            Rank::Common => "common",
        }
    }
}

/// Top-level game flow
#[derive(Debug)]
pub struct Shell<S: FrameScheduler + Clone> {
    screen: Screen,
    score: f32,
    surface: Option<PlaySurface<S>>,
    scheduler: S,
    tuning: Tuning,
    settings: Settings,
    highscores: HighScores,
    runs: u32,
    /// Leaderboard position of the last win, if it placed
    last_placement: Option<usize>,
    autopilot: bool,
}

impl<S: FrameScheduler + Clone> Shell<S> {
    pub fn new(tuning: Tuning, settings: Settings, scheduler: S) -> Self {
        Self {
            screen: Screen::Menu,
            score: 0.0,
            surface: None,
            scheduler,
            tuning,
            settings,
            highscores: HighScores::new(),
            runs: 0,
            last_placement: None,
            autopilot: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Raw score of the last finished run (0 unless it was won)
    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn display_score(&self) -> u32 {
        self.score.max(0.0).floor() as u32
    }

    /// Only a win earns a rank
    pub fn rank(&self) -> Option<Rank> {
        (self.screen == Screen::Won).then(|| Rank::for_score(self.score))
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn last_placement(&self) -> Option<usize> {
        self.last_placement
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn surface(&self) -> Option<&PlaySurface<S>> {
        self.surface.as_ref()
    }

    /// Live run state while playing
    pub fn run_state(&self) -> Option<&RunState> {
        self.surface.as_ref().map(|s| s.state())
    }

    /// Start (or restart) a run; ignored while one is in progress
    pub fn start(&mut self, seed: u64) -> bool {
        if self.screen == Screen::Playing {
            return false;
        }

        self.teardown();
        self.score = 0.0;
        self.last_placement = None;
        self.runs += 1;

        let mut surface = PlaySurface::mount(
            self.tuning.clone(),
            self.settings.clone(),
            seed,
            self.scheduler.clone(),
        );
        surface.set_autopilot(self.autopilot);
        self.surface = Some(surface);
        self.screen = Screen::Playing;

        log::info!("Run {} started", self.runs);
        true
    }

    /// Back to the menu from a result screen
    pub fn return_to_menu(&mut self) -> bool {
        if !self.screen.is_result() {
            return false;
        }
        self.screen = Screen::Menu;
        true
    }

    /// Pointer-down forwarded to the live run
    pub fn tap(&mut self, x: f32, width: f32) -> bool {
        match self.surface.as_mut() {
            Some(surface) if self.screen == Screen::Playing => surface.tap(x, width),
            _ => false,
        }
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Flip demo mode; applies to the live run and every later one
    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_autopilot(self.autopilot);
        }
        log::info!(
            "Autopilot {}",
            if self.autopilot { "enabled" } else { "disabled" }
        );
        self.autopilot
    }

    /// Drive one scheduled frame of the live run
    pub fn frame<C: Canvas>(&mut self, canvas: Option<&mut C>) -> Option<OutcomeReport> {
        let report = self.surface.as_mut()?.on_frame(canvas)?;
        self.handle_outcome(report);
        Some(report)
    }

    fn handle_outcome(&mut self, report: OutcomeReport) {
        if self.screen != Screen::Playing {
            return;
        }

        self.teardown();
        self.screen = Screen::from(report.outcome);

        if let Some(score) = report.outcome.score() {
            self.score = score;
            let shown = self.display_score();
            self.last_placement = self.highscores.add_score(shown, self.runs);
            log::info!(
                "Won with {} ({}), leaderboard place {:?}",
                shown,
                Rank::for_score(score).title(),
                self.last_placement
            );
        }
    }

    fn teardown(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualScheduler;
    use crate::renderer::ShapeBatch;
    use glam::Vec2;

    fn shell(scheduler: &ManualScheduler) -> Shell<ManualScheduler> {
        Shell::new(Tuning::default(), Settings::default(), scheduler.clone())
    }

    /// Run frames until the shell leaves the playing screen
    fn play_out(shell: &mut Shell<ManualScheduler>, scheduler: &ManualScheduler) -> OutcomeReport {
        let mut canvas = ShapeBatch::new(Vec2::new(400.0, 800.0));
        for _ in 0..5000 {
            scheduler.fire();
            if let Some(report) = shell.frame(Some(&mut canvas)) {
                return report;
            }
        }
        panic!("run never finished");
    }

    #[test]
    fn test_rank_thresholds() {
        assert_eq!(Rank::for_score(9500.0), Rank::Legendary);
        assert_eq!(Rank::for_score(9000.0), Rank::Epic);
        assert_eq!(Rank::for_score(8000.0), Rank::Epic);
        assert_eq!(Rank::for_score(7000.0), Rank::Rare);
        assert_eq!(Rank::for_score(4000.1), Rank::Rare);
        assert_eq!(Rank::for_score(4000.0), Rank::Common);
        assert_eq!(Rank::for_score(0.0), Rank::Common);
        assert_eq!(Rank::Epic.title(), "Iron Bladder");
    }

    #[test]
    fn test_starts_on_menu() {
        let scheduler = ManualScheduler::new();
        let shell = shell(&scheduler);
        assert_eq!(shell.screen(), Screen::Menu);
        assert!(shell.surface().is_none());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_start_mounts_surface() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        assert!(shell.start(1));
        assert_eq!(shell.screen(), Screen::Playing);
        assert_eq!(scheduler.pending(), 1);

        // Ignored while playing; no second loop
        assert!(!shell.start(2));
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(shell.runs(), 1);
    }

    #[test]
    fn test_menu_ignored_while_playing() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        assert!(!shell.return_to_menu());
        shell.start(1);
        assert!(!shell.return_to_menu());
        assert_eq!(shell.screen(), Screen::Playing);
    }

    #[test]
    fn test_outcome_tears_down_surface() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        shell.start(3);

        let report = play_out(&mut shell, &scheduler);
        assert_eq!(shell.screen(), Screen::from(report.outcome));
        assert!(shell.screen().is_result());
        assert!(shell.surface().is_none());
        assert_eq!(scheduler.pending(), 0);

        // Nothing else arrives once the surface is gone
        scheduler.fire();
        assert!(shell.frame(Some(&mut ShapeBatch::new(Vec2::new(400.0, 800.0)))).is_none());
    }

    #[test]
    fn test_restart_resets_run() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        shell.start(4);
        play_out(&mut shell, &scheduler);

        assert!(shell.start(5));
        let state = shell.run_state().cloned();
        let fresh = RunState::new(shell.tuning());
        let state = state.unwrap_or_else(|| panic!("no live run"));
        assert_eq!(state.distance, fresh.distance);
        assert_eq!(state.pressure, 0.0);
        assert_eq!(state.speed, fresh.speed);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(shell.score(), 0.0);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_return_to_menu_from_result() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        shell.start(6);
        play_out(&mut shell, &scheduler);

        assert!(shell.return_to_menu());
        assert_eq!(shell.screen(), Screen::Menu);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_win_records_score_and_rank() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        shell.start(7);

        shell.handle_outcome(OutcomeReport {
            outcome: Outcome::Won { score: 8000.7 },
            frames: 900,
        });
        assert_eq!(shell.screen(), Screen::Won);
        assert_eq!(shell.display_score(), 8000);
        assert_eq!(shell.rank(), Some(Rank::Epic));
        assert_eq!(shell.last_placement(), Some(1));
        assert_eq!(shell.highscores().top_score(), Some(8000));
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_loss_has_no_rank() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        shell.start(8);

        shell.handle_outcome(OutcomeReport {
            outcome: Outcome::Exploded,
            frames: 1250,
        });
        assert_eq!(shell.screen(), Screen::Exploded);
        assert_eq!(shell.rank(), None);
        assert_eq!(shell.display_score(), 0);
        assert!(shell.highscores().is_empty());

        // A second report for the same run changes nothing
        shell.handle_outcome(OutcomeReport {
            outcome: Outcome::Crashed,
            frames: 1251,
        });
        assert_eq!(shell.screen(), Screen::Exploded);
    }

    #[test]
    fn test_autopilot_carries_into_new_runs() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        assert!(shell.toggle_autopilot());
        shell.start(9);
        assert_eq!(shell.surface().map(|s| s.autopilot_enabled()), Some(true));
    }

    #[test]
    fn test_taps_ignored_outside_play() {
        let scheduler = ManualScheduler::new();
        let mut shell = shell(&scheduler);
        assert!(!shell.tap(10.0, 400.0));
        shell.start(10);
        assert!(shell.tap(10.0, 400.0));
    }
}
