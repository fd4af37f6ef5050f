//! Projects a run onto a [`Canvas`]
//!
//! World y maps to screen y by subtracting the distance traveled; the skier
//! always sits on the `player_screen_y` row.

use glam::Vec2;

use super::canvas::{Canvas, Color};
use super::vertex::colors;
use crate::consts::SPEED_LINE_THRESHOLD;
use crate::settings::Settings;
use crate::sim::{ObstacleKind, ParticleColor, RandomSource, RunState};
use crate::tuning::Tuning;

/// Track edges sit this far in from each side
const TRACK_EDGE_INSET: f32 = 50.0;
/// Period of the dashed track edges
const TRACK_SCROLL_PERIOD: f32 = 400.0;
/// Spacing of the roadside trees
const DECOR_SPACING: f32 = 300.0;
/// Things this far outside the surface are skipped
const OFFSCREEN_SLACK: f32 = 100.0;
const SPEED_LINE_COUNT: usize = 8;

/// Draw one frame
///
/// `cosmetic_rng` only places speed lines; it must not be the simulation's
/// random source.
pub fn draw_scene(
    canvas: &mut impl Canvas,
    state: &RunState,
    tuning: &Tuning,
    settings: &Settings,
    cosmetic_rng: &mut impl RandomSource,
) {
    let size = canvas.size();

    canvas.clear(colors::SNOW);
    canvas.fill_rect(Vec2::ZERO, size, colors::SNOW);

    draw_track(canvas, state.distance, size);
    draw_obstacles(canvas, state, size);
    draw_goal(canvas, state, tuning, size);
    draw_particles(canvas, state, settings.max_particles());
    draw_player(canvas, state.player_screen_pos(tuning));

    if settings.effective_speed_lines() && state.speed > SPEED_LINE_THRESHOLD {
        for _ in 0..SPEED_LINE_COUNT {
            let x = cosmetic_rng.next_unit() * size.x;
            let y = cosmetic_rng.next_unit() * size.y;
            canvas.stroke_line(
                Vec2::new(x, y),
                Vec2::new(x, y - state.speed * 3.0),
                1.0,
                colors::SPEED_LINE,
            );
        }
    }
}

fn draw_track(canvas: &mut impl Canvas, distance: f32, size: Vec2) {
    let scroll = distance % TRACK_SCROLL_PERIOD;
    for x in [TRACK_EDGE_INSET, size.x - TRACK_EDGE_INSET] {
        canvas.stroke_dashed_line(
            Vec2::new(x, -scroll),
            Vec2::new(x, size.y + TRACK_SCROLL_PERIOD),
            4.0,
            20.0,
            20.0,
            colors::TRACK_EDGE,
        );
    }

    // Roadside trees, staggered between the two sides
    let offset = distance % DECOR_SPACING;
    for i in -1..8 {
        let y = i as f32 * DECOR_SPACING - offset;
        canvas.fill_triangle(
            Vec2::new(25.0, y + 50.0),
            Vec2::new(5.0, y + 100.0),
            Vec2::new(45.0, y + 100.0),
            colors::TREE,
        );
        canvas.fill_triangle(
            Vec2::new(size.x - 25.0, y + 150.0),
            Vec2::new(size.x - 45.0, y + 200.0),
            Vec2::new(size.x - 5.0, y + 200.0),
            colors::TREE,
        );
    }
}

fn on_screen(screen_y: f32, height: f32) -> bool {
    screen_y > -OFFSCREEN_SLACK && screen_y < height + OFFSCREEN_SLACK
}

fn draw_obstacles(canvas: &mut impl Canvas, state: &RunState, size: Vec2) {
    for obs in &state.obstacles {
        let x = obs.pos.x;
        let y = obs.pos.y - state.distance;
        if !on_screen(y, size.y) {
            continue;
        }
        match obs.kind {
            ObstacleKind::Tree => {
                canvas.fill_triangle(
                    Vec2::new(x, y - 25.0),
                    Vec2::new(x - 15.0, y + 10.0),
                    Vec2::new(x + 15.0, y + 10.0),
                    colors::TREE,
                );
                canvas.fill_rect(
                    Vec2::new(x - 3.0, y + 10.0),
                    Vec2::new(6.0, 8.0),
                    colors::TRUNK,
                );
            }
            ObstacleKind::Rock => {
                canvas.fill_circle(Vec2::new(x, y), 12.0, colors::ROCK);
            }
        }
    }
}

fn draw_goal(canvas: &mut impl Canvas, state: &RunState, tuning: &Tuning, size: Vec2) {
    let y = tuning.goal_position() - state.distance;
    if !on_screen(y, size.y) {
        return;
    }
    let cx = size.x / 2.0;
    canvas.fill_rect(Vec2::new(cx - 40.0, y - 40.0), Vec2::new(80.0, 80.0), colors::TOILET);
    canvas.fill_rect(
        Vec2::new(cx - 30.0, y - 30.0),
        Vec2::new(60.0, 20.0),
        colors::TOILET_SEAT,
    );
    canvas.fill_text("WC", Vec2::new(cx, y - 15.0), 12.0, colors::LABEL);
}

fn particle_color(color: ParticleColor) -> Color {
    match color {
        ParticleColor::Snow => colors::SNOW,
        ParticleColor::Blood => colors::BLOOD,
        ParticleColor::Explosion => colors::EXPLOSION,
    }
}

fn draw_particles(canvas: &mut impl Canvas, state: &RunState, max_particles: usize) {
    for particle in state.particles.iter().take(max_particles) {
        let radius = match particle.color {
            ParticleColor::Snow => 3.0 + particle.life * 5.0,
            _ => 4.0,
        };
        canvas.set_alpha(particle.life);
        canvas.fill_circle(particle.pos, radius, particle_color(particle.color));
    }
    canvas.set_alpha(1.0);
}

fn draw_player(canvas: &mut impl Canvas, pos: Vec2) {
    // Skis
    for dx in [-10.0, 10.0] {
        canvas.stroke_line(
            Vec2::new(pos.x + dx, pos.y - 10.0),
            Vec2::new(pos.x + dx, pos.y + 30.0),
            3.0,
            colors::SKIS,
        );
    }
    canvas.fill_circle(pos, 12.0, colors::PLAYER);
    canvas.fill_circle(Vec2::new(pos.x, pos.y - 5.0), 6.0, colors::PLAYER_HEAD);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, SequenceRandom};

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Clear,
        Alpha(f32),
        Rect(Color),
        Triangle(Color),
        Circle(Vec2, f32, Color),
        Line(Color),
        Dashed,
        Text(String, Vec2),
    }

    struct Recorder {
        size: Vec2,
        cmds: Vec<Cmd>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                size: Vec2::new(400.0, 800.0),
                cmds: Vec::new(),
            }
        }

        fn count(&self, pred: impl Fn(&Cmd) -> bool) -> usize {
            self.cmds.iter().filter(|c| pred(c)).count()
        }
    }

    impl Canvas for Recorder {
        fn size(&self) -> Vec2 {
            self.size
        }
        fn clear(&mut self, _color: Color) {
            self.cmds.push(Cmd::Clear);
        }
        fn set_alpha(&mut self, alpha: f32) {
            self.cmds.push(Cmd::Alpha(alpha));
        }
        fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, color: Color) {
            self.cmds.push(Cmd::Rect(color));
        }
        fn fill_triangle(&mut self, _a: Vec2, _b: Vec2, _c: Vec2, color: Color) {
            self.cmds.push(Cmd::Triangle(color));
        }
        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
            self.cmds.push(Cmd::Circle(center, radius, color));
        }
        fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, color: Color) {
            self.cmds.push(Cmd::Line(color));
        }
        fn stroke_dashed_line(
            &mut self,
            _from: Vec2,
            _to: Vec2,
            _width: f32,
            _dash: f32,
            _gap: f32,
            _color: Color,
        ) {
            self.cmds.push(Cmd::Dashed);
        }
        fn fill_text(&mut self, text: &str, center: Vec2, _size: f32, _color: Color) {
            self.cmds.push(Cmd::Text(text.to_string(), center));
        }
    }

    fn render(state: &RunState, settings: &Settings) -> Recorder {
        let mut canvas = Recorder::new();
        let mut rng = SequenceRandom::new([0.25, 0.5]);
        draw_scene(&mut canvas, state, &Tuning::default(), settings, &mut rng);
        canvas
    }

    #[test]
    fn test_frame_starts_with_clear_and_track() {
        let tuning = Tuning::default();
        let canvas = render(&RunState::new(&tuning), &Settings::default());
        assert_eq!(canvas.cmds[0], Cmd::Clear);
        assert_eq!(canvas.count(|c| *c == Cmd::Dashed), 2);
        // 9 rows of roadside trees, two per row
        assert_eq!(canvas.count(|c| *c == Cmd::Triangle(colors::TREE)), 18);
    }

    #[test]
    fn test_player_drawn_at_lateral_position() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        state.lateral = 150.0;
        let canvas = render(&state, &Settings::default());
        assert!(
            canvas
                .cmds
                .contains(&Cmd::Circle(Vec2::new(150.0, 200.0), 12.0, colors::PLAYER))
        );
    }

    #[test]
    fn test_offscreen_obstacles_skipped() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        state.distance = 1000.0;
        for y in [1500.0, 3000.0] {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                pos: Vec2::new(100.0, y),
                kind: ObstacleKind::Rock,
            });
        }
        let canvas = render(&state, &Settings::default());
        let rocks = canvas.count(|c| matches!(c, Cmd::Circle(_, _, color) if *color == colors::ROCK));
        assert_eq!(rocks, 1);
    }

    #[test]
    fn test_goal_label_only_when_near() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        let far = render(&state, &Settings::default());
        assert_eq!(far.count(|c| matches!(c, Cmd::Text(..))), 0);

        state.distance = tuning.goal_position() - 300.0;
        let near = render(&state, &Settings::default());
        assert!(near.cmds.contains(&Cmd::Text("WC".into(), Vec2::new(200.0, 285.0))));
    }

    #[test]
    fn test_speed_lines_above_threshold() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);

        state.speed = 20.0;
        let slow = render(&state, &Settings::default());
        assert_eq!(slow.count(|c| *c == Cmd::Line(colors::SPEED_LINE)), 0);

        state.speed = 30.0;
        let fast = render(&state, &Settings::default());
        assert_eq!(fast.count(|c| *c == Cmd::Line(colors::SPEED_LINE)), 8);

        let calm = render(&state, &Settings::from_query("reduced_motion=1"));
        assert_eq!(calm.count(|c| *c == Cmd::Line(colors::SPEED_LINE)), 0);
    }

    #[test]
    fn test_particles_fade_and_respect_cap() {
        let tuning = Tuning::default();
        let mut state = RunState::new(&tuning);
        let mut rng = SequenceRandom::constant(0.5);
        state.emit_burst(&mut rng, Vec2::new(10.0, 10.0), ParticleColor::Snow, 3, 4.0);
        state.particles[0].life = 0.5;

        let canvas = render(&state, &Settings::default());
        assert!(canvas.cmds.contains(&Cmd::Alpha(0.5)));
        assert!(canvas.cmds.contains(&Cmd::Circle(Vec2::new(10.0, 10.0), 5.5, colors::SNOW)));
        assert_eq!(canvas.cmds.iter().rev().find(|c| matches!(c, Cmd::Alpha(_))), Some(&Cmd::Alpha(1.0)));

        let none = render(&state, &Settings::from_query("particles=0"));
        assert_eq!(none.count(|c| matches!(c, Cmd::Alpha(a) if *a < 1.0)), 0);
    }
}
