//! Hit testing against obstacles and the goal
//!
//! The skier is a point; obstacles are circles of `Tuning::hit_distance`.
//! The toilet is a band across the track with an opening at the center.

use glam::Vec2;

use super::state::{Obstacle, RunState};
use crate::tuning::Tuning;

/// First obstacle the player overlaps, if any
pub fn find_obstacle_hit<'a>(
    obstacles: &'a [Obstacle],
    player: Vec2,
    hit_distance: f32,
) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obs| obs.pos.distance(player) < hit_distance)
}

/// Result of evaluating the skier against the toilet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GoalVerdict {
    /// Not level with the toilet
    OutsideBand,
    /// Level with the toilet but off to the side; keep skiing
    Missed,
    /// On target but too fast
    TooFast,
    /// On target at a safe speed
    Landed,
    /// Slid past the toilet
    Overshot,
}

/// Evaluate the goal and overshoot checks for the current frame
pub fn evaluate_goal(state: &RunState, tuning: &Tuning) -> GoalVerdict {
    let to_goal = state.distance_to_goal(tuning);

    if to_goal < tuning.goal_band && to_goal > -tuning.goal_band {
        let off_center = (state.lateral - tuning.track_center()).abs();
        if off_center < tuning.goal_half_width {
            return if state.speed > tuning.safe_arrival_speed() {
                GoalVerdict::TooFast
            } else {
                GoalVerdict::Landed
            };
        }
        return GoalVerdict::Missed;
    }

    if -to_goal > tuning.overshoot_margin {
        GoalVerdict::Overshot
    } else {
        GoalVerdict::OutsideBand
    }
}
