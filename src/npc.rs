// Companion and NPC motion: a dead-zone follow and a straight-line approach.
use bevy::prelude::*;

use crate::config::FollowParams;

/// Steps the follower toward a point `distance` behind the leader.
///
/// Each axis is handled on its own: inside the dead zone the follower stays
/// put, outside it moves a fixed step toward the target.
pub fn follow(follower: &mut Vec2, leader: Vec2, params: FollowParams) {
    let target = Vec2::new(leader.x - params.distance, leader.y);
    follower.x = step_axis(follower.x, target.x, params);
    follower.y = step_axis(follower.y, target.y, params);
}

fn step_axis(current: f32, target: f32, params: FollowParams) -> f32 {
    if (current - target).abs() <= params.dead_zone {
        current
    } else if current < target {
        current + params.speed
    } else {
        current - params.speed
    }
}

/// Moves straight toward `target` at `speed` while farther than `stop`.
/// Returns true once inside the stop radius.
pub fn approach(position: &mut Vec2, target: Vec2, speed: f32, stop: f32) -> bool {
    let offset = target - *position;
    let distance = offset.length();
    if distance > stop {
        *position += offset / distance * speed;
        false
    } else {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: FollowParams = FollowParams {
        distance: 40.0,
        speed: 3.0,
        dead_zone: 5.0,
    };

    #[test]
    fn follower_holds_still_inside_dead_zone() {
        let leader = Vec2::new(200.0, 100.0);
        let mut follower = Vec2::new(163.0, 104.0);
        follow(&mut follower, leader, PARAMS);
        assert_eq!(follower, Vec2::new(163.0, 104.0));
    }

    #[test]
    fn follower_converges_after_leader_stops() {
        let mut leader = Vec2::new(100.0, 300.0);
        let mut follower = Vec2::new(-150.0, -80.0);
        for _ in 0..40 {
            leader.x += 5.0;
            follow(&mut follower, leader, PARAMS);
        }
        for _ in 0..500 {
            follow(&mut follower, leader, PARAMS);
        }
        let gap = leader - follower;
        assert!((gap.x - PARAMS.distance).abs() <= PARAMS.dead_zone);
        assert!(gap.y.abs() <= PARAMS.dead_zone);
    }

    #[test]
    fn approach_stops_inside_radius() {
        let mut position = Vec2::ZERO;
        let target = Vec2::new(0.0, 51.0);
        let mut arrived = false;
        for _ in 0..100 {
            arrived = approach(&mut position, target, 2.0, 10.0);
            if arrived {
                break;
            }
        }
        assert!(arrived);
        assert!(position.distance(target) <= 10.0);
        assert!(position.distance(target) > 8.0);
    }
}
