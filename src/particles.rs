// Beer bubbles and fireworks. Both are plain data stepped once per tick and
// drawn with gizmos every frame.
use bevy::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config::{FireworkParams, Profile};

/// Bubbles keep this far from the sides of the glass.
pub const BUBBLE_MARGIN: f32 = 3.0;
const BUBBLE_CHANCE: f64 = 0.2;
const BUBBLE_RISE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub position: Vec2,
    /// Horizontal motion per tick: -1, 0 or 1.
    pub drift: f32,
}

/// Advances the bubbles of one glass. `liquid` is the filled part of the
/// glass; bubbles spawn inside it and pop at its top edge.
pub fn step_bubbles(bubbles: &mut Vec<Bubble>, glass: Rect, liquid: Rect, margin: f32, rng: &mut impl Rng) {
    let (left, right) = (glass.min.x + margin, glass.max.x - margin);
    if rng.random_bool(BUBBLE_CHANCE) && left <= right {
        let bottom = (liquid.max.y - margin).max(liquid.min.y);
        bubbles.push(Bubble {
            position: Vec2::new(
                rng.random_range(left..=right),
                rng.random_range(liquid.min.y..=bottom),
            ),
            drift: [-1.0, 0.0, 1.0].choose(rng).copied().unwrap_or(0.0),
        });
    }
    for bubble in bubbles.iter_mut() {
        bubble.position.x = (bubble.position.x + bubble.drift).clamp(left, right.max(left));
        bubble.position.y -= BUBBLE_RISE;
    }
    bubbles.retain(|bubble| bubble.position.y > liquid.min.y);
}

const FIREWORK_COLORS: [Color; 4] = [
    Color::srgb(128.0 / 255.0, 0.0, 128.0 / 255.0),
    Color::srgb(0.0, 1.0, 0.0),
    Color::srgb(0.0, 0.0, 1.0),
    Color::WHITE,
];

#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    pub velocity: Vec2,
    pub lifetime: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Firework {
    pub position: Vec2,
    pub speed: f32,
    pub explosion_height: f32,
    pub color: Color,
    pub exploded: bool,
    pub sparks: Vec<Spark>,
}

impl Firework {
    pub fn launch(profile: &Profile, rng: &mut impl Rng) -> Self {
        let params = &profile.fireworks;
        let x_range = profile.u(100.0)..=(profile.width() - profile.u(100.0));
        let height_range = profile.u(100.0)..=(profile.height() / 2.0).max(profile.u(100.0));
        Self {
            position: Vec2::new(rng.random_range(x_range), profile.height()),
            speed: rng.random_range(params.ascent_speed.0..=params.ascent_speed.1),
            explosion_height: rng.random_range(height_range),
            color: FIREWORK_COLORS.choose(rng).copied().unwrap_or(Color::WHITE),
            exploded: false,
            sparks: Vec::new(),
        }
    }

    /// One tick of motion. Returns false once the firework has burst and
    /// every spark has burned out.
    pub fn step(&mut self, params: &FireworkParams, rng: &mut impl Rng) -> bool {
        if !self.exploded {
            self.position.y -= self.speed;
            if self.position.y <= self.explosion_height {
                self.exploded = true;
                self.sparks = (0..params.particles)
                    .map(|_| Spark {
                        position: self.position,
                        velocity: Vec2::new(
                            rng.random_range(-params.burst_speed..=params.burst_speed),
                            rng.random_range(-params.burst_speed..=params.burst_speed),
                        ),
                        lifetime: rng.random_range(params.lifetime.0..=params.lifetime.1),
                    })
                    .collect();
            }
            return true;
        }
        for spark in &mut self.sparks {
            spark.position += spark.velocity;
            spark.lifetime = spark.lifetime.saturating_sub(1);
        }
        self.sparks.retain(|spark| spark.lifetime > 0);
        !self.sparks.is_empty()
    }
}

/// A timed fireworks display.
#[derive(Debug, Clone, PartialEq)]
pub struct FireworksShow {
    pub fireworks: Vec<Firework>,
    pub ticks_left: u32,
}

impl FireworksShow {
    pub fn new(ticks: u32) -> Self {
        Self {
            fireworks: Vec::new(),
            ticks_left: ticks,
        }
    }

    /// Returns true when the show is over.
    pub fn step(&mut self, profile: &Profile, rng: &mut impl Rng) -> bool {
        if self.ticks_left == 0 {
            return true;
        }
        self.ticks_left -= 1;
        if rng.random_bool(profile.fireworks.spawn_chance) {
            self.fireworks.push(Firework::launch(profile, rng));
        }
        self.fireworks
            .retain_mut(|firework| firework.step(&profile.fireworks, rng));
        self.ticks_left == 0
    }

    pub fn draw(&self, gizmos: &mut Gizmos, profile: &Profile) {
        let params = &profile.fireworks;
        for firework in &self.fireworks {
            if !firework.exploded {
                gizmos.circle_2d(
                    profile.point_to_world(firework.position),
                    params.rocket_radius,
                    firework.color,
                );
            }
            for spark in &firework.sparks {
                gizmos.circle_2d(
                    profile.point_to_world(spark.position),
                    params.spark_radius,
                    firework.color,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bubbles_stay_in_the_glass_and_pop_at_the_top() {
        let mut rng = StdRng::seed_from_u64(7);
        let glass = Rect::new(100.0, 100.0, 120.0, 150.0);
        let liquid = Rect::new(102.0, 117.0, 118.0, 150.0);
        let mut bubbles = Vec::new();
        for _ in 0..200 {
            step_bubbles(&mut bubbles, glass, liquid, BUBBLE_MARGIN, &mut rng);
            for bubble in &bubbles {
                assert!(bubble.position.x >= 103.0 && bubble.position.x <= 117.0);
                assert!(bubble.position.y > liquid.min.y);
            }
        }
    }

    #[test]
    fn sparks_burn_out_and_take_the_firework_with_them() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = Profile::desktop().fireworks;
        let mut firework = Firework {
            position: Vec2::new(400.0, 600.0),
            speed: 20.0,
            explosion_height: 590.0,
            color: Color::WHITE,
            exploded: false,
            sparks: Vec::new(),
        };
        assert!(firework.step(&params, &mut rng));
        assert!(firework.exploded);
        assert_eq!(firework.sparks.len(), params.particles);
        assert!(firework.sparks.iter().all(|spark| spark.position == Vec2::new(400.0, 580.0)));

        let longest = firework.sparks.iter().map(|spark| spark.lifetime).max().unwrap();
        for tick in 1..=longest {
            let alive = firework.step(&params, &mut rng);
            assert_eq!(alive, !firework.sparks.is_empty());
            assert!(firework.sparks.iter().all(|spark| spark.lifetime > 0));
            if tick < params.lifetime.0 {
                assert!(alive);
            }
        }
        assert!(firework.sparks.is_empty());
    }

    #[test]
    fn show_ends_on_time_and_keeps_only_live_fireworks() {
        let profile = Profile::desktop();
        let mut rng = StdRng::seed_from_u64(11);
        let mut show = FireworksShow::new(profile.fireworks.show_ticks);
        let mut ticks = 0;
        while !show.step(&profile, &mut rng) {
            ticks += 1;
            for firework in &show.fireworks {
                assert!(!firework.exploded || !firework.sparks.is_empty());
            }
        }
        assert_eq!(ticks + 1, profile.fireworks.show_ticks);
        assert!(show.step(&profile, &mut rng));
    }
}
