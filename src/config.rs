// Display profiles. The desktop and handheld builds share every script and
// differ only in the numbers below.
use bevy::prelude::*;

/// Screen geometry and tunables for one build of the game.
///
/// Layout code is written in desktop pixels and multiplied by [`Profile::unit`],
/// so the same scene scripts place things sensibly on the 128x128 handheld
/// panel.
#[derive(Resource, Debug, Clone)]
pub struct Profile {
    pub name: &'static str,
    /// Logical screen size in pixels.
    pub screen: Vec2,
    /// Multiplier applied to desktop layout offsets.
    pub unit: f32,
    /// Window scale factor; the handheld screen is tiny on a desktop monitor.
    pub window_scale: f32,
    /// Fixed logic rate.
    pub tick_hz: f64,
    /// Size of every character sprite.
    pub sprite: Vec2,
    pub walk_speed: f32,
    pub follow: FollowParams,
    pub stagger: StaggerParams,
    pub heart: HeartParams,
    pub fireworks: FireworkParams,
    pub bubble_radius: f32,
    pub font_large: f32,
    pub font_small: f32,
}

/// Dead-zone follow tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowParams {
    /// Horizontal offset the follower keeps behind the leader.
    pub distance: f32,
    pub speed: f32,
    /// Per-axis error below which the follower stands still.
    pub dead_zone: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerParams {
    pub speed: f32,
    pub sway_magnitude: f32,
    /// Ticks between sway direction flips.
    pub sway_period: u32,
    /// The companion stops approaching inside this radius.
    pub keep_distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartParams {
    pub size: Vec2,
    pub speed: f32,
    pub window: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireworkParams {
    /// Launch probability per tick.
    pub spawn_chance: f64,
    pub ascent_speed: (f32, f32),
    pub particles: usize,
    /// Maximum particle speed per axis.
    pub burst_speed: f32,
    /// Inclusive particle lifetime range in ticks.
    pub lifetime: (u32, u32),
    pub rocket_radius: f32,
    pub spark_radius: f32,
    /// How long the finale show runs, in ticks.
    pub show_ticks: u32,
}

impl Profile {
    pub fn desktop() -> Self {
        let sprite_scaler = 1.1;
        Self {
            name: "desktop",
            screen: Vec2::new(800.0, 600.0),
            unit: 1.0,
            window_scale: 1.0,
            tick_hz: 30.0,
            sprite: Vec2::new(50.0, 70.0) * sprite_scaler,
            walk_speed: 5.0,
            follow: FollowParams {
                distance: 40.0,
                speed: 3.0,
                dead_zone: 5.0,
            },
            stagger: StaggerParams {
                speed: 2.5,
                sway_magnitude: 0.5,
                sway_period: 100,
                keep_distance: 40.0,
            },
            heart: HeartParams {
                size: Vec2::splat(80.0),
                speed: 13.0,
                window: 100.0,
            },
            fireworks: FireworkParams {
                spawn_chance: 0.35,
                ascent_speed: (10.0 * sprite_scaler, 15.0 * sprite_scaler),
                particles: 60,
                burst_speed: 8.0,
                lifetime: (20, 40),
                rocket_radius: 4.0,
                spark_radius: 3.0,
                show_ticks: 150,
            },
            bubble_radius: 2.0,
            font_large: 50.0,
            font_small: 25.0,
        }
    }

    pub fn handheld() -> Self {
        let s = 0.28;
        Self {
            name: "handheld",
            screen: Vec2::new(128.0, 128.0),
            unit: s,
            window_scale: 4.0,
            tick_hz: 30.0,
            sprite: Vec2::new(50.0, 70.0) * s,
            walk_speed: 5.0 * s,
            follow: FollowParams {
                distance: 40.0 * s,
                speed: 3.0 * s,
                dead_zone: 5.0 * s,
            },
            stagger: StaggerParams {
                speed: 2.5 * s,
                sway_magnitude: 0.5 * s,
                sway_period: 100,
                keep_distance: 40.0 * s,
            },
            heart: HeartParams {
                size: Vec2::new(100.0, 75.0) * s,
                speed: (15.0 * s).floor(),
                window: (120.0 * s).floor(),
            },
            fireworks: FireworkParams {
                spawn_chance: 0.05,
                ascent_speed: (4.0 * s * 3.0, 6.0 * s * 3.0),
                particles: 30,
                burst_speed: 7.0 * s,
                lifetime: (10, 30),
                rocket_radius: 6.0 * s,
                spark_radius: 4.0 * s,
                show_ticks: 150,
            },
            bubble_radius: 1.0,
            font_large: (35.0 * s).floor(),
            font_small: (30.0 * s).floor(),
        }
    }

    /// Scales a desktop layout length.
    pub fn u(&self, desktop_px: f32) -> f32 {
        desktop_px * self.unit
    }

    pub fn width(&self) -> f32 {
        self.screen.x
    }

    pub fn height(&self) -> f32 {
        self.screen.y
    }

    /// Maps a top-left screen point of a box of `size` to the world-space
    /// centre used by the 2D camera.
    pub fn to_world(&self, top_left: Vec2, size: Vec2) -> Vec2 {
        let centre = top_left + size / 2.0;
        Vec2::new(centre.x - self.screen.x / 2.0, self.screen.y / 2.0 - centre.y)
    }

    /// Maps a screen point (y down) to world space (y up).
    pub fn point_to_world(&self, point: Vec2) -> Vec2 {
        self.to_world(point, Vec2::ZERO)
    }
}

impl Default for Profile {
    fn default() -> Self {
        if cfg!(feature = "handheld") {
            Self::handheld()
        } else {
            Self::desktop()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_mapping_centres_the_screen() {
        let profile = Profile::desktop();
        assert_eq!(profile.point_to_world(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        assert_eq!(
            profile.to_world(Vec2::ZERO, Vec2::new(10.0, 20.0)),
            Vec2::new(-395.0, 290.0)
        );
    }

    #[test]
    fn handheld_scales_layout() {
        let profile = Profile::handheld();
        assert!((profile.u(100.0) - 28.0).abs() < 1e-4);
        assert_eq!(profile.heart.speed, 4.0);
        assert_eq!(profile.heart.window, 33.0);
    }

    #[test]
    fn default_profile_follows_the_build_feature() {
        let expected = if cfg!(feature = "handheld") { "handheld" } else { "desktop" };
        assert_eq!(Profile::default().name, expected);
        assert_eq!(Profile::handheld().name, "handheld");
    }
}
