// Game scenes and the state shared between them.
use bevy::prelude::*;
use strum::{Display, EnumIter};

use crate::beers::Beers;
use crate::config::Profile;

/// The linear narrative, in play order.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, EnumIter, Display)]
pub enum Scene {
    #[default]
    Opening,
    Cycling,
    Bar,
    Table,
    Birds,
    WalkHome,
    LivingRoom,
}

impl Scene {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Only 0..=6 exist; anything past the living room is unwritten.
    pub fn from_index(index: usize) -> Option<Self> {
        use self::Scene::*;
        [Opening, Cycling, Bar, Table, Birds, WalkHome, LivingRoom]
            .get(index)
            .copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }
}

/// Actors and props that persist across scenes.
///
/// Positions are screen coordinates of the sprite's top-left corner with y
/// pointing down, the way the scripts describe them.
#[derive(Resource, Debug, Clone)]
pub struct Stage {
    pub player: Vec2,
    pub companion: Vec2,
    /// Whether movement input is accepted.
    pub actionable: bool,
    pub beers: Beers,
}

impl Stage {
    pub fn new(profile: &Profile) -> Self {
        Self {
            player: Vec2::new(profile.u(100.0), profile.height() / 2.0 - profile.u(25.0)),
            companion: Vec2::new(
                profile.width() / 4.0 - profile.sprite.x / 2.0,
                -profile.sprite.y,
            ),
            actionable: false,
            beers: Beers::default(),
        }
    }

    pub fn player_rect(&self, profile: &Profile) -> Rect {
        Rect::from_corners(self.player, self.player + profile.sprite)
    }

    pub fn companion_rect(&self, profile: &Profile) -> Rect {
        Rect::from_corners(self.companion, self.companion + profile.sprite)
    }

    /// Whether the companion has caught up with the player.
    pub fn companion_near(&self, profile: &Profile) -> bool {
        self.companion.distance(self.player) < profile.u(50.0)
    }
}

/// Strict overlap test; touching edges do not collide.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    !a.intersect(b).is_empty()
}

/// Rectangle of `size` whose top edge is centred on `point`.
pub fn mid_top(point: Vec2, size: Vec2) -> Rect {
    Rect::from_corners(
        Vec2::new(point.x - size.x / 2.0, point.y),
        Vec2::new(point.x + size.x / 2.0, point.y + size.y),
    )
}

/// Rectangle of `size` whose right edge is centred on `point`.
pub fn mid_right(point: Vec2, size: Vec2) -> Rect {
    Rect::from_corners(
        Vec2::new(point.x - size.x, point.y - size.y / 2.0),
        Vec2::new(point.x, point.y + size.y / 2.0),
    )
}

/// Rectangle of `size` whose left edge is centred on `point`.
pub fn mid_left(point: Vec2, size: Vec2) -> Rect {
    Rect::from_corners(
        Vec2::new(point.x, point.y - size.y / 2.0),
        Vec2::new(point.x + size.x, point.y + size.y / 2.0),
    )
}
