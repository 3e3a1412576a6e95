// Screen-space placement of sprites. Scripts think in top-left corners with y
// pointing down; this converts to the centred, y-up world of the 2D camera.
use bevy::prelude::*;

use crate::assets::{Art, Fonts, Sprites};
use crate::config::Profile;
use crate::sections::Scene;

pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, place_sprites.after(Staging));
    }
}

/// Systems that move [`Placed`] sprites run in this set, ahead of the
/// conversion to transforms.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Staging;

/// Top-left screen position and size of a sprite.
#[derive(Component, Debug, Clone, Copy)]
pub struct Placed {
    pub top_left: Vec2,
    pub size: Vec2,
    pub z: f32,
}

impl Placed {
    pub fn new(top_left: Vec2, size: Vec2, z: f32) -> Self {
        Self { top_left, size, z }
    }

    pub fn from_rect(rect: Rect, z: f32) -> Self {
        Self::new(rect.min, rect.size(), z)
    }
}

fn place_sprites(profile: Res<Profile>, mut query: Query<(&Placed, &mut Transform)>) {
    for (placed, mut transform) in &mut query {
        let centre = profile.to_world(placed.top_left, placed.size);
        transform.translation = centre.extend(placed.z);
    }
}

/// Spawns a scenery image occupying `rect` for the lifetime of `scene`.
pub fn spawn_prop(commands: &mut Commands, sprites: &Sprites, art: Art, rect: Rect, scene: Scene) -> Entity {
    let (mut sprite, fitted) = sprites.sprite(art);
    sprite.custom_size = Some(rect.size());
    commands
        .spawn((sprite, fitted, Placed::from_rect(rect, 1.0), DespawnOnExit(scene)))
        .id()
}

/// A "!" floating over someone's head. Hidden until a scene shows it.
#[derive(Component)]
pub struct Exclamation;

pub fn spawn_exclamation(
    commands: &mut Commands,
    fonts: &Fonts,
    profile: &Profile,
    scene: Scene,
    marker: impl Bundle,
) -> Entity {
    commands
        .spawn((
            Exclamation,
            marker,
            Text2d::new("!"),
            fonts.small(profile),
            TextColor(Color::WHITE),
            Placed::new(Vec2::ZERO, Vec2::new(profile.u(15.0), profile.font_small), 8.0),
            Visibility::Hidden,
            DespawnOnExit(scene),
        ))
        .id()
}

/// Shows or hides an exclamation mark at a screen position.
pub fn point_exclamation(placed: &mut Placed, visibility: &mut Visibility, at: Option<Vec2>) {
    match at {
        Some(top_left) => {
            placed.top_left = top_left;
            *visibility = Visibility::Inherited;
        }
        None => *visibility = Visibility::Hidden,
    }
}
