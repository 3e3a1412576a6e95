// Player movement and the sprites standing in for the two leads.
use bevy::prelude::*;

use crate::assets::{Art, Sprites};
use crate::config::Profile;
use crate::director::{Beat, Director};
use crate::input::Held;
use crate::npc::follow;
use crate::sections::{Scene, Stage};
use crate::stage::{Placed, Staging};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(
                OnExit(Scene::Opening),
                spawn_leads,
            )
            .add_systems(Update, (sync_leads, hide_leads).in_set(Staging));
    }
}

#[derive(Component)]
pub struct Player;

#[derive(Component)]
pub struct Companion;

/// Moves the leader by a fixed delta per held arrow; diagonals add up.
pub fn walk(position: &mut Vec2, held: Held, speed: f32) {
    if held.up {
        position.y -= speed;
    }
    if held.down {
        position.y += speed;
    }
    if held.left {
        position.x -= speed;
    }
    if held.right {
        position.x += speed;
    }
}

/// Player walks, companion follows. Does nothing while movement is locked.
pub fn lead(stage: &mut Stage, held: Held, profile: &Profile) {
    if !stage.actionable {
        return;
    }
    walk(&mut stage.player, held, profile.walk_speed);
    follow(&mut stage.companion, stage.player, profile.follow);
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn spawn_leads(mut commands: Commands, sprites: Res<Sprites>, profile: Res<Profile>) {
    commands.spawn((
        Companion,
        sprites.sprite(Art::Molly),
        Placed::new(Vec2::ZERO, profile.sprite, 5.0),
    ));
    commands.spawn((
        Player,
        sprites.sprite(Art::Sam),
        Placed::new(Vec2::ZERO, profile.sprite, 6.0),
    ));
}

fn sync_leads(
    stage: Res<Stage>,
    mut player: Query<&mut Placed, (With<Player>, Without<Companion>)>,
    mut companion: Query<&mut Placed, (With<Companion>, Without<Player>)>,
) {
    if let Ok(mut placed) = player.single_mut() {
        placed.top_left = stage.player;
    }
    if let Ok(mut placed) = companion.single_mut() {
        placed.top_left = stage.companion;
    }
}

/// The leads step out of shot while the pints are on screen.
fn hide_leads(director: Res<Director>, mut leads: Query<&mut Visibility, Or<(With<Player>, With<Companion>)>>) {
    let wanted = match director.current() {
        Some(Beat::Drinking(_)) => Visibility::Hidden,
        _ => Visibility::Inherited,
    };
    for mut visibility in &mut leads {
        visibility.set_if_neq(wanted);
    }
}
