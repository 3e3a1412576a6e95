// The three minigames. Each is a beat with its own win condition.
pub mod drinking;
pub mod heart;
pub mod stagger;

use bevy::prelude::*;

use crate::director::refresh_views;

pub struct MinigamesPlugin;

impl Plugin for MinigamesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (drinking::update_drinking_view, heart::update_heart_view).after(refresh_views),
        );
    }
}
