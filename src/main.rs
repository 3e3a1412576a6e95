// Main
mod animation;
mod assets;
mod bar;
mod beers;
mod birds;
mod cards;
mod config;
mod cycling;
mod dialogue;
mod director;
mod input;
mod living_room;
mod minigames;
mod npc;
mod opening;
mod particles;
mod player;
mod sections;
mod stage;
mod table;
mod transition;
mod walk_home;

use bevy::prelude::*;
use bevy::window::WindowResolution;

use animation::AnimationPlugin;
use assets::AssetsPlugin;
use bar::BarPlugin;
use beers::BeersPlugin;
use birds::BirdsPlugin;
use cards::CardsPlugin;
use config::Profile;
use cycling::CyclingPlugin;
use dialogue::DialoguePlugin;
use director::{Director, DirectorPlugin};
use input::InputPlugin;
use living_room::LivingRoomPlugin;
use minigames::MinigamesPlugin;
use opening::OpeningPlugin;
use player::PlayerPlugin;
use sections::{Scene, Stage};
use stage::StagePlugin;
use table::TablePlugin;
use transition::TransitionPlugin;
use walk_home::WalkHomePlugin;

fn main() {
    let profile = Profile::default();
    let scale = profile.window_scale;
    let window = Window {
        title: "First Date Adventure".to_string(),
        resolution: WindowResolution::new(
            (profile.screen.x * scale) as u32,
            (profile.screen.y * scale) as u32,
        )
        .with_scale_factor_override(scale),
        resizable: false,
        ..default()
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(profile.tick_hz))
        .insert_resource(ClearColor(Color::BLACK))
        .init_state::<Scene>()
        .insert_resource(Stage::new(&profile))
        .insert_resource(Director::new(dialogue::columns(&profile)))
        .insert_resource(profile)
        .add_plugins((
            InputPlugin,
            AnimationPlugin,
            AssetsPlugin,
            StagePlugin,
            PlayerPlugin,
            DirectorPlugin,
            DialoguePlugin,
            CardsPlugin,
            TransitionPlugin,
            BeersPlugin,
            MinigamesPlugin,
        ))
        .add_plugins((
            OpeningPlugin,
            CyclingPlugin,
            BarPlugin,
            TablePlugin,
            BirdsPlugin,
            WalkHomePlugin,
            LivingRoomPlugin,
        ))
        .run();
}
