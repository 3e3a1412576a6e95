// Scene 5: the stagger home from the pub.

use bevy::prelude::*;

use crate::assets::{Art, Sprites};
use crate::config::Profile;
use crate::director::{Beat, Directing, Director, director_idle};
use crate::minigames::stagger::{self, StaggerGame};
use crate::sections::{Scene, Stage, mid_left, mid_right};
use crate::stage::spawn_prop;

pub struct WalkHomePlugin;

impl Plugin for WalkHomePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::WalkHome), setup_walk_home)
            .add_systems(
                FixedUpdate,
                run_walk_home
                    .after(Directing)
                    .run_if(in_state(Scene::WalkHome).and(director_idle)),
            );
    }
}

#[derive(Resource, Debug)]
pub struct WalkHomeState {
    pub pub_rect: Rect,
    pub house: Rect,
    started: bool,
}

impl WalkHomeState {
    pub fn new(profile: &Profile) -> Self {
        Self {
            pub_rect: mid_right(
                Vec2::new(profile.width() - profile.u(40.0), profile.height() / 2.0),
                Vec2::splat(profile.u(150.0)),
            ),
            house: mid_left(
                Vec2::new(profile.u(40.0), profile.height() / 5.0),
                Vec2::new(profile.u(200.0), profile.u(150.0)),
            ),
            started: false,
        }
    }

    /// The whole scene is one script; it is queued on the first idle tick.
    pub fn step(&mut self, director: &mut Director) {
        if self.started {
            return;
        }
        self.started = true;
        director.say(&["Molly: Ossh, that was a lot of pints.", "The walk home will be interesting!"]);
        director.card(stagger::instructions());
        director.push(Beat::Stagger(StaggerGame::new(self.house)));
        director.say(&["Molly: This is my place, come on in!", "Sam: Thanks!"]);
        director.fade_out();
    }
}

fn setup_walk_home(mut commands: Commands, mut stage: ResMut<Stage>, sprites: Res<Sprites>, profile: Res<Profile>) {
    let y = profile.height() / 2.0 - profile.u(10.0);
    stage.player = Vec2::new(profile.width() - profile.u(200.0), y);
    stage.companion = Vec2::new(profile.width() - profile.u(250.0), y);
    stage.actionable = false;

    let state = WalkHomeState::new(&profile);
    spawn_prop(&mut commands, &sprites, Art::Pub, state.pub_rect, Scene::WalkHome);
    spawn_prop(&mut commands, &sprites, Art::House, state.house, Scene::WalkHome);
    commands.insert_resource(state);
    info!("scene: walk home");
}

fn run_walk_home(mut state: ResMut<WalkHomeState>, mut director: ResMut<Director>) {
    state.step(&mut director);
}
