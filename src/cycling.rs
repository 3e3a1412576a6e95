// Scene 1: cycling to the pub and meeting Molly on the way.

use bevy::prelude::*;

use crate::assets::{Art, Fonts, Sprites};
use crate::cards::{Card, Until};
use crate::config::Profile;
use crate::director::{Directing, Director, director_idle};
use crate::input::Controls;
use crate::player::{lead, walk};
use crate::sections::{Scene, Stage, mid_right, overlaps};
use crate::stage::{Exclamation, Placed, Staging, point_exclamation, spawn_exclamation, spawn_prop};

pub struct CyclingPlugin;

impl Plugin for CyclingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Cycling), setup_cycling)
            .add_systems(
                FixedUpdate,
                run_cycling
                    .after(Directing)
                    .run_if(in_state(Scene::Cycling).and(director_idle)),
            )
            .add_systems(
                Update,
                (sync_bike, sync_cycling_marks)
                    .in_set(Staging)
                    .run_if(in_state(Scene::Cycling)),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclingPhase {
    Intro,
    /// Riding toward the pub; Molly comes down the road once Sam is close.
    Riding,
    /// Molly is waiting for Sam to come over.
    Approaching,
    Meeting,
    Following,
    Done,
}

#[derive(Resource, Debug)]
pub struct CyclingState {
    pub phase: CyclingPhase,
    pub pub_rect: Rect,
}

impl CyclingState {
    pub fn new(profile: &Profile) -> Self {
        Self {
            phase: CyclingPhase::Intro,
            pub_rect: pub_rect(profile),
        }
    }

    pub fn step(&mut self, stage: &mut Stage, controls: &Controls, profile: &Profile, director: &mut Director) {
        match self.phase {
            CyclingPhase::Intro => {
                director.say(&[
                    "USE THE DOWN ARROW TO SCROLL THROUGH THE TEXT",
                    "Oh look at the time, it's nearly 7pm!",
                    "Use the arrow keys to cycle to the pub for your date.",
                ]);
                stage.actionable = true;
                self.phase = CyclingPhase::Riding;
            }
            CyclingPhase::Riding => {
                lead_alone(stage, controls, profile);
                if stage.player.x > profile.width() - profile.u(300.0) {
                    stage.companion.y += profile.walk_speed;
                    if stage.companion.y >= profile.height() / 2.0 - profile.u(25.0) {
                        director.say(&[
                            "Is that Molly?",
                            "Maybe I should go and ask if she wants to walk with me?",
                        ]);
                        self.phase = CyclingPhase::Approaching;
                    }
                }
            }
            CyclingPhase::Approaching => {
                lead_alone(stage, controls, profile);
                if overlaps(stage.player_rect(profile), stage.companion_rect(profile)) {
                    director.say(&[
                        "Sam: Molly, right?",
                        "Molly: Yep! You must be Sam!",
                        "Sam: Cool! Nice to meet you!",
                        "Want to walk together?",
                        "Molly: Yeah sure! I'll follow you!",
                    ]);
                    self.phase = CyclingPhase::Meeting;
                }
            }
            CyclingPhase::Meeting => {
                self.phase = CyclingPhase::Following;
            }
            CyclingPhase::Following => {
                lead(stage, controls.held, profile);
                if overlaps(stage.player_rect(profile), self.pub_rect) && stage.companion_near(profile) {
                    stage.actionable = false;
                    director.card(
                        Card::new(&["", "Press ENTER to continue"], Until::Enter)
                            .with_heading("You made it to the pub!"),
                    );
                    director.fade_out();
                    self.phase = CyclingPhase::Done;
                }
            }
            CyclingPhase::Done => {}
        }
    }
}

/// Sam rides on his own until Molly joins him.
fn lead_alone(stage: &mut Stage, controls: &Controls, profile: &Profile) {
    if stage.actionable {
        walk(&mut stage.player, controls.held, profile.walk_speed);
    }
}

fn pub_rect(profile: &Profile) -> Rect {
    mid_right(
        Vec2::new(profile.width() - profile.u(40.0), profile.height() / 2.0),
        Vec2::splat(profile.u(150.0)),
    )
}

#[derive(Component)]
struct Bike;

#[derive(Component)]
enum Mark {
    OverSam,
    OverMolly,
}

fn setup_cycling(
    mut commands: Commands,
    sprites: Res<Sprites>,
    fonts: Res<Fonts>,
    profile: Res<Profile>,
) {
    let state = CyclingState::new(&profile);
    spawn_prop(&mut commands, &sprites, Art::Pub, state.pub_rect, Scene::Cycling);
    commands.spawn((
        Bike,
        sprites.sprite(Art::Bike),
        Placed::new(Vec2::ZERO, profile.sprite, 7.0),
        DespawnOnExit(Scene::Cycling),
    ));
    spawn_exclamation(&mut commands, &fonts, &profile, Scene::Cycling, Mark::OverSam);
    spawn_exclamation(&mut commands, &fonts, &profile, Scene::Cycling, Mark::OverMolly);
    commands.insert_resource(state);
    info!("scene: cycling");
}

fn run_cycling(
    mut state: ResMut<CyclingState>,
    mut stage: ResMut<Stage>,
    controls: Res<Controls>,
    profile: Res<Profile>,
    mut director: ResMut<Director>,
) {
    state.step(&mut stage, &controls, &profile, &mut director);
}

fn sync_bike(stage: Res<Stage>, profile: Res<Profile>, mut bikes: Query<&mut Placed, With<Bike>>) {
    let Ok(mut bike) = bikes.single_mut() else {
        return;
    };
    bike.top_left = Vec2::new(
        stage.player.x - profile.u(7.0),
        stage.player.y + profile.sprite.y / 2.0,
    );
}

fn sync_cycling_marks(
    state: Res<CyclingState>,
    stage: Res<Stage>,
    profile: Res<Profile>,
    mut marks: Query<(&Mark, &mut Placed, &mut Visibility), With<Exclamation>>,
) {
    let meeting = state.phase == CyclingPhase::Meeting;
    let offset = Vec2::new(profile.u(15.0), -profile.u(30.0));
    for (mark, mut placed, mut visibility) in &mut marks {
        let over = match mark {
            Mark::OverSam => stage.player,
            Mark::OverMolly => stage.companion,
        };
        point_exclamation(&mut placed, &mut visibility, meeting.then_some(over + offset));
    }
}
