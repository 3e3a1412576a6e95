// Scene 4: outside the pub, talking about birds and taking a photo.

use bevy::prelude::*;
use strum::Display;

use crate::assets::{Art, Fonts, Sprites};
use crate::cards::Shutter;
use crate::config::Profile;
use crate::director::{Beat, Directing, Director, director_idle};
use crate::input::{Controls, Key};
use crate::player::lead;
use crate::sections::{Scene, Stage};
use crate::stage::{Staging, spawn_prop};
use crate::table::door_rect;

pub struct BirdsPlugin;

impl Plugin for BirdsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Birds), setup_birds)
            .add_systems(
                FixedUpdate,
                run_birds
                    .after(Directing)
                    .run_if(in_state(Scene::Birds).and(director_idle)),
            )
            .add_systems(
                Update,
                show_choice.in_set(Staging).run_if(in_state(Scene::Birds)),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Bird {
    Seagull,
    Pigeon,
}

impl Bird {
    fn other(self) -> Self {
        match self {
            Bird::Seagull => Bird::Pigeon,
            Bird::Pigeon => Bird::Seagull,
        }
    }

    fn opinion(self) -> &'static [&'static str] {
        match self {
            Bird::Seagull => &["Molly: Well, they're European Herring gulls", "actually!"],
            Bird::Pigeon => &[
                "Molly: Pigeons are great! I hope to hear you defending their valiant war efforts to a woman that totally didn't realise what she was getting herself into one day!",
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdsPhase {
    WalkingIn,
    /// Waiting on 1 or 2.
    Choosing,
    Free,
    Done,
}

#[derive(Resource, Debug)]
pub struct BirdsState {
    pub phase: BirdsPhase,
    pub door: Rect,
    pub chosen: Option<Bird>,
}

impl BirdsState {
    pub fn new(profile: &Profile) -> Self {
        Self {
            phase: BirdsPhase::WalkingIn,
            door: door_rect(profile),
            chosen: None,
        }
    }

    pub fn step(&mut self, stage: &mut Stage, controls: &Controls, profile: &Profile, director: &mut Director) {
        match self.phase {
            BirdsPhase::WalkingIn => {
                let stride = profile.u(5.0);
                stage.player.x += stride;
                stage.companion.x += stride;
                let stop = profile.width() / 2.0 + profile.u(50.0);
                if stage.player.x >= stop {
                    let y = profile.height() / 2.0 - profile.u(25.0);
                    stage.player = Vec2::new(stop, y);
                    stage.companion = Vec2::new(profile.width() / 2.0 - profile.u(100.0), y);
                    director.say(&[
                        "Sam: Hey, what's your favourite bird?",
                        "Molly: That's a hard question!",
                        "I like loads of different birds!",
                        "Which is your favourite?",
                    ]);
                    self.phase = BirdsPhase::Choosing;
                }
            }
            BirdsPhase::Choosing => {
                let bird = if controls.just_pressed(Key::One) {
                    Bird::Seagull
                } else if controls.just_pressed(Key::Two) {
                    Bird::Pigeon
                } else {
                    return;
                };
                info!("favourite bird: {bird}");
                self.chosen = Some(bird);
                let other = bird.other();
                director.say(bird.opinion());
                let offer = format!("Molly: Want to hear my thoughts on {other}s?");
                director.say(&[offer.as_str(), "Sam: Sure!"]);
                director.say(other.opinion());
                director.say(&["Molly: Hey, let's take a picture"]);
                director.push(Beat::Shutter(Shutter::default()));
                director.picture(Art::Snapshot, &["Molly: Aww, our first picture!"]);
                director.say(&[
                    "Molly: Hey, you fancy coming back to mine?",
                    "Sam: That would be nice!",
                    "Molly: Great! Let's go then! I don't live too far from here!",
                ]);
                stage.actionable = true;
                self.phase = BirdsPhase::Free;
            }
            BirdsPhase::Free => {
                lead(stage, controls.held, profile);
                let span = self.door.inflate(0.05);
                if (span.min.x..=span.max.x).contains(&stage.player.x) {
                    stage.actionable = false;
                    director.say(&["Molly: Just checking...", "you're alright with dogs yeah?!"]);
                    director.fade_out();
                    self.phase = BirdsPhase::Done;
                }
            }
            BirdsPhase::Done => {}
        }
    }
}

#[derive(Component)]
struct ChoicePrompt;

fn setup_birds(
    mut commands: Commands,
    mut stage: ResMut<Stage>,
    sprites: Res<Sprites>,
    fonts: Res<Fonts>,
    profile: Res<Profile>,
) {
    let y = profile.height() / 2.0 - profile.u(25.0);
    stage.player = Vec2::new(-profile.u(50.0), y);
    stage.companion = Vec2::new(-profile.u(150.0), y);
    stage.actionable = false;

    let state = BirdsState::new(&profile);
    spawn_prop(&mut commands, &sprites, Art::Door, state.door, Scene::Birds);
    commands
        .spawn((
            ChoicePrompt,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Px(profile.height() - profile.u(150.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            Visibility::Hidden,
            DespawnOnExit(Scene::Birds),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Press 1 for Seagull or 2 for Pigeon"),
                fonts.small(&profile),
                TextColor(Color::WHITE),
            ));
        });
    commands.insert_resource(state);
    info!("scene: birds");
}

fn run_birds(
    mut state: ResMut<BirdsState>,
    mut stage: ResMut<Stage>,
    controls: Res<Controls>,
    profile: Res<Profile>,
    mut director: ResMut<Director>,
) {
    state.step(&mut stage, &controls, &profile, &mut director);
}

fn show_choice(
    state: Res<BirdsState>,
    director: Res<Director>,
    mut prompts: Query<&mut Visibility, With<ChoicePrompt>>,
) {
    let choosing = state.phase == BirdsPhase::Choosing && director.is_idle();
    for mut visibility in &mut prompts {
        *visibility = if choosing {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
