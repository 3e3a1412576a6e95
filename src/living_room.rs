// Scene 6: Molly's living room, her pets, the sofa and the finale.

use bevy::prelude::*;

use crate::assets::{Art, Fonts, Sprites};
use crate::cards::{Card, Until};
use crate::config::Profile;
use crate::director::{Beat, Directing, Director, director_idle};
use crate::input::Controls;
use crate::minigames::heart::{self, HeartGame};
use crate::npc::approach;
use crate::particles::FireworksShow;
use crate::player::lead;
use crate::sections::{Scene, Stage, overlaps};
use crate::stage::{Exclamation, Placed, Staging, point_exclamation, spawn_exclamation, spawn_prop};
use crate::table::door_rect;
use crate::transition::Fade;

pub struct LivingRoomPlugin;

impl Plugin for LivingRoomPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::LivingRoom), setup_living_room)
            .add_systems(
                FixedUpdate,
                run_living_room
                    .after(Directing)
                    .run_if(in_state(Scene::LivingRoom).and(director_idle)),
            )
            .add_systems(
                Update,
                sync_pets.in_set(Staging).run_if(in_state(Scene::LivingRoom)),
            );
    }
}

const PET_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// Maggie runs over to say hello.
    Greeted,
    /// Maggie heads back to her spot; Mike is waiting.
    MaggieMet,
    /// Maggie has something else to say.
    MikeMet,
    SofaUnlocked,
    Done,
}

#[derive(Resource, Debug)]
pub struct RoomState {
    pub phase: RoomPhase,
    pub door: Rect,
    pub sofa: Rect,
    pub maggie: Vec2,
    maggie_home: Vec2,
    pub mike: Vec2,
}

impl RoomState {
    pub fn new(profile: &Profile) -> Self {
        let half = profile.sprite / 2.0;
        let row = profile.height() / 2.0 + profile.u(10.0);
        let maggie_home = Vec2::new(profile.width() / 4.0, row) - half;
        Self {
            phase: RoomPhase::Greeted,
            door: door_rect(profile),
            sofa: Rect::from_center_size(
                Vec2::new(profile.width() / 2.0, profile.height() / 5.0),
                Vec2::new(profile.u(200.0), profile.u(100.0)),
            ),
            maggie: maggie_home,
            maggie_home,
            mike: Vec2::new(profile.width() * 3.0 / 4.0, row) - half,
        }
    }

    /// Where Sam and Molly appear, just inside the door.
    pub fn entrance(&self, profile: &Profile) -> (Vec2, Vec2) {
        let player = Vec2::new(
            self.door.center().x - profile.sprite.x / 2.0,
            self.door.max.y - profile.u(20.0),
        );
        let companion = Vec2::new(
            player.x + profile.sprite.x - profile.u(65.0),
            player.y - profile.u(30.0),
        );
        (player, companion)
    }

    fn rect(&self, top_left: Vec2, profile: &Profile) -> Rect {
        Rect::from_corners(top_left, top_left + profile.sprite)
    }

    pub fn step(&mut self, stage: &mut Stage, controls: &Controls, profile: &Profile, director: &mut Director) {
        let speed = profile.u(PET_SPEED);
        if self.phase == RoomPhase::Greeted {
            approach(&mut self.maggie, stage.player, speed, profile.u(10.0));
        } else {
            approach(&mut self.maggie, self.maggie_home, speed, speed);
        }
        lead(stage, controls.held, profile);

        let sam = stage.player_rect(profile);
        let touching_maggie = overlaps(sam, self.rect(self.maggie, profile));
        let touching_mike = overlaps(sam, self.rect(self.mike, profile));
        match self.phase {
            RoomPhase::Greeted if touching_maggie => {
                director.say(&[
                    "Sam: Woah! Why is her head so massive?!",
                    "Maggie: Heyyyyy Sam! Are you my new best friend?",
                ]);
                self.phase = RoomPhase::MaggieMet;
            }
            RoomPhase::MaggieMet if touching_mike => {
                director.say(&[
                    "Mike: Ahh my love, my life!",
                    "Sam: Your cat's...French?!",
                    "Molly: Yeaaahh.. I think it's weird too!",
                ]);
                self.phase = RoomPhase::MikeMet;
            }
            RoomPhase::MikeMet if touching_maggie => {
                director.say(&[
                    "Maggie: You got any of them floor burgers, Sam?!",
                    "Molly: Ignore her, let's sit on the sofa!",
                ]);
                self.phase = RoomPhase::SofaUnlocked;
            }
            RoomPhase::SofaUnlocked => {
                let centre = self.sofa.center();
                let reach = profile.u(60.0);
                if stage.player.distance(centre) < reach && stage.companion.distance(centre) < reach {
                    stage.actionable = false;
                    director.say(&["Molly: Hey, can I kiss you?"]);
                    director.card(heart::instructions());
                    director.push(Beat::Heart(HeartGame::new(profile)));
                    queue_finale(director, profile);
                    self.phase = RoomPhase::Done;
                }
            }
            _ => {}
        }
    }
}

/// Fireworks, the closing picture and the anniversary card, then quit.
pub fn queue_finale(director: &mut Director, profile: &Profile) {
    director.push(Beat::Fireworks(FireworksShow::new(profile.fireworks.show_ticks)));
    director.card(Card::new(&[], Until::Ticks(15)));
    director.picture(
        Art::Us,
        &[
            "And the rest was history!",
            "Thank you for a wonderful year, my gorgeous girl!",
            "I can't wait for many more!",
            "I love you so much!",
        ],
    );
    director.card(Card::new(&[], Until::Ticks(60)).with_heading("Happy Anniversary!"));
    director.push(Beat::Fade(Fade::default()));
    director.push(Beat::Quit);
}

#[derive(Component)]
enum Pet {
    Maggie,
    Mike,
}

#[derive(Component)]
struct OverMaggie;

fn setup_living_room(
    mut commands: Commands,
    mut stage: ResMut<Stage>,
    sprites: Res<Sprites>,
    fonts: Res<Fonts>,
    profile: Res<Profile>,
) {
    let state = RoomState::new(&profile);
    (stage.player, stage.companion) = state.entrance(&profile);
    stage.actionable = true;

    spawn_prop(&mut commands, &sprites, Art::Door, state.door, Scene::LivingRoom);
    spawn_prop(&mut commands, &sprites, Art::Sofa, state.sofa, Scene::LivingRoom);
    for (pet, art, at) in [(Pet::Maggie, Art::Maggie, state.maggie), (Pet::Mike, Art::Mike, state.mike)] {
        commands.spawn((
            pet,
            sprites.sprite(art),
            Placed::new(at, profile.sprite, 4.0),
            DespawnOnExit(Scene::LivingRoom),
        ));
    }
    spawn_exclamation(&mut commands, &fonts, &profile, Scene::LivingRoom, OverMaggie);
    commands.insert_resource(state);
    info!("scene: living room");
}

fn run_living_room(
    mut state: ResMut<RoomState>,
    mut stage: ResMut<Stage>,
    controls: Res<Controls>,
    profile: Res<Profile>,
    mut director: ResMut<Director>,
) {
    state.step(&mut stage, &controls, &profile, &mut director);
}

fn sync_pets(
    state: Res<RoomState>,
    profile: Res<Profile>,
    mut pets: Query<(&Pet, &mut Placed)>,
    mut marks: Query<(&mut Placed, &mut Visibility), (With<Exclamation>, With<OverMaggie>, Without<Pet>)>,
) {
    for (pet, mut placed) in &mut pets {
        placed.top_left = match pet {
            Pet::Maggie => state.maggie,
            Pet::Mike => state.mike,
        };
    }
    let Ok((mut placed, mut visibility)) = marks.single_mut() else {
        return;
    };
    let over = state.maggie + Vec2::new(profile.u(10.0), -profile.u(20.0));
    point_exclamation(
        &mut placed,
        &mut visibility,
        (state.phase == RoomPhase::MikeMet).then_some(over),
    );
}
