// Scene 3: a table of pints and the door out to the street.

use bevy::prelude::*;

use crate::assets::{Art, Sprites};
use crate::beers::table_rect;
use crate::config::Profile;
use crate::director::{Beat, Directing, Director, director_idle};
use crate::input::Controls;
use crate::minigames::drinking::{self, DrinkingGame};
use crate::player::lead;
use crate::sections::{Scene, Stage, mid_top, overlaps};
use crate::stage::spawn_prop;

pub struct TablePlugin;

impl Plugin for TablePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Table), setup_table).add_systems(
            FixedUpdate,
            run_table
                .after(Directing)
                .run_if(in_state(Scene::Table).and(director_idle)),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePhase {
    Thirsty,
    /// The drinking game is queued or running.
    Drinking,
    Refreshed,
    Done,
}

#[derive(Resource, Debug)]
pub struct TableState {
    pub phase: TablePhase,
    pub table: Rect,
    pub door: Rect,
    /// Set while Sam stands in the doorway, so the nag shows once per visit.
    at_door: bool,
}

/// Door in the top-right corner, shared by every indoor scene.
pub fn door_rect(profile: &Profile) -> Rect {
    mid_top(
        Vec2::new(profile.width() - profile.u(75.0), profile.u(50.0)),
        Vec2::splat(profile.u(100.0)),
    )
}

impl TableState {
    pub fn new(profile: &Profile) -> Self {
        Self {
            phase: TablePhase::Thirsty,
            table: table_rect(profile),
            door: door_rect(profile),
            at_door: false,
        }
    }

    pub fn step(&mut self, stage: &mut Stage, controls: &Controls, profile: &Profile, director: &mut Director) {
        lead(stage, controls.held, profile);
        let sam = stage.player_rect(profile);

        match self.phase {
            TablePhase::Thirsty => {
                if overlaps(sam, self.table.inflate(0.5)) && stage.companion_near(profile) {
                    stage.actionable = false;
                    director.say(&["Dutch courage...?"]);
                    director.card(drinking::instructions());
                    director.push(Beat::Drinking(DrinkingGame::default()));
                    self.phase = TablePhase::Drinking;
                    return;
                }
            }
            TablePhase::Drinking => {
                stage.beers.empty_all();
                director.say(&["Molly: BURRPPPP!!", "Sam: Fancy some fresh air?"]);
                stage.actionable = true;
                self.phase = TablePhase::Refreshed;
                return;
            }
            TablePhase::Refreshed | TablePhase::Done => {}
        }

        let in_doorway = overlaps(sam, self.door.inflate(0.5));
        if !in_doorway {
            self.at_door = false;
            return;
        }
        match self.phase {
            TablePhase::Refreshed => {
                stage.actionable = false;
                director.say(&["Molly: Let's go outside!"]);
                director.fade_out();
                self.phase = TablePhase::Done;
            }
            TablePhase::Thirsty if !self.at_door => {
                director.say(&["Maybe we should have a drink first?"]);
            }
            _ => {}
        }
        self.at_door = true;
    }
}

fn setup_table(mut commands: Commands, mut stage: ResMut<Stage>, sprites: Res<Sprites>, profile: Res<Profile>) {
    stage.player = Vec2::new(profile.u(100.0), profile.height() / 2.0);
    stage.companion = Vec2::new(profile.u(200.0), profile.height() / 2.0);
    stage.actionable = true;

    let state = TableState::new(&profile);
    spawn_prop(&mut commands, &sprites, Art::Table, state.table, Scene::Table);
    spawn_prop(&mut commands, &sprites, Art::Door, state.door, Scene::Table);
    commands.insert_resource(state);
    info!("scene: table");
}

fn run_table(
    mut state: ResMut<TableState>,
    mut stage: ResMut<Stage>,
    controls: Res<Controls>,
    profile: Res<Profile>,
    mut director: ResMut<Director>,
) {
    state.step(&mut stage, &controls, &profile, &mut director);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beers::Level;

    fn setup() -> (Profile, Stage, TableState, Director) {
        let profile = Profile::desktop();
        let mut stage = Stage::new(&profile);
        stage.actionable = true;
        let state = TableState::new(&profile);
        (profile, stage, state, Director::new(44))
    }

    #[test]
    fn door_nags_once_per_visit_before_drinking() {
        let (profile, mut stage, mut state, mut director) = setup();
        stage.player = state.door.min;
        stage.companion = stage.player - Vec2::new(40.0, 0.0);
        let idle = Controls::default();
        state.step(&mut stage, &idle, &profile, &mut director);
        assert_eq!(director.len(), 1);
        state.step(&mut stage, &idle, &profile, &mut director);
        assert_eq!(director.len(), 1);

        stage.player = Vec2::new(0.0, 500.0);
        state.step(&mut stage, &idle, &profile, &mut director);
        stage.player = state.door.min;
        state.step(&mut stage, &idle, &profile, &mut director);
        assert_eq!(director.len(), 2);
        assert_eq!(state.phase, TablePhase::Thirsty);
    }

    #[test]
    fn drinking_then_burp_then_outside() {
        let (profile, mut stage, mut state, mut director) = setup();
        let idle = Controls::default();
        stage.player = state.table.min - Vec2::new(10.0, 10.0);
        stage.companion = stage.player - Vec2::new(40.0, 0.0);
        state.step(&mut stage, &idle, &profile, &mut director);
        assert_eq!(state.phase, TablePhase::Drinking);
        assert_eq!(director.len(), 3);
        assert!(!stage.actionable);

        let mut fresh = Director::new(44);
        state.step(&mut stage, &idle, &profile, &mut fresh);
        assert_eq!(state.phase, TablePhase::Refreshed);
        assert_eq!(stage.beers.level(4), Level::Empty);
        assert_eq!(fresh.len(), 1);
        assert!(stage.actionable);

        let mut outside = Director::new(44);
        stage.player = state.door.min;
        state.step(&mut stage, &idle, &profile, &mut outside);
        assert_eq!(state.phase, TablePhase::Done);
        assert_eq!(outside.len(), 3);
        state.step(&mut stage, &idle, &profile, &mut outside);
        assert_eq!(outside.len(), 3);
    }
}
