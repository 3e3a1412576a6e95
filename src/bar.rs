// Scene 2: inside the pub, walk up to the bar.

use bevy::prelude::*;

use crate::assets::{Art, Fonts, Sprites};
use crate::cards::Splash;
use crate::config::Profile;
use crate::director::{Beat, Directing, Director, director_idle};
use crate::input::Controls;
use crate::player::lead;
use crate::sections::{Scene, Stage, mid_top, overlaps};
use crate::stage::spawn_prop;

pub struct BarPlugin;

impl Plugin for BarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Bar), setup_bar).add_systems(
            FixedUpdate,
            run_bar
                .after(Directing)
                .run_if(in_state(Scene::Bar).and(director_idle)),
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPhase {
    Sign,
    Walking,
    Done,
}

#[derive(Resource, Debug)]
pub struct BarState {
    pub phase: BarPhase,
    pub bar_rect: Rect,
}

impl BarState {
    pub fn new(profile: &Profile) -> Self {
        Self {
            phase: BarPhase::Sign,
            bar_rect: mid_top(
                Vec2::new(
                    profile.width() - profile.u(150.0),
                    profile.height() / 2.0 - profile.u(100.0),
                ),
                Vec2::splat(profile.u(150.0)),
            ),
        }
    }

    pub fn step(&mut self, stage: &mut Stage, controls: &Controls, profile: &Profile, director: &mut Director) {
        match self.phase {
            BarPhase::Sign => {
                director.push(Beat::Splash(Splash::default()));
                stage.actionable = true;
                self.phase = BarPhase::Walking;
            }
            BarPhase::Walking => {
                lead(stage, controls.held, profile);
                if overlaps(stage.player_rect(profile), self.bar_rect) && stage.companion_near(profile) {
                    stage.actionable = false;
                    director.say(&["Let's get some beers in, shall we?"]);
                    director.fade_out();
                    self.phase = BarPhase::Done;
                }
            }
            BarPhase::Done => {}
        }
    }
}

fn setup_bar(
    mut commands: Commands,
    mut stage: ResMut<Stage>,
    sprites: Res<Sprites>,
    fonts: Res<Fonts>,
    profile: Res<Profile>,
) {
    let y = profile.height() / 2.0 - profile.u(25.0);
    stage.player = Vec2::new(profile.u(100.0), y);
    stage.companion = Vec2::new(profile.u(50.0), y);
    stage.actionable = false;

    let state = BarState::new(&profile);
    spawn_prop(&mut commands, &sprites, Art::Bar, state.bar_rect, Scene::Bar);
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Px(profile.u(20.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            DespawnOnExit(Scene::Bar),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Walk to the bar"),
                fonts.small(&profile),
                TextColor(Color::WHITE),
            ));
        });
    commands.insert_resource(state);
    info!("scene: bar");
}

fn run_bar(
    mut state: ResMut<BarState>,
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

    #[test]
    fn sign_first_then_walk() {
        let profile = Profile::desktop();
        let mut stage = Stage::new(&profile);
        stage.actionable = false;
        let mut state = BarState::new(&profile);
        let mut director = Director::new(44);
        state.step(&mut stage, &Controls::default(), &profile, &mut director);
        assert!(matches!(director.current(), Some(Beat::Splash(_))));
        assert_eq!(state.phase, BarPhase::Walking);
        assert!(stage.actionable);
    }

    #[test]
    fn bar_with_molly_ends_the_scene_once() {
        let profile = Profile::desktop();
        let mut stage = Stage::new(&profile);
        let mut state = BarState::new(&profile);
        state.phase = BarPhase::Walking;
        stage.actionable = true;
        let mut director = Director::new(44);

        stage.player = state.bar_rect.min + Vec2::new(5.0, 5.0);
        stage.companion = Vec2::ZERO;
        state.step(&mut stage, &Controls::default(), &profile, &mut director);
        assert!(director.is_idle());

        stage.companion = stage.player - Vec2::new(40.0, 0.0);
        state.step(&mut stage, &Controls::default(), &profile, &mut director);
        assert_eq!(state.phase, BarPhase::Done);
        assert_eq!(director.len(), 3);
        state.step(&mut stage, &Controls::default(), &profile, &mut director);
        assert_eq!(director.len(), 3);
    }
}
