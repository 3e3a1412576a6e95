// Scene 0: title screen.

use bevy::prelude::*;

use crate::cards::{Card, Until};
use crate::director::{Beat, Directing, Director, director_idle};
use crate::sections::Scene;

pub struct OpeningPlugin;

impl Plugin for OpeningPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Opening), |mut commands: Commands| {
            commands.insert_resource(OpeningState::default())
        })
        .add_systems(
            FixedUpdate,
            run_opening
                .after(Directing)
                .run_if(in_state(Scene::Opening).and(director_idle)),
        );
    }
}

#[derive(Resource, Debug, Default)]
pub struct OpeningState {
    shown: bool,
}

impl OpeningState {
    pub fn step(&mut self, director: &mut Director) {
        if self.shown {
            return;
        }
        self.shown = true;
        director.card(
            Card::new(&["Sam and Molly's first date", "", "Press ENTER to start"], Until::Enter)
                .with_heading("Where it all began"),
        );
        director.push(Beat::Advance);
    }
}

fn run_opening(mut state: ResMut<OpeningState>, mut director: ResMut<Director>) {
    state.step(&mut director);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_waits_for_enter_then_advances_once() {
        let mut state = OpeningState::default();
        let mut director = Director::new(44);
        state.step(&mut director);
        assert_eq!(director.len(), 2);
        assert!(matches!(director.current(), Some(Beat::Card(card)) if card.until == Until::Enter));
        state.step(&mut director);
        assert_eq!(director.len(), 2);
    }
}
