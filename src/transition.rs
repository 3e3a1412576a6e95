// Fade to black between scenes.

use bevy::prelude::*;

use crate::director::{Beat, Director, Flow, refresh_views};
use crate::sections::Scene;

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, fade_curtain.after(refresh_views));
    }
}

const ALPHA_STEP: u8 = 10;
const ALPHA_LAST: u8 = 250;

/// Darkens the screen by a fixed alpha step per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fade {
    alpha: u8,
}

impl Fade {
    pub fn alpha(&self) -> f32 {
        f32::from(self.alpha) / 255.0
    }

    pub fn step(&mut self) -> Flow {
        if self.alpha >= ALPHA_LAST {
            return Flow::Finished;
        }
        self.alpha += ALPHA_STEP;
        Flow::Running
    }
}

/// Black overlay that outlives its fade and goes away with the scene, so the
/// old scene never flashes back before the next one is set up.
#[derive(Component)]
pub struct Curtain;

pub fn spawn_curtain(commands: &mut Commands, scene: Scene) {
    commands.spawn((
        Curtain,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::NONE),
        GlobalZIndex(100),
        DespawnOnExit(scene),
    ));
}

pub fn fade_curtain(director: Res<Director>, mut curtains: Query<&mut BackgroundColor, With<Curtain>>) {
    let alpha = match director.current() {
        Some(Beat::Fade(fade)) => fade.alpha(),
        _ => 1.0,
    };
    for mut background in &mut curtains {
        background.0 = Color::srgba(0.0, 0.0, 0.0, alpha);
    }
}
