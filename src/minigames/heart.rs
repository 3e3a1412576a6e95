// Timed-stop game: stop the bouncing heart over the red line.
use bevy::prelude::*;

use crate::assets::{Art, Sprites};
use crate::cards::{Card, Until};
use crate::config::Profile;
use crate::director::{Beat, BeatView, Cue, Director, Flow};
use crate::input::Key;

pub fn instructions() -> Card {
    Card::new(
        &[
            "Stop the heart on the red line",
            "The heart moves left and right automatically.",
            "Press SPACE to stop it.",
            "",
            "Press ENTER to start.",
        ],
        Until::Enter,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeartGame {
    /// Left edge of the heart.
    pub x: f32,
    direction: f32,
    pub misses: u32,
}

impl HeartGame {
    pub fn new(profile: &Profile) -> Self {
        Self {
            x: profile.width() / 2.0,
            direction: 1.0,
            misses: 0,
        }
    }

    /// Inclusive span of x positions that count as a hit.
    pub fn window(profile: &Profile) -> (f32, f32) {
        let centre = profile.width() / 2.0;
        let half = profile.heart.window / 2.0;
        (centre - half, centre + half)
    }

    pub fn step(&mut self, cue: &mut Cue) -> Flow {
        let profile = cue.profile;
        // Judged on where the heart was drawn, before this tick's motion.
        if cue.controls.just_pressed(Key::Space) {
            let (start, end) = Self::window(profile);
            if (start..=end).contains(&self.x) {
                info!("heart stopped after {} misses", self.misses);
                return Flow::Then(vec![cue.say(&["Sam and Molly share their first kiss!"])]);
            }
            self.misses += 1;
            *self = Self {
                misses: self.misses,
                ..Self::new(profile)
            };
            return Flow::Interject(cue.say(&["Missed! Let's try again!"]));
        }
        self.x += profile.heart.speed * self.direction;
        if self.x <= 0.0 || self.x >= profile.width() - profile.heart.size.x {
            self.direction = -self.direction;
        }
        Flow::Running
    }
}

#[derive(Component)]
pub(super) struct HeartIcon;

pub fn spawn_heart_view(commands: &mut Commands, sprites: &Sprites, profile: &Profile) {
    let (start, end) = HeartGame::window(profile);
    let line_y = profile.height() / 2.0 + profile.heart.size.y / 2.0;
    commands
        .spawn((
            BeatView,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::BLACK),
            GlobalZIndex(40),
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(start),
                    top: Val::Px(line_y),
                    width: Val::Px(end - start),
                    height: Val::Px(profile.u(10.0)),
                    ..default()
                },
                BackgroundColor(Color::srgb(1.0, 0.0, 0.0)),
            ));
            parent.spawn((
                HeartIcon,
                ImageNode::new(sprites.handle(Art::Heart)),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(profile.width() / 2.0),
                    top: Val::Px(line_y - profile.heart.size.y / 2.0),
                    width: Val::Px(profile.heart.size.x),
                    height: Val::Px(profile.heart.size.y),
                    ..default()
                },
            ));
        });
}

pub(super) fn update_heart_view(director: Res<Director>, mut hearts: Query<&mut Node, With<HeartIcon>>) {
    let Some(Beat::Heart(game)) = director.current() else {
        return;
    };
    let Ok(mut node) = hearts.single_mut() else {
        return;
    };
    node.left = Val::Px(game.x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Controls;
    use crate::sections::Stage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn step(game: &mut HeartGame, keys: &[Key]) -> Flow {
        let profile = Profile::desktop();
        let mut stage = Stage::new(&profile);
        let controls = Controls::press(keys);
        let mut rng = StdRng::seed_from_u64(0);
        let mut cue = Cue {
            stage: &mut stage,
            controls: &controls,
            profile: &profile,
            rng: &mut rng,
            columns: 44,
        };
        game.step(&mut cue)
    }

    #[test]
    fn stopping_in_the_centre_wins() {
        let mut game = HeartGame::new(&Profile::desktop());
        assert_eq!(game.x, 400.0);
        let Flow::Then(beats) = step(&mut game, &[Key::Space]) else {
            panic!("expected a win");
        };
        assert_eq!(
            beats[0].dialogue().map(|d| d.rows().to_vec()),
            Some(vec!["Sam and Molly share their first kiss!".to_string()])
        );
    }

    #[test]
    fn window_edges_count() {
        let profile = Profile::desktop();
        let (start, end) = HeartGame::window(&profile);
        assert_eq!((start, end), (350.0, 450.0));
        for x in [start, end] {
            let mut game = HeartGame::new(&profile);
            game.x = x;
            assert!(matches!(step(&mut game, &[Key::Space]), Flow::Then(_)));
        }
    }

    #[test]
    fn one_pixel_outside_misses_and_restarts() {
        let profile = Profile::desktop();
        let (_, end) = HeartGame::window(&profile);
        let mut game = HeartGame::new(&profile);
        game.x = end + 1.0;
        game.direction = -1.0;
        let Flow::Interject(beat) = step(&mut game, &[Key::Space]) else {
            panic!("expected a retry");
        };
        assert_eq!(
            beat.dialogue().map(|d| d.rows().to_vec()),
            Some(vec!["Missed! Let's try again!".to_string()])
        );
        assert_eq!(game.misses, 1);
        assert_eq!(game.x, 400.0);
        assert_eq!(game.direction, 1.0);
    }

    #[test]
    fn heart_bounces_between_the_walls() {
        let profile = Profile::desktop();
        let mut game = HeartGame::new(&profile);
        let right_wall = profile.width() - profile.heart.size.x;
        let mut turned = false;
        for _ in 0..200 {
            let before = game.x;
            step(&mut game, &[]);
            assert!(game.x > -profile.heart.speed && game.x < right_wall + profile.heart.speed);
            turned |= game.x < before;
        }
        assert!(turned);
    }
}
