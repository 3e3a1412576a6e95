// Key-match drinking game: press the prompted arrow to take a sip.
use bevy::prelude::*;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::assets::{Art, Fonts, Sprites};
use crate::beers::table_rect;
use crate::cards::{Card, Until};
use crate::config::Profile;
use crate::director::{Beat, BeatView, Cue, Director, Flow};
use crate::input::Key;
use crate::stage::Placed;

const DIRECTIONS: [Key; 4] = [Key::Up, Key::Down, Key::Left, Key::Right];
const SIP_COST: u32 = 7;
const FUMBLE_COST: u32 = 5;
/// Pause on the empty glasses before the result.
const FINISH_HOLD: u32 = 15;

pub fn instructions() -> Card {
    Card::new(
        &["Match the keys to drink the beers!", "Press ENTER to start"],
        Until::Enter,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrinkingGame {
    pub sobriety: u32,
    pub target: Option<Key>,
    hold: u32,
}

impl Default for DrinkingGame {
    fn default() -> Self {
        Self {
            sobriety: 100,
            target: None,
            hold: FINISH_HOLD,
        }
    }
}

impl DrinkingGame {
    fn pick(rng: &mut impl Rng) -> Key {
        DIRECTIONS.choose(rng).copied().unwrap_or(Key::Up)
    }

    pub fn step(&mut self, cue: &mut Cue) -> Flow {
        let beers = &mut cue.stage.beers;
        if beers.all_empty() {
            if self.hold > 0 {
                self.hold -= 1;
                return Flow::Running;
            }
            info!("drinking game done, sobriety {}", self.sobriety);
            return Flow::Then(vec![cue.say(&["Congratulations! You finished all the beers!"])]);
        }
        let mut target = match self.target {
            Some(target) => target,
            None => Self::pick(cue.rng),
        };
        for key in &cue.controls.pressed {
            let Some(current) = beers.current() else {
                break;
            };
            if *key == target {
                beers.sip(current);
                self.sobriety = self.sobriety.saturating_sub(SIP_COST);
                target = Self::pick(cue.rng);
            } else {
                self.sobriety = self.sobriety.saturating_sub(FUMBLE_COST);
            }
        }
        self.target = Some(target);
        Flow::Running
    }
}

#[derive(Component)]
pub(super) struct SobrietyBar;

#[derive(Component)]
pub(super) struct KeyPrompt;

/// Black out the room between the props and the glasses, then put the table
/// back so only the pints and the bar are left on screen.
const BACKDROP_Z: f32 = 1.5;

pub fn spawn_drinking_view(commands: &mut Commands, fonts: &Fonts, sprites: &Sprites, profile: &Profile) {
    let u = |px: f32| Val::Px(profile.u(px));
    commands.spawn((
        BeatView,
        Sprite::from_color(Color::BLACK, profile.screen),
        Placed::new(Vec2::ZERO, profile.screen, BACKDROP_Z),
    ));
    let table = table_rect(profile);
    let (mut sprite, fitted) = sprites.sprite(Art::Table);
    sprite.custom_size = Some(table.size());
    commands.spawn((BeatView, sprite, fitted, Placed::from_rect(table, BACKDROP_Z + 0.1)));
    commands.spawn((
        BeatView,
        SobrietyBar,
        Node {
            position_type: PositionType::Absolute,
            left: u(50.0),
            top: u(20.0),
            width: u(300.0),
            height: u(20.0),
            ..default()
        },
        BackgroundColor(Color::srgb(0.0, 1.0, 0.0)),
    ));
    commands.spawn((
        BeatView,
        Text::new("Sobriety"),
        fonts.small(profile),
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: u(50.0),
            top: u(50.0),
            ..default()
        },
    ));
    commands
        .spawn((
            BeatView,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Px(profile.height() / 2.0 + profile.u(50.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((KeyPrompt, Text::new(""), fonts.small(profile), TextColor(Color::WHITE)));
        });
}

pub(super) fn update_drinking_view(
    director: Res<Director>,
    profile: Res<Profile>,
    mut bars: Query<&mut Node, With<SobrietyBar>>,
    mut prompts: Query<&mut Text, With<KeyPrompt>>,
) {
    let Some(Beat::Drinking(game)) = director.current() else {
        return;
    };
    if let Ok(mut bar) = bars.single_mut() {
        bar.width = Val::Px(profile.u(game.sobriety as f32 * 3.0));
    }
    if let Ok(mut prompt) = prompts.single_mut() {
        prompt.0 = match game.target {
            Some(key) => format!("Press: {key}"),
            None => String::new(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beers::{BEER_COUNT, Level};
    use crate::input::Controls;
    use crate::sections::Stage;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn step(game: &mut DrinkingGame, stage: &mut Stage, keys: &[Key], rng: &mut StdRng) -> Flow {
        let profile = Profile::desktop();
        let controls = Controls::press(keys);
        let mut cue = Cue {
            stage,
            controls: &controls,
            profile: &profile,
            rng,
            columns: 44,
        };
        game.step(&mut cue)
    }

    fn wrong_key(target: Key) -> Key {
        if target == Key::Up { Key::Down } else { Key::Up }
    }

    #[test]
    fn right_key_sips_wrong_key_costs_less() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut stage = Stage::new(&Profile::desktop());
        let mut game = DrinkingGame::default();
        step(&mut game, &mut stage, &[], &mut rng);
        let target = game.target.unwrap();

        step(&mut game, &mut stage, &[wrong_key(target)], &mut rng);
        assert_eq!(game.sobriety, 95);
        assert_eq!(stage.beers.level(0), Level::Full);

        step(&mut game, &mut stage, &[target], &mut rng);
        assert_eq!(game.sobriety, 88);
        assert_eq!(stage.beers.level(0), Level::TwoThirds);
    }

    #[test]
    fn fifteen_sips_empty_the_table_then_congratulate() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut stage = Stage::new(&Profile::desktop());
        let mut game = DrinkingGame::default();
        step(&mut game, &mut stage, &[], &mut rng);
        for _ in 0..BEER_COUNT * 3 {
            let target = game.target.unwrap();
            assert_eq!(step(&mut game, &mut stage, &[target], &mut rng), Flow::Running);
        }
        assert!(stage.beers.all_empty());
        assert_eq!(game.sobriety, 0);

        let mut ticks = 0;
        let flow = loop {
            let flow = step(&mut game, &mut stage, &[], &mut rng);
            if flow != Flow::Running {
                break flow;
            }
            ticks += 1;
        };
        assert_eq!(ticks, FINISH_HOLD);
        let Flow::Then(beats) = flow else {
            panic!("expected a follow-up dialogue");
        };
        assert_eq!(
            beats[0].dialogue().map(|d| d.rows().to_vec()),
            Some(vec!["Congratulations! You finished all the beers!".to_string()])
        );
    }

    #[test]
    fn view_blacks_out_everything_but_the_table_and_glasses() {
        let profile = Profile::desktop();
        let mut app = App::new();
        app.insert_resource(profile.clone())
            .add_systems(Update, |mut commands: Commands, profile: Res<Profile>| {
                spawn_drinking_view(&mut commands, &Fonts::default(), &Sprites::default(), &profile);
            });
        app.update();
        let world = app.world_mut();
        let mut backdrop = None;
        let mut table = None;
        for (sprite, placed) in world.query_filtered::<(&Sprite, &Placed), With<BeatView>>().iter(world) {
            if sprite.custom_size == Some(profile.screen) && sprite.color == Color::BLACK {
                backdrop = Some(placed.z);
            } else if sprite.custom_size == Some(table_rect(&profile).size()) {
                table = Some(placed.z);
            }
        }
        let (Some(backdrop), Some(table)) = (backdrop, table) else {
            panic!("missing backdrop or table");
        };
        // Props sit at 1, glasses from 2.
        assert!(backdrop > 1.0);
        assert!(backdrop < table);
        assert!(table < 2.0);
    }
}
