// Full-screen cards and pictures.

use bevy::prelude::*;

use crate::animation::GifFrames;
use crate::assets::{Art, Fonts, Sprites};
use crate::config::Profile;
use crate::dialogue::DialogueBox;
use crate::director::{Beat, BeatView, Director, Flow, refresh_views};
use crate::input::{Controls, Key};
use crate::stage::Placed;

pub struct CardsPlugin;

impl Plugin for CardsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (flash_shutter, animate_splash).after(refresh_views));
    }
}

/// The pub sign is up this long before the bar scene starts.
pub const SPLASH_TICKS: u32 = 75;
const FLASH_TICKS: u32 = 6;

/// When a card goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Until {
    Enter,
    Ticks(u32),
}

/// Black screen with centred text: an optional large heading over small
/// lines. Empty lines leave a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub heading: Option<String>,
    pub lines: Vec<String>,
    pub until: Until,
}

impl Card {
    pub fn new(lines: &[&str], until: Until) -> Self {
        Self {
            heading: None,
            lines: lines.iter().map(|line| line.to_string()).collect(),
            until,
        }
    }

    pub fn with_heading(mut self, heading: &str) -> Self {
        self.heading = Some(heading.to_string());
        self
    }

    pub fn step(&mut self, controls: &Controls) -> Flow {
        match self.until {
            Until::Enter if controls.just_pressed(Key::Enter) => Flow::Finished,
            Until::Enter => Flow::Running,
            Until::Ticks(0) => Flow::Finished,
            Until::Ticks(ticks) => {
                self.until = Until::Ticks(ticks - 1);
                Flow::Running
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splash {
    ticks_left: u32,
}

impl Default for Splash {
    fn default() -> Self {
        Self {
            ticks_left: SPLASH_TICKS,
        }
    }
}

impl Splash {
    /// Time the sign has been up, in milliseconds.
    pub fn elapsed_ms(&self, tick_hz: f64) -> u32 {
        let ticks = SPLASH_TICKS - self.ticks_left;
        (f64::from(ticks) * 1000.0 / tick_hz) as u32
    }

    pub fn step(&mut self) -> Flow {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        if self.ticks_left == 0 {
            Flow::Finished
        } else {
            Flow::Running
        }
    }
}

/// Waits for Enter, then flashes the screen white.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Shutter {
    flash: Option<u32>,
}

impl Shutter {
    pub fn flashing(&self) -> bool {
        self.flash.is_some()
    }

    pub fn step(&mut self, controls: &Controls) -> Flow {
        match self.flash {
            None => {
                if controls.just_pressed(Key::Enter) {
                    self.flash = Some(FLASH_TICKS);
                }
                Flow::Running
            }
            Some(0) => Flow::Finished,
            Some(ticks) => {
                self.flash = Some(ticks - 1);
                Flow::Running
            }
        }
    }
}

/// A framed photo with a caption underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct Picture {
    pub art: Art,
    pub dialogue: DialogueBox,
}

fn blackout(z: i32) -> impl Bundle {
    (
        BeatView,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::BLACK),
        GlobalZIndex(z),
    )
}

pub fn spawn_card_view(commands: &mut Commands, fonts: &Fonts, profile: &Profile, card: &Card) {
    commands.spawn(blackout(40)).with_children(|parent| {
        parent
            .spawn(Node {
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(profile.u(20.0)),
                ..default()
            })
            .with_children(|column| {
                if let Some(heading) = &card.heading {
                    column.spawn((
                        Text::new(heading.as_str()),
                        fonts.large(profile),
                        TextColor(Color::WHITE),
                    ));
                }
                for line in &card.lines {
                    // A space keeps the gap the height of a line.
                    let text = if line.is_empty() { " " } else { line.as_str() };
                    column.spawn((Text::new(text), fonts.small(profile), TextColor(Color::WHITE)));
                }
            });
    });
}

#[derive(Component)]
struct SplashFrames(Handle<GifFrames>);

/// Hidden until the first frame is ready.
pub fn spawn_splash_view(commands: &mut Commands, sprites: &Sprites) {
    commands.spawn(blackout(40)).with_children(|parent| {
        parent.spawn((SplashFrames(sprites.splash()), ImageNode::default(), Visibility::Hidden));
    });
}

fn animate_splash(
    director: Res<Director>,
    profile: Res<Profile>,
    gifs: Res<Assets<GifFrames>>,
    mut views: Query<(&SplashFrames, &mut ImageNode, &mut Visibility)>,
) {
    let Some(Beat::Splash(splash)) = director.current() else {
        return;
    };
    let elapsed = splash.elapsed_ms(profile.tick_hz);
    for (frames, mut node, mut visibility) in &mut views {
        let Some(frame) = gifs.get(&frames.0).and_then(|gif| gif.frame_at(elapsed)) else {
            continue;
        };
        if node.image != *frame {
            node.image = frame.clone();
        }
        visibility.set_if_neq(Visibility::Inherited);
    }
}

#[derive(Component)]
struct Flash;

pub fn spawn_shutter_view(commands: &mut Commands, fonts: &Fonts, profile: &Profile) {
    commands
        .spawn((
            BeatView,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                top: Val::Px(profile.height() - profile.u(200.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            GlobalZIndex(40),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Press ENTER to take the picture!"),
                fonts.small(profile),
                TextColor(Color::WHITE),
            ));
        });
    commands.spawn((
        BeatView,
        Flash,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::WHITE),
        GlobalZIndex(60),
        Visibility::Hidden,
    ));
}

fn flash_shutter(director: Res<Director>, mut flashes: Query<&mut Visibility, With<Flash>>) {
    let Some(Beat::Shutter(shutter)) = director.current() else {
        return;
    };
    for mut visibility in &mut flashes {
        *visibility = if shutter.flashing() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Black backdrop with a white-framed photo a little above the middle.
pub fn spawn_picture_view(commands: &mut Commands, sprites: &Sprites, profile: &Profile, art: Art) {
    let frame = (profile.screen * 0.6).floor();
    let top = ((profile.height() - frame.y) / 2.0 - profile.u(50.0)).max(0.0);
    let border = Val::Px(profile.u(10.0));
    commands.spawn(blackout(40)).with_children(|parent| {
        parent
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px((profile.width() - frame.x) / 2.0),
                    top: Val::Px(top),
                    width: Val::Px(frame.x),
                    height: Val::Px(frame.y),
                    padding: UiRect::all(border),
                    ..default()
                },
                BackgroundColor(Color::WHITE),
            ))
            .with_children(|inner| {
                inner.spawn((
                    ImageNode::new(sprites.handle(art)),
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                ));
            });
    });
}

/// Black sky behind the fireworks. A world sprite rather than UI so the
/// gizmos draw on top of it.
pub fn spawn_night_sky(commands: &mut Commands, profile: &Profile) {
    commands.spawn((
        BeatView,
        Sprite::from_color(Color::BLACK, profile.screen),
        Placed::new(Vec2::ZERO, profile.screen, 90.0),
    ));
}
