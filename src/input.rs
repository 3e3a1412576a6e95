// Keyboard snapshot consumed by the fixed-rate game logic.
use bevy::prelude::*;
use strum::{Display, EnumIter, IntoEnumIterator};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Controls>()
            .add_systems(Update, buffer_presses)
            .add_systems(FixedPreUpdate, snapshot_held)
            .add_systems(FixedPostUpdate, clear_presses);
    }
}

/// The only keys the game listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    #[strum(serialize = "1")]
    One,
    #[strum(serialize = "2")]
    Two,
}

impl Key {
    pub fn code(self) -> KeyCode {
        match self {
            Key::Up => KeyCode::ArrowUp,
            Key::Down => KeyCode::ArrowDown,
            Key::Left => KeyCode::ArrowLeft,
            Key::Right => KeyCode::ArrowRight,
            Key::Enter => KeyCode::Enter,
            Key::Space => KeyCode::Space,
            Key::One => KeyCode::Digit1,
            Key::Two => KeyCode::Digit2,
        }
    }

    pub fn from_code(code: KeyCode) -> Option<Self> {
        Key::iter().find(|key| key.code() == code)
    }
}

/// Held arrow keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Held {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Held {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Input for one logic tick: held arrows plus every key pressed since the
/// previous tick, in order.
#[derive(Resource, Debug, Clone, Default)]
pub struct Controls {
    pub held: Held,
    pub pressed: Vec<Key>,
}

impl Controls {
    pub fn just_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Drops pending presses so nothing leaks into the next consumer.
    pub fn consume(&mut self) {
        self.pressed.clear();
    }

    #[cfg(test)]
    pub fn holding(held: Held) -> Self {
        Self {
            held,
            pressed: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn press(keys: &[Key]) -> Self {
        Self {
            held: Held::default(),
            pressed: keys.to_vec(),
        }
    }
}

// Presses are collected every frame; the fixed tick may run zero or several
// times per frame.
fn buffer_presses(keyboard: Res<ButtonInput<KeyCode>>, mut controls: ResMut<Controls>) {
    for code in keyboard.get_just_pressed() {
        if let Some(key) = Key::from_code(*code) {
            controls.pressed.push(key);
        }
    }
}

fn snapshot_held(keyboard: Res<ButtonInput<KeyCode>>, mut controls: ResMut<Controls>) {
    controls.held = Held {
        up: keyboard.pressed(KeyCode::ArrowUp),
        down: keyboard.pressed(KeyCode::ArrowDown),
        left: keyboard.pressed(KeyCode::ArrowLeft),
        right: keyboard.pressed(KeyCode::ArrowRight),
    };
}

fn clear_presses(mut controls: ResMut<Controls>) {
    controls.consume();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_codes() {
        for key in Key::iter() {
            assert_eq!(Key::from_code(key.code()), Some(key));
        }
        assert_eq!(Key::from_code(KeyCode::KeyQ), None);
    }

    #[test]
    fn key_names_match_prompts() {
        assert_eq!(Key::Up.to_string(), "up");
        assert_eq!(Key::One.to_string(), "1");
    }
}
