// Paged dialogue box. Text is wrapped to a fixed column count and shown two
// rows at a time; Down pages forward and closes on the last page, Up pages
// back.
use bevy::prelude::*;

use crate::assets::Fonts;
use crate::config::Profile;
use crate::director::{Beat, BeatView, Director, Flow};
use crate::input::{Controls, Key};

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_dialogue_text.after(crate::director::refresh_views));
    }
}

const ROWS_PER_PAGE: usize = 2;
/// Bottom-right corner of the box.
const PAGE_MARKER: &str = "▼";
/// Rough monospace advance as a fraction of the font size.
const GLYPH_ASPECT: f32 = 0.6;

/// How many glyphs fit on one row of the dialogue box.
pub fn columns(profile: &Profile) -> usize {
    let max_line_width = profile.width() - profile.u(140.0);
    let glyph = profile.font_small * GLYPH_ASPECT;
    ((max_line_width / glyph).floor() as usize).max(1)
}

/// Greedy word wrap. Words longer than a row are broken across rows.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let row_len = row.chars().count();
            let needed = if row.is_empty() { word.len() } else { row_len + 1 + word.len() };
            if needed <= columns {
                if !row.is_empty() {
                    row.push(' ');
                }
                row.extend(word.iter());
                break;
            }
            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                continue;
            }
            let rest = word.split_off(columns);
            rows.push(word.into_iter().collect());
            word = rest;
            if word.is_empty() {
                break;
            }
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogueBox {
    pages: Vec<Vec<String>>,
    page: usize,
}

impl DialogueBox {
    /// Each line is wrapped on its own and its rows are grouped into pages,
    /// so a page never mixes two lines.
    pub fn new<S: AsRef<str>>(lines: &[S], columns: usize) -> Self {
        let pages = lines
            .iter()
            .flat_map(|line| {
                wrap(line.as_ref(), columns)
                    .chunks(ROWS_PER_PAGE)
                    .map(<[String]>::to_vec)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { pages, page: 0 }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn rows(&self) -> &[String] {
        self.pages.get(self.page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_more(&self) -> bool {
        self.page + 1 < self.pages.len()
    }

    /// Applies one key. Returns true when the box closes.
    pub fn press(&mut self, key: Key) -> bool {
        match key {
            Key::Down if self.has_more() => {
                self.page += 1;
                false
            }
            Key::Down => true,
            Key::Up => {
                self.page = self.page.saturating_sub(1);
                false
            }
            _ => false,
        }
    }

    pub fn step(&mut self, controls: &Controls) -> Flow {
        for key in &controls.pressed {
            if self.press(*key) {
                return Flow::Finished;
            }
        }
        Flow::Running
    }
}

#[derive(Component)]
struct DialogueRow(usize);

/// Builds the white-framed box along the bottom of the screen.
pub fn spawn_dialogue_view(commands: &mut Commands, fonts: &Fonts, profile: &Profile) {
    let u = |px: f32| Val::Px(profile.u(px));
    commands
        .spawn((
            BeatView,
            Node {
                position_type: PositionType::Absolute,
                left: u(50.0),
                top: Val::Px(profile.height() - profile.u(150.0)),
                width: Val::Px(profile.width() - profile.u(100.0)),
                height: u(100.0),
                padding: UiRect::all(u(10.0)),
                ..default()
            },
            BackgroundColor(Color::WHITE),
            GlobalZIndex(50),
        ))
        .with_children(|frame| {
            frame
                .spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        padding: UiRect::all(u(10.0)),
                        row_gap: u(10.0),
                        ..default()
                    },
                    BackgroundColor(Color::BLACK),
                ))
                .with_children(|inner| {
                    for row in 0..ROWS_PER_PAGE {
                        inner.spawn((
                            DialogueRow(row),
                            Text::new(""),
                            fonts.small(profile),
                            TextColor(Color::WHITE),
                        ));
                    }
                    inner.spawn((
                        Text::new(PAGE_MARKER),
                        fonts.small(profile),
                        TextColor(Color::WHITE),
                        Node {
                            position_type: PositionType::Absolute,
                            right: u(20.0),
                            bottom: u(5.0),
                            ..default()
                        },
                    ));
                });
        });
}

fn update_dialogue_text(director: Res<Director>, mut rows: Query<(&DialogueRow, &mut Text)>) {
    let Some(dialogue) = director.current().and_then(Beat::dialogue) else {
        return;
    };
    let page = dialogue.rows();
    for (row, mut text) in &mut rows {
        let wanted = page.get(row.0).map(String::as_str).unwrap_or("");
        if text.0 != wanted {
            text.0 = wanted.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let rows = wrap("Oh look at the time, it's nearly 7pm!", 12);
        assert_eq!(rows, vec!["Oh look at", "the time,", "it's nearly", "7pm!"]);
    }

    #[test]
    fn breaks_words_longer_than_a_row() {
        assert_eq!(wrap("BURRPPPP!!", 4), vec!["BURR", "PPPP", "!!"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn page_count_is_half_the_rows_rounded_up() {
        let line = "one two three four five six seven eight nine ten eleven";
        for columns in [3, 5, 8, 13, 60] {
            let rows = wrap(line, columns).len();
            let dialogue = DialogueBox::new(&[line], columns);
            assert_eq!(dialogue.page_count(), rows.div_ceil(2));
        }
    }

    #[test]
    fn lines_never_share_a_page() {
        let dialogue = DialogueBox::new(&["Is that Molly?", "Maybe I should go and ask?"], 44);
        assert_eq!(dialogue.page_count(), 2);
        assert_eq!(dialogue.rows(), ["Is that Molly?"]);
    }

    #[test]
    fn paging_keys() {
        let mut dialogue = DialogueBox::new(&["first", "second", "third"], 44);
        assert!(!dialogue.press(Key::Up));
        assert_eq!(dialogue.rows(), ["first"]);
        assert!(!dialogue.press(Key::Down));
        assert!(!dialogue.press(Key::Down));
        assert_eq!(dialogue.rows(), ["third"]);
        assert!(!dialogue.press(Key::Up));
        assert_eq!(dialogue.rows(), ["second"]);
        assert!(!dialogue.press(Key::Enter));
        assert!(!dialogue.press(Key::Down));
        assert!(dialogue.press(Key::Down));
    }

    #[test]
    fn step_stops_at_the_closing_key() {
        let mut dialogue = DialogueBox::new(&["only"], 44);
        let controls = Controls::press(&[Key::Space, Key::Down]);
        assert_eq!(dialogue.step(&controls), Flow::Finished);
    }

    #[test]
    fn desktop_fits_forty_four_columns() {
        assert_eq!(columns(&Profile::desktop()), 44);
    }

    #[test]
    fn box_shows_the_page_marker() {
        let mut app = App::new();
        app.add_systems(Update, |mut commands: Commands| {
            spawn_dialogue_view(&mut commands, &Fonts::default(), &Profile::desktop());
        });
        app.update();
        let world = app.world_mut();
        let texts: Vec<String> = world.query::<&Text>().iter(world).map(|text| text.0.clone()).collect();
        assert_eq!(texts.len(), ROWS_PER_PAGE + 1);
        assert!(texts.iter().any(|text| text == "▼"));
    }
}
