// Beat queue. Anything that takes over the screen or the keyboard for a while
// (dialogue, cards, fades, minigames) is a beat; scenes only run while the
// queue is empty.
use std::collections::VecDeque;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strum::IntoStaticStr;

use crate::assets::{Art, Fonts, Sprites};
use crate::cards::{self, Card, Picture, Shutter, Splash};
use crate::config::Profile;
use crate::dialogue::{self, DialogueBox};
use crate::input::Controls;
use crate::minigames::drinking::{self, DrinkingGame};
use crate::minigames::heart::{self, HeartGame};
use crate::minigames::stagger::StaggerGame;
use crate::particles::FireworksShow;
use crate::sections::{Scene, Stage};
use crate::transition::{self, Fade};

pub struct DirectorPlugin;

impl Plugin for DirectorPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameRng(StdRng::seed_from_u64(rand::random())))
            .add_systems(FixedUpdate, run_director.in_set(Directing))
            .add_systems(Update, (refresh_views, draw_fireworks).chain());
    }
}

/// Scene logic runs after this set so a beat queued by a scene is first
/// stepped on the following tick.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directing;

/// Shared random source for gameplay.
#[derive(Resource)]
pub struct GameRng(pub StdRng);

/// Marks entities that belong to the beat currently on screen.
#[derive(Component)]
pub struct BeatView;

#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Beat {
    Say(DialogueBox),
    Card(Card),
    Splash(Splash),
    Fade(Fade),
    Drinking(DrinkingGame),
    Stagger(StaggerGame),
    Heart(HeartGame),
    Shutter(Shutter),
    Picture(Picture),
    Fireworks(FireworksShow),
    /// Moves on to the next scene.
    Advance,
    Quit,
}

impl Beat {
    pub fn dialogue(&self) -> Option<&DialogueBox> {
        match self {
            Beat::Say(dialogue) => Some(dialogue),
            Beat::Picture(picture) => Some(&picture.dialogue),
            _ => None,
        }
    }
}

/// Result of stepping a beat for one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Running,
    Finished,
    /// Run this beat first, then come back.
    Interject(Beat),
    /// Finished; these beats follow immediately.
    Then(Vec<Beat>),
    Emit(Signal),
}

/// Requests that reach outside the director.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Advance,
    Quit,
}

/// What a beat may read and change while it runs.
pub struct Cue<'a> {
    pub stage: &'a mut Stage,
    pub controls: &'a Controls,
    pub profile: &'a Profile,
    pub rng: &'a mut StdRng,
    pub columns: usize,
}

impl Cue<'_> {
    pub fn say(&self, lines: &[&str]) -> Beat {
        Beat::Say(DialogueBox::new(lines, self.columns))
    }
}

#[derive(Resource, Debug)]
pub struct Director {
    queue: VecDeque<Beat>,
    serial: u64,
    columns: usize,
}

impl Director {
    pub fn new(columns: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            serial: 0,
            columns,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn current(&self) -> Option<&Beat> {
        self.queue.front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Changes whenever a different beat comes to the front.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn push(&mut self, beat: Beat) {
        if self.queue.is_empty() {
            self.serial += 1;
        }
        self.queue.push_back(beat);
    }

    pub fn say(&mut self, lines: &[&str]) {
        self.push(Beat::Say(DialogueBox::new(lines, self.columns)));
    }

    pub fn card(&mut self, card: Card) {
        self.push(Beat::Card(card));
    }

    pub fn picture(&mut self, art: Art, lines: &[&str]) {
        let dialogue = DialogueBox::new(lines, self.columns);
        self.push(Beat::Picture(Picture { art, dialogue }));
    }

    /// Fades to black and moves to the next scene.
    pub fn fade_out(&mut self) {
        self.push(Beat::Fade(Fade::default()));
        self.push(Beat::Advance);
    }

    fn finish(&mut self) {
        self.queue.pop_front();
        self.serial += 1;
    }

    fn interject(&mut self, beats: Vec<Beat>) {
        for beat in beats.into_iter().rev() {
            self.queue.push_front(beat);
        }
        self.serial += 1;
    }

    /// Steps the beat at the front of the queue.
    pub fn step(&mut self, cue: &mut Cue) -> Option<Signal> {
        let beat = self.queue.front_mut()?;
        let flow = match beat {
            Beat::Say(dialogue) => dialogue.step(cue.controls),
            Beat::Card(card) => card.step(cue.controls),
            Beat::Splash(splash) => splash.step(),
            Beat::Fade(fade) => fade.step(),
            Beat::Drinking(game) => game.step(cue),
            Beat::Stagger(game) => game.step(cue),
            Beat::Heart(game) => game.step(cue),
            Beat::Shutter(shutter) => shutter.step(cue.controls),
            Beat::Picture(picture) => picture.dialogue.step(cue.controls),
            Beat::Fireworks(show) => {
                if show.step(cue.profile, cue.rng) {
                    Flow::Finished
                } else {
                    Flow::Running
                }
            }
            Beat::Advance => Flow::Emit(Signal::Advance),
            Beat::Quit => Flow::Emit(Signal::Quit),
        };
        match flow {
            Flow::Running => None,
            Flow::Finished => {
                self.finish();
                None
            }
            Flow::Interject(beat) => {
                self.interject(vec![beat]);
                None
            }
            Flow::Then(beats) => {
                self.finish();
                self.interject(beats);
                None
            }
            Flow::Emit(signal) => {
                self.finish();
                Some(signal)
            }
        }
    }
}

/// Run condition for scene logic.
pub fn director_idle(director: Res<Director>) -> bool {
    director.is_idle()
}

fn run_director(
    mut director: ResMut<Director>,
    mut stage: ResMut<Stage>,
    mut controls: ResMut<Controls>,
    mut rng: ResMut<GameRng>,
    profile: Res<Profile>,
    scene: Res<State<Scene>>,
    mut next_scene: ResMut<NextState<Scene>>,
    mut exit: MessageWriter<AppExit>,
) {
    if director.is_idle() {
        return;
    }
    let columns = director.columns();
    let mut cue = Cue {
        stage: &mut stage,
        controls: &controls,
        profile: &profile,
        rng: &mut rng.0,
        columns,
    };
    let signal = director.step(&mut cue);
    // Modal beats swallow every key pressed while they are up.
    controls.consume();
    match signal {
        Some(Signal::Advance) => match scene.get().next() {
            Some(next) => {
                info!("{} -> {}", scene.get(), next);
                next_scene.set(next);
            }
            None => warn!("no scene after {}, staying put", scene.get()),
        },
        Some(Signal::Quit) => {
            info!("the end");
            exit.write(AppExit::Success);
        }
        None => {}
    }
}

/// Rebuilds the on-screen view whenever a new beat comes to the front.
pub fn refresh_views(
    mut commands: Commands,
    director: Res<Director>,
    mut shown: Local<Option<u64>>,
    views: Query<Entity, With<BeatView>>,
    scene: Res<State<Scene>>,
    fonts: Res<Fonts>,
    sprites: Res<Sprites>,
    profile: Res<Profile>,
) {
    if *shown == Some(director.serial()) {
        return;
    }
    *shown = Some(director.serial());
    // A fade darkens whatever was last on screen.
    let fading = matches!(director.current(), Some(Beat::Fade(_)));
    if !fading {
        for entity in &views {
            commands.entity(entity).despawn();
        }
    }
    let Some(beat) = director.current() else {
        return;
    };
    let name: &'static str = beat.into();
    debug!("beat: {name}");
    match beat {
        Beat::Say(_) => dialogue::spawn_dialogue_view(&mut commands, &fonts, &profile),
        Beat::Card(card) => cards::spawn_card_view(&mut commands, &fonts, &profile, card),
        Beat::Splash(_) => cards::spawn_splash_view(&mut commands, &sprites),
        Beat::Fade(_) => transition::spawn_curtain(&mut commands, *scene.get()),
        Beat::Drinking(_) => drinking::spawn_drinking_view(&mut commands, &fonts, &sprites, &profile),
        Beat::Heart(_) => heart::spawn_heart_view(&mut commands, &sprites, &profile),
        Beat::Shutter(_) => cards::spawn_shutter_view(&mut commands, &fonts, &profile),
        Beat::Picture(picture) => {
            cards::spawn_picture_view(&mut commands, &sprites, &profile, picture.art);
            dialogue::spawn_dialogue_view(&mut commands, &fonts, &profile);
        }
        Beat::Fireworks(_) => cards::spawn_night_sky(&mut commands, &profile),
        Beat::Stagger(_) | Beat::Advance | Beat::Quit => {}
    }
}

fn draw_fireworks(mut gizmos: Gizmos, director: Res<Director>, profile: Res<Profile>) {
    if let Some(Beat::Fireworks(show)) = director.current() {
        show.draw(&mut gizmos, &profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    fn step_with(director: &mut Director, stage: &mut Stage, keys: &[Key]) -> Option<Signal> {
        let profile = Profile::desktop();
        let controls = Controls::press(keys);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cue = Cue {
            stage,
            controls: &controls,
            profile: &profile,
            rng: &mut rng,
            columns: 44,
        };
        director.step(&mut cue)
    }

    #[test]
    fn beats_run_in_order() {
        let mut stage = Stage::new(&Profile::desktop());
        let mut director = Director::new(44);
        director.say(&["one"]);
        director.say(&["two"]);
        director.push(Beat::Advance);
        assert_eq!(step_with(&mut director, &mut stage, &[]), None);
        assert_eq!(director.len(), 3);
        assert_eq!(step_with(&mut director, &mut stage, &[Key::Down]), None);
        assert_eq!(
            director.current().and_then(Beat::dialogue).map(|d| d.rows().to_vec()),
            Some(vec!["two".to_string()])
        );
        step_with(&mut director, &mut stage, &[Key::Down]);
        assert_eq!(step_with(&mut director, &mut stage, &[]), Some(Signal::Advance));
        assert!(director.is_idle());
    }

    #[test]
    fn serial_changes_with_the_front_beat() {
        let mut stage = Stage::new(&Profile::desktop());
        let mut director = Director::new(44);
        let start = director.serial();
        director.say(&["one"]);
        let first = director.serial();
        assert_ne!(first, start);
        director.say(&["two"]);
        assert_eq!(director.serial(), first);
        step_with(&mut director, &mut stage, &[Key::Up]);
        assert_eq!(director.serial(), first);
        step_with(&mut director, &mut stage, &[Key::Down]);
        assert_ne!(director.serial(), first);
    }

    #[test]
    fn fade_out_ends_in_advance() {
        let mut stage = Stage::new(&Profile::desktop());
        let mut director = Director::new(44);
        director.fade_out();
        let mut signal = None;
        for _ in 0..100 {
            signal = step_with(&mut director, &mut stage, &[]);
            if signal.is_some() {
                break;
            }
        }
        assert_eq!(signal, Some(Signal::Advance));
        assert!(director.is_idle());
    }

    fn headless(beats: Vec<Beat>) -> App {
        let profile = Profile::desktop();
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::state::app::StatesPlugin))
            .init_state::<Scene>()
            .init_resource::<Controls>()
            .init_resource::<Fonts>()
            .init_resource::<Sprites>()
            .insert_resource(GameRng(StdRng::seed_from_u64(3)))
            .insert_resource(Stage::new(&profile))
            .insert_resource(profile)
            .add_systems(Update, run_director);
        let mut director = Director::new(44);
        for beat in beats {
            director.push(beat);
        }
        app.insert_resource(director);
        app
    }

    #[test]
    fn advance_moves_to_the_next_scene() {
        let mut app = headless(vec![Beat::Advance]);
        app.update();
        app.update();
        let scene = app.world().resource::<State<Scene>>();
        assert_eq!(*scene.get(), Scene::Cycling);
        assert!(app.world().resource::<Director>().is_idle());
    }

    #[test]
    fn quit_exits_the_app() {
        let mut app = headless(vec![Beat::Quit]);
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }

    #[test]
    fn fade_darkens_the_card_it_follows() {
        let card = Card::new(&["Press ENTER to continue"], cards::Until::Ticks(1))
            .with_heading("You made it to the pub!");
        let mut app = headless(vec![Beat::Card(card), Beat::Fade(Fade::default())]);
        app.add_systems(
            Update,
            (refresh_views, transition::fade_curtain).chain().after(run_director),
        );
        for _ in 0..3 {
            app.update();
        }
        assert!(matches!(app.world().resource::<Director>().current(), Some(Beat::Fade(_))));

        let world = app.world_mut();
        let headings = world
            .query::<&Text>()
            .iter(world)
            .filter(|text| text.0 == "You made it to the pub!")
            .count();
        assert_eq!(headings, 1);
        let alpha = world
            .query_filtered::<&BackgroundColor, With<transition::Curtain>>()
            .single(world)
            .map(|background| background.0.alpha());
        assert!(matches!(alpha, Ok(alpha) if alpha > 0.0 && alpha < 1.0));
    }
}
