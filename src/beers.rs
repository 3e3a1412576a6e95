// The five pints on the pub table.
use bevy::prelude::*;
use rand::Rng;

use crate::config::Profile;
use crate::director::GameRng;
use crate::particles::{BUBBLE_MARGIN, Bubble, step_bubbles};
use crate::sections::{Scene, Stage};
use crate::stage::{Placed, Staging};

pub struct BeersPlugin;

impl Plugin for BeersPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Scene::Table), spawn_glasses)
            .add_systems(FixedUpdate, fizz.run_if(in_state(Scene::Table)))
            .add_systems(
                Update,
                (sync_glasses.in_set(Staging), draw_bubbles).run_if(in_state(Scene::Table)),
            );
    }
}

pub const BEER_COUNT: usize = 5;

const ORANGE: Color = Color::srgb(1.0, 165.0 / 255.0, 0.0);
const GLASS: Color = Color::srgb(0.25, 0.25, 0.25);

/// How much is left in a glass. Only ever moves toward `Empty`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    #[default]
    Full,
    TwoThirds,
    OneThird,
    Empty,
}

impl Level {
    pub fn sipped(self) -> Self {
        match self {
            Level::Full => Level::TwoThirds,
            Level::TwoThirds => Level::OneThird,
            Level::OneThird | Level::Empty => Level::Empty,
        }
    }

    pub fn fill(self) -> f32 {
        match self {
            Level::Full => 1.0,
            Level::TwoThirds => 2.0 / 3.0,
            Level::OneThird => 1.0 / 3.0,
            Level::Empty => 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Beers {
    levels: [Level; BEER_COUNT],
    bubbles: [Vec<Bubble>; BEER_COUNT],
}

impl Beers {
    pub fn level(&self, index: usize) -> Level {
        self.levels.get(index).copied().unwrap_or(Level::Empty)
    }

    pub fn bubbles(&self, index: usize) -> &[Bubble] {
        self.bubbles.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Takes one sip from a glass and returns its new level.
    pub fn sip(&mut self, index: usize) -> Level {
        let Some(level) = self.levels.get_mut(index) else {
            return Level::Empty;
        };
        *level = level.sipped();
        if *level == Level::Empty {
            self.bubbles[index].clear();
        }
        *level
    }

    pub fn empty_all(&mut self) {
        self.levels = [Level::Empty; BEER_COUNT];
        self.bubbles.iter_mut().for_each(Vec::clear);
    }

    pub fn all_empty(&self) -> bool {
        self.levels.iter().all(|level| *level == Level::Empty)
    }

    /// The first glass that still has beer in it.
    pub fn current(&self) -> Option<usize> {
        self.levels.iter().position(|level| *level != Level::Empty)
    }

    pub fn fizz(&mut self, glasses: &[Rect; BEER_COUNT], profile: &Profile, rng: &mut impl Rng) {
        for (index, glass) in glasses.iter().enumerate() {
            match liquid(*glass, self.levels[index], profile) {
                Some(liquid) => step_bubbles(
                    &mut self.bubbles[index],
                    *glass,
                    liquid,
                    profile.u(BUBBLE_MARGIN),
                    rng,
                ),
                None => self.bubbles[index].clear(),
            }
        }
    }
}

/// Table in the middle of the pub.
pub fn table_rect(profile: &Profile) -> Rect {
    Rect::from_center_size(
        profile.screen / 2.0,
        Vec2::new(profile.u(200.0), profile.u(100.0)),
    )
}

/// The glasses standing along the back edge of the table.
pub fn glasses(table: Rect, profile: &Profile) -> [Rect; BEER_COUNT] {
    std::array::from_fn(|index| {
        let min = Vec2::new(
            table.min.x + profile.u(40.0 + 30.0 * index as f32),
            table.min.y - profile.u(22.0),
        );
        Rect::from_corners(min, min + Vec2::new(profile.u(20.0), profile.u(50.0)))
    })
}

/// The orange part of a glass, inset from its walls.
pub fn liquid(glass: Rect, level: Level, profile: &Profile) -> Option<Rect> {
    if level == Level::Empty {
        return None;
    }
    let inset = profile.u(2.0);
    let top = glass.max.y - glass.height() * level.fill();
    Some(Rect::new(
        glass.min.x + inset,
        top.max(glass.min.y + inset),
        glass.max.x - inset,
        glass.max.y - inset,
    ))
}

#[derive(Component)]
struct Glass;

#[derive(Component)]
struct Liquid(usize);

#[derive(Component)]
struct Foam(usize);

fn spawn_glasses(mut commands: Commands, profile: Res<Profile>) {
    let table = table_rect(&profile);
    for (index, glass) in glasses(table, &profile).into_iter().enumerate() {
        commands.spawn((
            Glass,
            Sprite::from_color(GLASS, glass.size()),
            Placed::from_rect(glass, 2.0),
            DespawnOnExit(Scene::Table),
        ));
        commands.spawn((
            Liquid(index),
            Sprite::from_color(ORANGE, Vec2::ONE),
            Placed::from_rect(glass, 2.1),
            DespawnOnExit(Scene::Table),
        ));
        commands.spawn((
            Foam(index),
            Sprite::from_color(Color::WHITE, Vec2::ONE),
            Placed::from_rect(glass, 2.2),
            DespawnOnExit(Scene::Table),
        ));
    }
}

fn fizz(mut stage: ResMut<Stage>, profile: Res<Profile>, mut rng: ResMut<GameRng>) {
    let glasses = glasses(table_rect(&profile), &profile);
    stage.beers.fizz(&glasses, &profile, &mut rng.0);
}

fn sync_glasses(
    stage: Res<Stage>,
    profile: Res<Profile>,
    mut liquids: Query<(&Liquid, &mut Sprite, &mut Placed, &mut Visibility), Without<Foam>>,
    mut foams: Query<(&Foam, &mut Sprite, &mut Placed, &mut Visibility), Without<Liquid>>,
) {
    let glasses = glasses(table_rect(&profile), &profile);
    let inset = profile.u(2.0);
    for (liquid_of, mut sprite, mut placed, mut visibility) in &mut liquids {
        let index = liquid_of.0;
        match liquid(glasses[index], stage.beers.level(index), &profile) {
            Some(rect) => {
                sprite.custom_size = Some(rect.size());
                *placed = Placed::from_rect(rect, placed.z);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
    for (foam_of, mut sprite, mut placed, mut visibility) in &mut foams {
        let index = foam_of.0;
        match liquid(glasses[index], stage.beers.level(index), &profile) {
            Some(rect) => {
                let size = Vec2::new(rect.width(), profile.u(5.0));
                let top = (rect.min.y - profile.u(3.0)).max(glasses[index].min.y + inset);
                sprite.custom_size = Some(size);
                *placed = Placed::new(Vec2::new(rect.min.x, top), size, placed.z);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn draw_bubbles(mut gizmos: Gizmos, stage: Res<Stage>, profile: Res<Profile>) {
    for index in 0..BEER_COUNT {
        for bubble in stage.beers.bubbles(index) {
            gizmos.circle_2d(
                profile.point_to_world(bubble.position),
                profile.bubble_radius,
                Color::WHITE,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sips_only_move_forward() {
        let mut beers = Beers::default();
        let mut previous = beers.level(0);
        for _ in 0..6 {
            let level = beers.sip(0);
            assert!(level >= previous);
            previous = level;
        }
        assert_eq!(previous, Level::Empty);
        assert_eq!(beers.current(), Some(1));
    }

    #[test]
    fn three_sips_empty_a_glass() {
        let mut beers = Beers::default();
        assert_eq!(beers.sip(2), Level::TwoThirds);
        assert_eq!(beers.sip(2), Level::OneThird);
        assert_eq!(beers.sip(2), Level::Empty);
        assert_eq!(beers.level(0), Level::Full);
    }

    #[test]
    fn empty_glasses_never_fizz() {
        let profile = Profile::desktop();
        let glasses = glasses(table_rect(&profile), &profile);
        let mut rng = StdRng::seed_from_u64(5);
        let mut beers = Beers::default();
        let mut fizzed = false;
        for _ in 0..100 {
            beers.fizz(&glasses, &profile, &mut rng);
            fizzed |= !beers.bubbles(0).is_empty();
        }
        assert!(fizzed);
        beers.empty_all();
        beers.fizz(&glasses, &profile, &mut rng);
        assert!(beers.all_empty());
        assert!((0..BEER_COUNT).all(|index| beers.bubbles(index).is_empty()));
    }

    #[test]
    fn glasses_line_the_back_of_the_table() {
        let profile = Profile::desktop();
        let table = table_rect(&profile);
        assert_eq!(table.min, Vec2::new(300.0, 250.0));
        let glasses = glasses(table, &profile);
        assert_eq!(glasses[0].min, Vec2::new(340.0, 228.0));
        assert_eq!(glasses[4].min, Vec2::new(460.0, 228.0));
        assert_eq!(glasses[4].size(), Vec2::new(20.0, 50.0));
        let two_thirds = liquid(glasses[0], Level::TwoThirds, &profile).unwrap();
        assert!((two_thirds.min.y - (278.0 - 50.0 * 2.0 / 3.0)).abs() < 1e-3);
    }
}
