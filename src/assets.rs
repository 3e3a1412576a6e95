// Named images and the text font, loaded once at startup.
use std::collections::HashMap;

use bevy::prelude::*;
use strum::{EnumIter, IntoEnumIterator};

use crate::animation::GifFrames;
use crate::config::Profile;
use crate::stage::{Placed, Staging};

pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, (load_sprites, load_fonts))
            .add_systems(Update, fit_to_height.in_set(Staging));
    }
}

const FONT_PATH: &str = "fonts/Monospace.ttf";
/// The pub's animated sign.
const SPLASH_PATH: &str = "GIFs/LHA.gif";

/// Every image the game shows, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Art {
    Sam,
    Molly,
    Bike,
    Pub,
    Bar,
    Table,
    Door,
    House,
    Maggie,
    Mike,
    Sofa,
    Heart,
    Snapshot,
    Us,
}

/// How an image is scaled for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fit {
    Exact(Vec2),
    /// Scale to this height, keeping the image's aspect ratio.
    Height(f32),
    Natural,
}

impl Art {
    pub fn path(self) -> &'static str {
        match self {
            Art::Sam => "sprites/sam_sprite.png",
            Art::Molly => "sprites/molly_sprite.png",
            Art::Bike => "sprites/bike.png",
            Art::Pub => "sprites/LHA.png",
            Art::Bar => "sprites/bar.png",
            Art::Table => "sprites/table.png",
            Art::Door => "sprites/door.png",
            Art::House => "sprites/house.png",
            Art::Maggie => "sprites/mag.png",
            Art::Mike => "sprites/mike.png",
            Art::Sofa => "sprites/sofa.png",
            Art::Heart => "sprites/heart.png",
            Art::Snapshot => "pictures/snapshot.png",
            Art::Us => "pictures/us.png",
        }
    }

    pub fn fit(self, profile: &Profile) -> Fit {
        let px = |w: f32, h: f32| Fit::Exact(Vec2::new(profile.u(w), profile.u(h)));
        match self {
            Art::Sam | Art::Molly | Art::Maggie | Art::Mike => Fit::Exact(profile.sprite),
            Art::Bike => Fit::Height(profile.sprite.y),
            Art::Pub | Art::Bar => px(150.0, 150.0),
            Art::Table | Art::Sofa => px(200.0, 100.0),
            Art::Door => px(100.0, 100.0),
            Art::House => px(200.0, 150.0),
            Art::Heart => Fit::Exact(profile.heart.size),
            Art::Snapshot | Art::Us => Fit::Natural,
        }
    }
}

/// Lookup table of loaded images and their display sizes.
#[derive(Resource, Default)]
pub struct Sprites {
    entries: HashMap<Art, (Handle<Image>, Fit)>,
    splash: Handle<GifFrames>,
}

impl Sprites {
    pub fn splash(&self) -> Handle<GifFrames> {
        self.splash.clone()
    }

    pub fn handle(&self, art: Art) -> Handle<Image> {
        self.entries
            .get(&art)
            .map(|(handle, _)| handle.clone())
            .unwrap_or_default()
    }

    /// A ready-to-spawn sprite scaled according to its fit.
    pub fn sprite(&self, art: Art) -> (Sprite, Fitted) {
        let fit = self
            .entries
            .get(&art)
            .map(|(_, fit)| *fit)
            .unwrap_or(Fit::Natural);
        let sprite = Sprite {
            image: self.handle(art),
            custom_size: match fit {
                Fit::Exact(size) => Some(size),
                _ => None,
            },
            ..default()
        };
        (sprite, Fitted(fit))
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Fitted(pub Fit);

/// The text font, or the engine default when the bundled file is missing.
#[derive(Resource, Clone, Default)]
pub struct Fonts {
    pub text: Handle<Font>,
}

impl Fonts {
    pub fn small(&self, profile: &Profile) -> TextFont {
        self.sized(profile.font_small)
    }

    pub fn large(&self, profile: &Profile) -> TextFont {
        self.sized(profile.font_large)
    }

    pub fn sized(&self, font_size: f32) -> TextFont {
        TextFont {
            font: self.text.clone(),
            font_size,
            ..default()
        }
    }
}

fn load_sprites(mut commands: Commands, asset_server: Res<AssetServer>, profile: Res<Profile>) {
    info!(
        "{} profile, {}x{}",
        profile.name, profile.screen.x, profile.screen.y
    );
    let entries = Art::iter()
        .map(|art| (art, (asset_server.load(art.path()), art.fit(&profile))))
        .collect();
    commands.insert_resource(Sprites {
        entries,
        splash: asset_server.load(SPLASH_PATH),
    });
}

fn load_fonts(mut commands: Commands, asset_server: Res<AssetServer>) {
    let text = if bundled_font_exists() {
        asset_server.load(FONT_PATH)
    } else {
        warn!("{FONT_PATH} not found, falling back to the default font");
        Handle::default()
    };
    commands.insert_resource(Fonts { text });
}

#[cfg(not(target_arch = "wasm32"))]
fn bundled_font_exists() -> bool {
    bevy::asset::io::file::FileAssetReader::get_base_path()
        .join("assets")
        .join(FONT_PATH)
        .exists()
}

#[cfg(target_arch = "wasm32")]
fn bundled_font_exists() -> bool {
    true
}

// Height-fitted images only know their width once the file has loaded.
fn fit_to_height(
    images: Res<Assets<Image>>,
    mut query: Query<(&mut Sprite, &Fitted, Option<&mut Placed>)>,
) {
    for (mut sprite, fitted, placed) in &mut query {
        let Fit::Height(height) = fitted.0 else {
            continue;
        };
        if sprite.custom_size.is_some() {
            continue;
        }
        let Some(image) = images.get(&sprite.image) else {
            continue;
        };
        let natural = image.size_f32();
        if natural.y <= 0.0 {
            continue;
        }
        let size = Vec2::new(height * natural.x / natural.y, height);
        sprite.custom_size = Some(size);
        if let Some(mut placed) = placed {
            placed.size = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_art_has_a_distinct_path() {
        let mut paths: Vec<&str> = Art::iter().map(Art::path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Art::iter().count());
    }

    #[test]
    fn layout_sizes_scale_with_profile() {
        let desktop = Profile::desktop();
        let handheld = Profile::handheld();
        assert_eq!(Art::Door.fit(&desktop), Fit::Exact(Vec2::splat(100.0)));
        assert_eq!(Art::Sam.fit(&handheld), Fit::Exact(handheld.sprite));
        assert_eq!(Art::Bike.fit(&desktop), Fit::Height(desktop.sprite.y));
    }
}
