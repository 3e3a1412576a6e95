// Animated GIFs, decoded up front into one texture per frame.
use std::io::Cursor;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext, RenderAssetUsages};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};
use thiserror::Error;

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<GifFrames>().init_asset_loader::<GifLoader>();
    }
}

/// Frames that carry no delay are held this long.
pub const DEFAULT_FRAME_MS: u32 = 400;

#[derive(Asset, TypePath, Debug)]
pub struct GifFrames {
    pub frames: Vec<Handle<Image>>,
    /// Display time of each frame in milliseconds.
    pub delays: Vec<u32>,
}

impl GifFrames {
    /// The frame showing `elapsed_ms` into the animation, looping.
    pub fn frame_at(&self, elapsed_ms: u32) -> Option<&Handle<Image>> {
        self.frames.get(frame_index(&self.delays, elapsed_ms))
    }
}

pub fn frame_index(delays: &[u32], elapsed_ms: u32) -> usize {
    let cycle: u32 = delays.iter().sum();
    if cycle == 0 {
        return 0;
    }
    let mut left = elapsed_ms % cycle;
    for (index, delay) in delays.iter().enumerate() {
        if left < *delay {
            return index;
        }
        left -= delay;
    }
    0
}

#[derive(Debug, Error)]
pub enum GifError {
    #[error("could not read gif: {0}")]
    Io(#[from] std::io::Error),
    #[error("gif decode error: {0}")]
    Decode(#[from] image::ImageError),
}

/// Every frame composited to full size, with its delay in milliseconds.
pub fn decode_frames(bytes: &[u8]) -> Result<Vec<(RgbaImage, u32)>, GifError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let frames = decoder.into_frames().collect_frames()?;
    Ok(frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay = if numer == 0 || denom == 0 {
                DEFAULT_FRAME_MS
            } else {
                numer / denom
            };
            (frame.into_buffer(), delay)
        })
        .collect())
}

fn to_image(frame: RgbaImage) -> Image {
    let size = Extent3d {
        width: frame.width(),
        height: frame.height(),
        depth_or_array_layers: 1,
    };
    Image::new(
        size,
        TextureDimension::D2,
        frame.into_raw(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[derive(Default, TypePath)]
pub struct GifLoader;

impl AssetLoader for GifLoader {
    type Asset = GifFrames;
    type Settings = ();
    type Error = GifError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<GifFrames, GifError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let mut frames = Vec::new();
        let mut delays = Vec::new();
        for (index, (frame, delay)) in decode_frames(&bytes)?.into_iter().enumerate() {
            frames.push(load_context.add_labeled_asset(format!("frame{index}"), to_image(frame)));
            delays.push(delay);
        }
        debug!("decoded {} gif frames", frames.len());
        Ok(GifFrames { frames, delays })
    }

    fn extensions(&self) -> &[&str] {
        &["gif"]
    }
}
