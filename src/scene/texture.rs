use crate::core::error::{ImageDecodeError, ImportError};
use log::{debug, error, info};
use nalgebra::Vector4;
use std::path::{Path, PathBuf};

/// Raw pixel data returned by an [`ImageDecoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Interleaved channels per pixel as stored in the file.
    pub channels: u8,
    /// Row-major, first row first, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
}

/// External image-decoding service.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ImageDecodeError>;
}

/// Upload format chosen from the decoded channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    R,
    Rg,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Self::R),
            2 => Some(Self::Rg),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            Self::R => 1,
            Self::Rg => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    /// Used for alpha textures: cutouts must not bleed in from the opposite edge.
    ClampToEdge,
}

/// Opaque texture handle. `0` is the unbound texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub const UNBOUND: Self = Self(0);

    pub fn id(self) -> u32 {
        self.0
    }

    pub fn is_bound(self) -> bool {
        self.0 != 0
    }
}

/// Semantic role of a texture on a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Sampler name prefix used by the scene shader (`texture_diffuse1`, ...).
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            Self::Diffuse => "texture_diffuse",
            Self::Specular => "texture_specular",
            Self::Normal => "texture_normal",
            Self::Height => "texture_height",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureRef {
    pub handle: TextureHandle,
    pub kind: TextureKind,
    /// Path exactly as the material spelled it; the de-duplication key.
    pub path: String,
}

/// A decoded 2D texture with its sampling state.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub wrap: WrapMode,
    pixels: Vec<u8>,
}

impl Texture {
    /// Chooses format and wrap mode for a decoded image.
    pub fn from_decoded(image: DecodedImage, path: &Path) -> Result<Self, ImportError> {
        let format = PixelFormat::from_channels(image.channels).ok_or_else(|| {
            ImportError::InvalidImageFormat {
                path: path.to_path_buf(),
                channels: image.channels,
            }
        })?;

        let wrap = if format == PixelFormat::Rgba {
            debug!("Alpha texture {:?} uses clamp-to-edge wrapping", path);
            WrapMode::ClampToEdge
        } else {
            WrapMode::Repeat
        };

        Ok(Self {
            width: image.width,
            height: image.height,
            format,
            wrap,
            pixels: image.pixels,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bilinear sample at `(u, v)`; `v = 0` is the first image row.
    ///
    /// Missing channels read as 0 (alpha as 1), matching how the GPU expands
    /// R and RG formats.
    pub fn sample(&self, u: f32, v: f32) -> Vector4<f32> {
        if self.width == 0 || self.height == 0 {
            return Vector4::new(0.0, 0.0, 0.0, 1.0);
        }

        // Pixel centers sit at +0.5.
        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;

        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let wx = x - x.floor();
        let wy = y - y.floor();

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0 + 1, y0);
        let c01 = self.texel(x0, y0 + 1);
        let c11 = self.texel(x0 + 1, y0 + 1);

        let top = c00 * (1.0 - wx) + c10 * wx;
        let bottom = c01 * (1.0 - wx) + c11 * wx;
        top * (1.0 - wy) + bottom * wy
    }

    fn texel(&self, x: i64, y: i64) -> Vector4<f32> {
        let w = self.width as i64;
        let h = self.height as i64;
        let (x, y) = match self.wrap {
            WrapMode::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
            WrapMode::ClampToEdge => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
        };

        let channels = self.format.channels();
        let idx = (y * w + x) as usize * channels;
        let mut out = Vector4::new(0.0, 0.0, 0.0, 1.0);
        for c in 0..channels {
            out[c] = self.pixels.get(idx + c).copied().unwrap_or(0) as f32 / 255.0;
        }
        out
    }
}

/// Owns decoded textures and hands out handles to them.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: Vec<Texture>,
}

impl TextureStore {
    pub fn insert(&mut self, texture: Texture) -> TextureHandle {
        self.textures.push(texture);
        TextureHandle(self.textures.len() as u32)
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&Texture> {
        if !handle.is_bound() {
            return None;
        }
        self.textures.get(handle.0 as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Per-model texture cache keyed by the material's path string.
#[derive(Debug, Default)]
pub struct TextureCache {
    loaded: Vec<TextureRef>,
    store: TextureStore,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached texture for `path`, decoding it on first use.
    ///
    /// A failed decode is logged and cached as [`TextureHandle::UNBOUND`].
    pub fn get_or_load(
        &mut self,
        path: &str,
        kind: TextureKind,
        directory: &Path,
        decoder: &dyn ImageDecoder,
    ) -> Result<TextureRef, ImportError> {
        if let Some(cached) = self.loaded.iter().find(|t| t.path == path) {
            return Ok(TextureRef {
                handle: cached.handle,
                kind,
                path: cached.path.clone(),
            });
        }

        let file = resolve_texture_path(directory, path);
        let handle = match decoder.decode(&file) {
            Ok(image) => {
                let texture = Texture::from_decoded(image, &file)?;
                info!(
                    "Loaded texture: {:?} ({}x{}, {:?})",
                    file, texture.width, texture.height, texture.format
                );
                self.store.insert(texture)
            }
            Err(e) => {
                error!("Texture failed to load at path '{}': {}", path, e);
                TextureHandle::UNBOUND
            }
        };

        let texture_ref = TextureRef {
            handle,
            kind,
            path: path.to_string(),
        };
        self.loaded.push(texture_ref.clone());
        Ok(texture_ref)
    }

    pub fn loaded(&self) -> &[TextureRef] {
        &self.loaded
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.store.get(handle)
    }

    pub fn store(&self) -> &TextureStore {
        &self.store
    }
}

/// Joins a material texture path onto the model directory.
/// Backslash separators written by Windows exporters are normalised.
pub fn resolve_texture_path(directory: &Path, raw: &str) -> PathBuf {
    let normalised: String = raw
        .chars()
        .map(|c| if c == '\\' { std::path::MAIN_SEPARATOR } else { c })
        .collect();
    directory.join(normalised)
}
