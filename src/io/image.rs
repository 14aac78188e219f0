use crate::core::error::ImageDecodeError;
use crate::scene::texture::{DecodedImage, ImageDecoder};
use image::DynamicImage;
use std::path::Path;

/// Decodes textures with the `image` crate, keeping the file's own channel
/// layout. 16-bit and float images are narrowed to 8 bits per channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ImageDecodeError> {
        if !path.exists() {
            return Err(ImageDecodeError::NotFound(path.to_path_buf()));
        }

        let img = image::open(path).map_err(|e| ImageDecodeError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(to_decoded(img))
    }
}

fn to_decoded(img: DynamicImage) -> DecodedImage {
    let (width, height) = (img.width(), img.height());
    let (channels, pixels) = match img.color().channel_count() {
        1 => (1, img.into_luma8().into_raw()),
        2 => (2, img.into_luma_alpha8().into_raw()),
        3 => (3, img.into_rgb8().into_raw()),
        _ => (4, img.into_rgba8().into_raw()),
    };

    DecodedImage {
        width,
        height,
        channels,
        pixels,
    }
}
