use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, ImageBuffer, ImageError, Rgba, RgbaImage};
use rust_webar_api::{ARCapturedImage, ARInterfaceOrientation};
use thiserror::Error;

pub const DEFAULT_IMAGE_SCALE: f32 = 0.25;
pub const DEFAULT_IMAGE_QUALITY: u8 = 50;

#[derive(Debug, Error)]
pub enum ImageEncodeError {
    #[error("pixel buffer holds {actual} bytes, a {width}x{height} RGBA image needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("JPEG encoding failed")]
    Image(#[from] ImageError),
}

/// Turns the captured camera image into the `image` field of a frame:
/// downscaled, rotated upright for the interface orientation, JPEG, base64.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ARImageEncoder {
    scale: f32,
    quality: u8,
}

impl Default for ARImageEncoder {
    fn default() -> ARImageEncoder {
        ARImageEncoder::new(DEFAULT_IMAGE_SCALE, DEFAULT_IMAGE_QUALITY)
    }
}

impl ARImageEncoder {
    /// `scale` outside (0, 1] falls back to the default; quality is clamped
    /// to 1..=100.
    pub fn new(scale: f32, quality: u8) -> ARImageEncoder {
        let scale = if scale > 0.0 && scale <= 1.0 {
            scale
        } else {
            warn!("Ignoring image scale {}, using {}", scale, DEFAULT_IMAGE_SCALE);
            DEFAULT_IMAGE_SCALE
        };
        ARImageEncoder {
            scale: scale,
            quality: quality.max(1).min(100),
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn encode(&self, image: &ARCapturedImage, orientation: ARInterfaceOrientation) -> Result<String, ImageEncodeError> {
        let expected = image.width as usize * image.height as usize * 4;
        let source = ImageBuffer::<Rgba<u8>, &[u8]>::from_raw(image.width, image.height, &image.pixels[..])
            .filter(|_| image.pixels.len() == expected)
            .ok_or(ImageEncodeError::BufferSize {
                width: image.width,
                height: image.height,
                expected: expected,
                actual: image.pixels.len(),
            })?;

        let width = scaled(image.width, self.scale);
        let height = scaled(image.height, self.scale);
        let resized = imageops::resize(&source, width, height, FilterType::Triangle);
        let upright = rotate(resized, orientation);

        let rgb = DynamicImage::ImageRgba8(upright).to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality)
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
        Ok(STANDARD.encode(&bytes))
    }
}

fn scaled(size: u32, scale: f32) -> u32 {
    ((size as f32 * scale).round() as u32).max(1)
}

// The sensor delivers landscape right images
fn rotate(image: RgbaImage, orientation: ARInterfaceOrientation) -> RgbaImage {
    match orientation {
        ARInterfaceOrientation::Portrait => imageops::rotate90(&image),
        ARInterfaceOrientation::LandscapeLeft => imageops::rotate180(&image),
        ARInterfaceOrientation::LandscapeRight |
        ARInterfaceOrientation::PortraitUpsideDown => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat};

    fn captured(width: u32, height: u32) -> ARCapturedImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 8) as u8, (y * 8) as u8, 128, 255]);
            }
        }
        ARCapturedImage {
            width: width,
            height: height,
            pixels: pixels,
        }
    }

    fn decode(encoded: &str) -> DynamicImage {
        let bytes = STANDARD.decode(encoded).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap()
    }

    #[test]
    fn landscape_is_only_scaled() {
        let encoder = ARImageEncoder::new(0.5, 50);
        let encoded = encoder.encode(&captured(16, 8), ARInterfaceOrientation::LandscapeRight).unwrap();
        assert_eq!(decode(&encoded).dimensions(), (8, 4));
    }

    #[test]
    fn portrait_is_rotated() {
        let encoder = ARImageEncoder::new(0.5, 50);
        let encoded = encoder.encode(&captured(16, 8), ARInterfaceOrientation::Portrait).unwrap();
        assert_eq!(decode(&encoded).dimensions(), (4, 8));
    }

    #[test]
    fn default_scale_is_a_quarter() {
        let encoded = ARImageEncoder::default().encode(&captured(32, 16), ARInterfaceOrientation::LandscapeLeft).unwrap();
        assert_eq!(decode(&encoded).dimensions(), (8, 4));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut image = captured(4, 4);
        image.pixels.truncate(10);
        match ARImageEncoder::default().encode(&image, ARInterfaceOrientation::Portrait) {
            Err(ImageEncodeError::BufferSize { expected: 64, actual: 10, .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn long_buffer_is_rejected() {
        let mut image = captured(4, 4);
        image.pixels.push(0);
        assert!(ARImageEncoder::default().encode(&image, ARInterfaceOrientation::Portrait).is_err());
    }

    #[test]
    fn invalid_settings_fall_back() {
        let encoder = ARImageEncoder::new(0.0, 0);
        assert_eq!(encoder.scale(), DEFAULT_IMAGE_SCALE);
        assert_eq!(encoder.quality(), 1);
    }
}
