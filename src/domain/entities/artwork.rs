//! Domain types for game artwork (thumbnails and screenshots).

use std::sync::Arc;

use image::DynamicImage;
use image::metadata::Orientation;

/// Cache key for a decoded image.
///
/// Keys compare by exact URL string; no trimming or case folding is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Creates a key from a URL string.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the URL string backing this key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A fully decoded image together with its display metadata.
///
/// Values are shared behind `Arc` and never mutated once built.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: DynamicImage,
    orientation: Orientation,
    scale: f32,
}

impl DecodedImage {
    /// Wraps decoded pixels with no rotation and a scale of 1.0.
    #[must_use]
    pub const fn new(pixels: DynamicImage) -> Self {
        Self {
            pixels,
            orientation: Orientation::NoTransforms,
            scale: 1.0,
        }
    }

    /// Sets the orientation reported by the decoder.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the pixel scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the raw pixels.
    #[must_use]
    pub const fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    /// Returns the orientation metadata.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the pixel scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Size of the decoded pixel buffer in bytes.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.pixels.as_bytes().len()
    }
}

/// Operation applied to a decoded image before it is handed to the caller.
///
/// Transforms are never part of the cache key: the cache keeps the
/// untransformed image and the transform runs on every retrieval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Transform {
    /// Return the image unchanged.
    #[default]
    Identity,
    /// Crop to the largest centered square.
    CenterCropSquare,
}

impl Transform {
    /// Applies the transform.
    ///
    /// `Identity` shares the input allocation; `CenterCropSquare` builds a new
    /// image and leaves the input untouched.
    #[must_use]
    pub fn apply(self, image: &Arc<DecodedImage>) -> Arc<DecodedImage> {
        match self {
            Self::Identity => Arc::clone(image),
            Self::CenterCropSquare => Arc::new(center_crop_square(image)),
        }
    }
}

impl std::fmt::Display for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::CenterCropSquare => write!(f, "center-crop-square"),
        }
    }
}

/// Returns the `(x, y, side)` of the largest square centered in `width x height`.
#[must_use]
pub const fn center_square(width: u32, height: u32) -> (u32, u32, u32) {
    let side = if width < height { width } else { height };
    ((width - side) / 2, (height - side) / 2, side)
}

fn center_crop_square(image: &DecodedImage) -> DecodedImage {
    let (x, y, side) = center_square(image.width(), image.height());
    DecodedImage {
        pixels: image.pixels.crop_imm(x, y, side, side),
        orientation: image.orientation,
        scale: image.scale,
    }
}

/// A single artwork request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Image URL.
    pub url: String,
    /// Transform to apply to the result.
    pub transform: Transform,
}

impl FetchRequest {
    /// Creates a new request.
    #[must_use]
    pub fn new(url: impl Into<String>, transform: Transform) -> Self {
        Self {
            url: url.into(),
            transform,
        }
    }
}

/// Where an image was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory cache.
    Cache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Key the image is cached under.
    pub key: CacheKey,
    /// The transformed image.
    pub image: Arc<DecodedImage>,
    /// Where the untransformed image came from.
    pub source: ImageSource,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};
    use test_case::test_case;

    fn gradient(width: u32, height: u32) -> Arc<DecodedImage> {
        let buf = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        });
        Arc::new(DecodedImage::new(DynamicImage::ImageRgba8(buf)))
    }

    #[test_case(400, 300, (50, 0, 300) ; "landscape")]
    #[test_case(300, 400, (0, 50, 300) ; "portrait")]
    #[test_case(64, 64, (0, 0, 64) ; "square")]
    #[test_case(401, 300, (50, 0, 300) ; "odd_difference_floors")]
    #[test_case(1, 9, (0, 4, 1) ; "sliver")]
    fn test_center_square(width: u32, height: u32, expected: (u32, u32, u32)) {
        assert_eq!(center_square(width, height), expected);
    }

    #[test]
    fn test_crop_takes_centered_pixels() {
        let source = gradient(400, 300);
        let cropped = Transform::CenterCropSquare.apply(&source);

        assert_eq!(cropped.width(), 300);
        assert_eq!(cropped.height(), 300);
        assert_eq!(
            cropped.pixels().get_pixel(0, 0),
            source.pixels().get_pixel(50, 0)
        );
        assert_eq!(
            cropped.pixels().get_pixel(299, 299),
            source.pixels().get_pixel(349, 299)
        );
    }

    #[test]
    fn test_crop_is_deterministic() {
        let source = gradient(123, 77);
        let first = Transform::CenterCropSquare.apply(&source);
        let second = Transform::CenterCropSquare.apply(&source);

        assert_eq!(first.pixels().as_bytes(), second.pixels().as_bytes());
    }

    #[test]
    fn test_crop_preserves_metadata() {
        let source = Arc::new(
            DecodedImage::new(DynamicImage::new_rgb8(20, 10))
                .with_orientation(Orientation::Rotate90)
                .with_scale(2.0),
        );
        let cropped = Transform::CenterCropSquare.apply(&source);

        assert_eq!(cropped.orientation(), Orientation::Rotate90);
        assert!((cropped.scale() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_identity_shares_allocation() {
        let source = gradient(8, 4);
        let same = Transform::Identity.apply(&source);
        assert!(Arc::ptr_eq(&source, &same));
    }

    #[test]
    fn test_crop_leaves_source_untouched() {
        let source = gradient(40, 20);
        let _ = Transform::CenterCropSquare.apply(&source);
        assert_eq!(source.width(), 40);
        assert_eq!(source.height(), 20);
    }

    #[test]
    fn test_cache_key_is_exact() {
        assert_ne!(
            CacheKey::from("https://a.test/x.png"),
            CacheKey::from("https://a.test/x.png ")
        );
        assert_ne!(
            CacheKey::from("https://A.test/x.png"),
            CacheKey::from("https://a.test/x.png")
        );
    }
}
