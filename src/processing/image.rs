use crate::config::NormalizerConfig;
use crate::utils::KtpError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use std::path::Path;

/// ImageProcessor turns a photo of a card into a black and white image that
/// Tesseract reads well: grayscale, upscale, blur, then a local-mean threshold.
pub struct ImageProcessor {
    config: NormalizerConfig,
}

impl ImageProcessor {
    pub fn new(config: NormalizerConfig) -> Self {
        ImageProcessor { config }
    }

    /// Decode an uploaded image, guessing the format from its contents.
    pub fn decode(image_bytes: &[u8]) -> Result<DynamicImage, KtpError> {
        let img = image::load_from_memory(image_bytes)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(KtpError::Decode("Image has no pixels".to_string()));
        }
        Ok(img)
    }

    pub fn preprocess(&self, img: &DynamicImage) -> GrayImage {
        let gray = img.to_luma8();

        let scale = self.config.scale.max(1);
        let resized = if scale > 1 {
            let (width, height) = gray.dimensions();
            imageops::resize(&gray, width * scale, height * scale, FilterType::CatmullRom)
        } else {
            gray
        };

        // gaussian_blur_f32 panics on a non-positive sigma
        let blurred = if self.config.blur_sigma > 0.0 {
            gaussian_blur_f32(&resized, self.config.blur_sigma)
        } else {
            resized
        };

        let binary = adaptive_mean_threshold(&blurred, self.config.block_size, self.config.bias);
        log::debug!(
            "Preprocessed {}x{} image to {}x{} binary",
            img.width(),
            img.height(),
            binary.width(),
            binary.height()
        );
        binary
    }

    /// Write the binarized image for inspection. Failures are logged and
    /// otherwise ignored; the snapshot is never needed to finish a read.
    pub fn save_snapshot(image: &GrayImage, path: &Path) {
        match image.save(path) {
            Ok(()) => log::debug!("Saved preprocessing snapshot to {:?}", path),
            Err(e) => log::warn!("Could not save preprocessing snapshot to {:?}: {}", path, e),
        }
    }
}

/// Binarize against the mean of each pixel's `block_size` square
/// neighbourhood minus `bias`. Windows are clipped at the image border.
fn adaptive_mean_threshold(gray: &GrayImage, block_size: u32, bias: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let radius = block_size.max(1) / 2;
    let stride = width as usize + 1;

    // Summed-area table with a zero first row and column. Entries wrap past
    // u32::MAX on large photos; window sums stay exact (see window_sum).
    let mut integral = vec![0u32; stride * (height as usize + 1)];
    for y in 0..height as usize {
        let mut row_sum = 0u32;
        for x in 0..width as usize {
            row_sum = row_sum.wrapping_add(gray.get_pixel(x as u32, y as u32).0[0] as u32);
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1].wrapping_add(row_sum);
        }
    }
    let at = |x: u32, y: u32| integral[y as usize * stride + x as usize];

    GrayImage::from_fn(width, height, |x, y| {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius).min(width - 1) + 1;
        let y1 = (y + radius).min(height - 1) + 1;

        let sum = window_sum(at(x1, y1), at(x0, y0), at(x1, y0), at(x0, y1)) as u64;
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        let mean = ((sum + count / 2) / count) as i32;

        if gray.get_pixel(x, y).0[0] as i32 > mean - bias {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Sum of a window from its four summed-area corners. Modular arithmetic
/// gives the exact sum as long as the window itself fits in a u32.
fn window_sum(bottom_right: u32, top_left: u32, top_right: u32, bottom_left: u32) -> u32 {
    bottom_right
        .wrapping_add(top_left)
        .wrapping_sub(top_right)
        .wrapping_sub(bottom_left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn card_with_dark_block() -> DynamicImage {
        let mut img = RgbImage::from_pixel(40, 30, Rgb([235, 235, 225]));
        for y in 10..20 {
            for x in 15..25 {
                img.put_pixel(x, y, Rgb([20, 20, 30]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_preprocess_doubles_dimensions_and_binarizes() {
        let processor = ImageProcessor::new(NormalizerConfig::default());
        let binary = processor.preprocess(&card_with_dark_block());

        assert_eq!(binary.dimensions(), (80, 60));
        assert!(binary.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn test_dark_glyph_turns_black_background_stays_white() {
        let processor = ImageProcessor::new(NormalizerConfig::default());
        let binary = processor.preprocess(&card_with_dark_block());

        // Inside the block, close to its edge where the window straddles the background
        assert_eq!(binary.get_pixel(32, 22).0[0], 0);
        // Plain background far from the block
        assert_eq!(binary.get_pixel(3, 3).0[0], 255);
        assert_eq!(binary.get_pixel(76, 56).0[0], 255);
    }

    #[test]
    fn test_uniform_image_is_all_white() {
        let processor = ImageProcessor::new(NormalizerConfig::default());
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([128])));
        let binary = processor.preprocess(&img);
        assert!(binary.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_scale_of_one_keeps_size() {
        let config = NormalizerConfig {
            scale: 1,
            ..NormalizerConfig::default()
        };
        let binary = ImageProcessor::new(config).preprocess(&card_with_dark_block());
        assert_eq!(binary.dimensions(), (40, 30));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ImageProcessor::decode(b"definitely not a picture").unwrap_err();
        assert!(matches!(err, KtpError::Decode(_)));
    }

    #[test]
    fn test_decode_accepts_png_bytes() {
        let mut bytes = Vec::new();
        card_with_dark_block()
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let img = ImageProcessor::decode(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn test_window_sum_survives_wrapped_corners() {
        // Corners of a window summing to 1000 whose table entries wrapped
        let top_left = u32::MAX - 500;
        let top_right = u32::MAX - 100;
        let bottom_left = 200u32;
        let bottom_right = top_right.wrapping_add(bottom_left).wrapping_sub(top_left).wrapping_add(1000);

        assert_eq!(window_sum(bottom_right, top_left, top_right, bottom_left), 1000);
        assert_eq!(window_sum(30, 0, 10, 5), 15);
    }

    #[test]
    fn test_snapshot_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.png");
        let binary = GrayImage::from_pixel(4, 4, Luma([255]));

        ImageProcessor::save_snapshot(&binary, &path);
        assert!(path.exists());
    }

    #[test]
    fn test_snapshot_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("snapshot.png");
        ImageProcessor::save_snapshot(&GrayImage::new(2, 2), &path);
        assert!(!path.exists());
    }
}
