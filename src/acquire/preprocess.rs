use image::{imageops, DynamicImage, GrayImage, Luma};

/// Convert to grayscale and apply a Gaussian adaptive threshold.
///
/// A pixel turns white when it is brighter than its Gaussian-weighted local
/// mean minus `offset`, black otherwise. The Gaussian sigma is derived from
/// `block_size` the same way OpenCV sizes its kernel.
pub fn preprocess(image: &DynamicImage, block_size: u32, offset: f32) -> GrayImage {
    let gray = image.to_luma8();
    adaptive_threshold(&gray, block_size, offset)
}

fn adaptive_threshold(gray: &GrayImage, block_size: u32, offset: f32) -> GrayImage {
    let local_mean = imageops::blur(gray, block_sigma(block_size));

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = f32::from(gray.get_pixel(x, y)[0]);
        let threshold = f32::from(local_mean.get_pixel(x, y)[0]) - offset;
        if value > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

fn block_sigma(block_size: u32) -> f32 {
    0.3 * ((block_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_sigma_for_default_block() {
        assert!((block_sigma(31) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_image_is_white() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb([90, 90, 90])));
        let out = preprocess(&img, 31, 10.0);
        assert_eq!((out.width(), out.height()), (40, 40));
        assert!(out.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn test_dark_stroke_on_light_background_is_black() {
        let mut img = RgbImage::from_pixel(60, 60, Rgb([230, 230, 230]));
        for y in 20..40 {
            for x in 28..32 {
                img.put_pixel(x, y, Rgb([20, 20, 20]));
            }
        }
        let out = preprocess(&DynamicImage::ImageRgb8(img), 31, 10.0);

        assert_eq!(out.get_pixel(30, 30)[0], 0);
        assert_eq!(out.get_pixel(5, 5)[0], 255);
    }

    #[test]
    fn test_output_is_binary() {
        let img = GrayImage::from_fn(32, 32, |x, y| Luma([((x * 7 + y * 3) % 256) as u8]));
        let out = preprocess(&DynamicImage::ImageLuma8(img), 11, 2.0);
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }
}
