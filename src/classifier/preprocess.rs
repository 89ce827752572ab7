//! Image preprocessing for classification
//!
//! Decode -> RGB -> 224x224 -> normalized NCHW tensor with batch dim 1.

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

/// ImageNet normalization mean values (RGB)
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet normalization std values (RGB)
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Model input edge length
pub const INPUT_SIZE: u32 = 224;

/// Convert a decoded image into the model input tensor.
///
/// Resizes to exactly 224x224 (no aspect preservation, matching the
/// training transform) and applies per-channel ImageNet normalization.
pub fn to_input_tensor(image: &DynamicImage) -> Array4<f32> {
    let resized = image.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3);
    let rgb = resized.to_rgb8();

    let size = INPUT_SIZE as usize;
    let mut tensor = Array4::<f32>::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_shape() {
        let img = DynamicImage::new_rgb8(100, 60);
        let tensor = to_input_tensor(&img);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_normalization_values() {
        // A uniformly white image maps every pixel of channel c to
        // (1.0 - mean[c]) / std[c]
        let mut buf = image::RgbImage::new(10, 10);
        for p in buf.pixels_mut() {
            *p = image::Rgb([255, 255, 255]);
        }
        let tensor = to_input_tensor(&DynamicImage::ImageRgb8(buf));

        for c in 0..3 {
            let expected = (1.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
            let got = tensor[[0, c, 112, 112]];
            assert!((got - expected).abs() < 1e-5, "channel {c}: {got} vs {expected}");
        }
    }

    #[test]
    fn test_grayscale_converted_to_three_channels() {
        let img = DynamicImage::new_luma8(50, 50);
        let tensor = to_input_tensor(&img);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
        // Black pixels: all channels normalized from 0.0
        for c in 0..3 {
            let expected = (0.0 - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
            assert!((tensor[[0, c, 0, 0]] - expected).abs() < 1e-5);
        }
    }
}
