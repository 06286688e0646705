use image::{Rgb, Rgb32FImage, RgbImage};
use imageproc::filter::gaussian_blur_f32;

/// Side of the square Gaussian kernel used to smooth the HSV image
pub const BLUR_KERNEL_SIZE: u32 = 9;

/// Sigma implied by a kernel size when no sigma is given explicitly
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Convert one RGB pixel to 8-bit HSV (H in 0..180, S and V in 0..=255)
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = pixel.0;
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 {
        0.0
    } else {
        diff as f32 * 255.0 / v as f32
    };

    let h = if diff == 0 {
        0.0
    } else {
        let diff = diff as f32;
        let h = if v == r {
            60.0 * (g - b) as f32 / diff
        } else if v == g {
            120.0 + 60.0 * (b - r) as f32 / diff
        } else {
            240.0 + 60.0 * (r - g) as f32 / diff
        };
        if h < 0.0 { h + 360.0 } else { h }
    };

    let h = ((h / 2.0).round() as u32 % 180) as u8;
    Rgb([h, s.round() as u8, v as u8])
}

/// Convert an RGB image to 8-bit HSV
pub fn to_hsv(img: &RgbImage) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        rgb_to_hsv(*img.get_pixel(x, y))
    })
}

/// Gaussian blur with the sigma implied by `kernel_size`.
///
/// imageproc sizes the kernel from sigma itself, so the taps reach a little
/// past `kernel_size`; the outer weights are small.
pub fn apply_blur(img: &RgbImage, kernel_size: u32) -> RgbImage {
    gaussian_blur_f32(img, kernel_sigma(kernel_size))
}

/// Rescale 8-bit channels to the unit range
pub fn to_unit_range(img: &RgbImage) -> Rgb32FImage {
    Rgb32FImage::from_fn(img.width(), img.height(), |x, y| {
        let [a, b, c] = img.get_pixel(x, y).0;
        Rgb([a as f32 / 255.0, b as f32 / 255.0, c as f32 / 255.0])
    })
}

/// HSV conversion, 9x9 Gaussian smoothing and rescaling to [0, 1]
pub fn preprocess(img: &RgbImage) -> Rgb32FImage {
    let hsv = to_hsv(img);
    let blurred = apply_blur(&hsv, BLUR_KERNEL_SIZE);
    to_unit_range(&blurred)
}
