//! Colour stages of the pipeline. All of them work on a copy of the source.

use image::{Rgba, RgbaImage, imageops};

use crate::transform::{FilterPreset, TransformState};

/// Applies brightness, contrast, saturation and then the filter preset.
pub fn apply_color(image: RgbaImage, transform: &TransformState, blur_sigma: f32) -> RgbaImage {
    if !transform.has_color() {
        return image;
    }
    let mut image = image;
    adjust(
        &mut image,
        transform.brightness(),
        transform.contrast(),
        transform.saturation(),
    );
    apply_preset(image, transform.filter(), blur_sigma)
}

/// Brightness, contrast and saturation, each given in `[-100, 100]` and
/// applied as a multiplicative factor of `1 + value / 100`.
pub fn adjust(image: &mut RgbaImage, brightness: i32, contrast: i32, saturation: i32) {
    if brightness == 0 && contrast == 0 && saturation == 0 {
        return;
    }
    let brightness = factor(brightness);
    let contrast = factor(contrast);
    let saturation = factor(saturation);

    apply_pixel_transform(image, move |r, g, b, a| {
        let (r, g, b) = (r * brightness, g * brightness, b * brightness);
        let (r, g, b) = (
            (r - 128.0) * contrast + 128.0,
            (g - 128.0) * contrast + 128.0,
            (b - 128.0) * contrast + 128.0,
        );
        let l = luma(r, g, b);
        (
            l + (r - l) * saturation,
            l + (g - l) * saturation,
            l + (b - l) * saturation,
            a,
        )
    });
}

pub fn apply_preset(image: RgbaImage, preset: FilterPreset, blur_sigma: f32) -> RgbaImage {
    let mut image = image;
    match preset {
        FilterPreset::None => {}
        FilterPreset::Grayscale => apply_pixel_transform(&mut image, |r, g, b, a| {
            let l = luma(r, g, b);
            (l, l, l, a)
        }),
        FilterPreset::Sepia => apply_pixel_transform(&mut image, |r, g, b, a| {
            let sr = 0.393 * r + 0.769 * g + 0.189 * b;
            let sg = 0.349 * r + 0.686 * g + 0.168 * b;
            let sb = 0.272 * r + 0.534 * g + 0.131 * b;
            (sr, sg, sb, a)
        }),
        FilterPreset::Blur => return imageops::blur(&image, blur_sigma),
        FilterPreset::Invert => apply_pixel_transform(&mut image, |r, g, b, a| {
            (255.0 - r, 255.0 - g, 255.0 - b, a)
        }),
    }
    image
}

fn factor(value: i32) -> f32 {
    1.0 + value as f32 / 100.0
}

// Rec. 709 luma
fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Runs `f` over every pixel with channels as `f32` in `[0, 255]`, clamping
/// and rounding the result back to bytes.
fn apply_pixel_transform<F>(image: &mut RgbaImage, f: F)
where
    F: Fn(f32, f32, f32, f32) -> (f32, f32, f32, f32),
{
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let (r, g, b, a) = f(r as f32, g as f32, b as f32, a as f32);
        *pixel = Rgba([to_byte(r), to_byte(g), to_byte(b), to_byte(a)]);
    }
}

fn to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
