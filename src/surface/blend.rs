//! # Pixel Blending
//!
//! Straight-alpha source-over compositing of single RGBA8 pixels.

use super::Rgba;

/// Blends `src` over `dst`, scaling the source coverage by `opacity`.
///
/// Both pixels carry straight (non-premultiplied) alpha. A fully transparent
/// source leaves the destination untouched.
///
/// # Examples
///
/// ```
/// use blaze::source_over;
///
/// // Opaque source replaces the destination
/// assert_eq!(source_over([255, 0, 0, 255], [0, 0, 255, 255], 1.0), [255, 0, 0, 255]);
///
/// // Half opacity mixes evenly over an opaque background
/// assert_eq!(source_over([255, 0, 0, 255], [0, 0, 255, 255], 0.5), [128, 0, 128, 255]);
/// ```
pub fn source_over(src: Rgba, dst: Rgba, opacity: f32) -> Rgba {
    let src_a = (src[3] as f32 / 255.0) * opacity;

    if src_a <= 0.0 {
        return dst;
    }

    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let blend = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    [
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}
