//! Pure-computation RGBA8 conversion of a [`Raster`].
//!
//! This module is always available (no feature gate) so that both the `png`
//! snapshot path and the WASM `ImageData` path can share the same conversion.

use magnaflux_core::color::Rgba;

use crate::raster::Raster;

/// Packs the raster into an RGBA8 buffer.
///
/// Each pixel is written as four bytes (R, G, B, 255); the surface is opaque.
/// The buffer length is `width * height * 4`.
pub fn raster_to_rgba(raster: &Raster) -> Vec<u8> {
    raster
        .pixels()
        .iter()
        .flat_map(|c| {
            Rgba {
                r: c.x,
                g: c.y,
                b: c.z,
                a: 1.0,
            }
            .to_rgba8()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use magnaflux_core::surface::{DrawCommand, Surface};

    #[test]
    fn raster_to_rgba_correct_length() {
        let raster = Raster::new(8, 4);
        let buf = raster_to_rgba(&raster);
        assert_eq!(buf.len(), 8 * 4 * 4);
    }

    #[test]
    fn raster_to_rgba_alpha_always_255() {
        let mut raster = Raster::new(4, 4);
        raster.draw(DrawCommand::FillRect {
            origin: DVec2::ZERO,
            size: DVec2::new(2.0, 2.0),
            color: Rgba::WHITE.with_alpha(0.3),
        });
        let buf = raster_to_rgba(&raster);
        for (i, &byte) in buf.iter().enumerate() {
            if i % 4 == 3 {
                assert_eq!(byte, 255, "alpha at pixel {} should be 255", i / 4);
            }
        }
    }

    #[test]
    fn background_packs_to_slate_bytes() {
        let buf = raster_to_rgba(&Raster::new(1, 1));
        assert_eq!(buf, vec![2, 6, 23, 255]);
    }

    #[test]
    fn white_pixel_packs_to_full_bytes() {
        let mut raster = Raster::new(2, 1);
        raster.draw(DrawCommand::FillRect {
            origin: DVec2::new(1.0, 0.0),
            size: DVec2::new(1.0, 1.0),
            color: Rgba::WHITE,
        });
        let buf = raster_to_rgba(&raster);
        assert_eq!(&buf[4..8], &[255, 255, 255, 255]);
    }
}
