//! PNG snapshots of a [`Raster`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM builds
//! can depend on the raster crate without pulling in the `image` crate.
//! The pixel buffer conversion itself lives in [`crate::pixel`] (always available).

use magnaflux_core::error::EngineError;
use std::path::Path;

use crate::pixel::raster_to_rgba;
use crate::raster::Raster;

/// Writes the raster as a PNG image.
///
/// Returns `EngineError::InvalidDimensions` for an empty raster, or
/// `EngineError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), EngineError> {
    if raster.width() == 0 || raster.height() == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    let rgba = raster_to_rgba(raster);
    let img = image::RgbaImage::from_raw(raster.width(), raster.height(), rgba)
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))?;
    log::debug!("wrote {}x{} snapshot to {}", raster.width(), raster.height(), path.display());
    Ok(())
}
