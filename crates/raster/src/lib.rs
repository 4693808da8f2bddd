#![deny(unsafe_code)]
//! CPU-side rendering for magnaflux: an anti-aliased [`Raster`] surface,
//! RGBA8 conversion and PNG snapshots.
//!
//! Both the CLI and the WASM bindings depend on this crate, the CLI for
//! headless PNG output and the WASM adapter for `ImageData` blits.

pub mod pixel;
pub mod raster;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::raster_to_rgba;
pub use raster::Raster;
