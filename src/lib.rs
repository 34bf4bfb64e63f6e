//! Writes 8-bit RGB and RGBA pixels as PNG files.
//!
//! RGB images with at most 256 distinct colors are stored with a palette. Everything else is
//! stored as truecolor, with each row filtered by whichever of the None, Sub, Up or Average
//! predictors gives the smallest byte sum.
//!
//! ```rust,no_run
//! let pixels = [255u8, 0, 0, 0, 255, 0];
//! let png = palpng::encode_memory(&pixels, 2, 1, false)?;
//! std::fs::write("two_pixels.png", png)?;
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::doc_markdown)]

mod chunk;
mod encode;
mod error;
mod filter;
mod iter;
mod palette;
mod settings;
mod zlib;

pub use crate::chunk::{add_chunk, assemble, chunk_crc, frame, Chunk, ChunkRef, MAX_CHUNK_LEN, PNG_SIGNATURE};
pub use crate::encode::{classify, emit, Strategy};
pub use crate::error::Error;
pub use crate::filter::{filter_row, filter_scanline, FilterStrategy, FilterType};
pub use crate::iter::{ChunksIter, ChunksIterFallible};
pub use crate::palette::{Palette, PaletteOverflow, MAX_PALETTE_SIZE};
pub use crate::settings::{ColorType, CompressSettings, CustomZlib, EncoderSettings};

pub use rgb::{RGB8, RGBA8};

use crate::encode::check_shape;
use rgb::ComponentBytes;
use std::fs;
use std::path::Path;

/// Encoder with adjustable settings. [`encode_memory`] uses the defaults.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    settings: EncoderSettings,
}

impl Encoder {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EncoderSettings {
        &self.settings
    }

    #[inline]
    pub fn settings_mut(&mut self) -> &mut EncoderSettings {
        &mut self.settings
    }

    /// If false, RGB images are always written as truecolor, even with few colors
    #[inline]
    pub fn set_auto_palette(&mut self, auto_palette: bool) {
        self.settings.auto_palette = auto_palette;
    }

    #[inline]
    pub fn set_filter_strategy(&mut self, filter_strategy: FilterStrategy) {
        self.settings.filter_strategy = filter_strategy;
    }

    /// 0 (none), 1 (fast) to 9 (best)
    #[inline]
    pub fn set_compression_level(&mut self, level: u8) {
        self.settings.zlibsettings.set_level(level);
    }

    /// Compress with the given function instead of `flate2`
    #[inline]
    pub fn set_custom_zlib(&mut self, callback: Option<CustomZlib>) {
        self.settings.zlibsettings.custom_zlib = callback;
    }

    /// `image` is `w * h` pixels of RGB (3 bytes) or, if `has_alpha`, RGBA (4 bytes).
    ///
    /// Fails with [`Error::SHAPE_MISMATCH`] before doing any work if the length doesn't match.
    pub fn encode(&self, image: &[u8], w: u32, h: u32, has_alpha: bool) -> Result<Vec<u8>, Error> {
        check_shape(image.len(), w, h, if has_alpha { 4 } else { 3 })?;
        let strategy = classify(image, has_alpha, self.settings.auto_palette);
        emit(&strategy, image, w, h, &self.settings)
    }

    /// Same as `encode`, but writes the result to a file
    pub fn encode_file<P: AsRef<Path>>(&self, filepath: P, image: &[u8], w: u32, h: u32, has_alpha: bool) -> Result<(), Error> {
        let buf = self.encode(image, w, h, has_alpha)?;
        save_file(filepath, &buf)
    }
}

/// Converts raw pixel data into a PNG image in memory.
///
/// `image` is RGB, or RGBA if `has_alpha` is set, 8 bits per channel, rows top to bottom.
pub fn encode_memory(image: &[u8], w: u32, h: u32, has_alpha: bool) -> Result<Vec<u8>, Error> {
    Encoder::new().encode(image, w, h, has_alpha)
}

/// Same as `encode_memory`, but always encodes from 32-bit RGBA raw image
pub fn encode32(image: &[RGBA8], w: u32, h: u32) -> Result<Vec<u8>, Error> {
    encode_memory(image.as_bytes(), w, h, true)
}

/// Same as `encode_memory`, but always encodes from 24-bit RGB raw image
pub fn encode24(image: &[RGB8], w: u32, h: u32) -> Result<Vec<u8>, Error> {
    encode_memory(image.as_bytes(), w, h, false)
}

/// Converts raw pixel data into a PNG file on disk.
/// Same as the other encode functions, but instead takes a file path as output.
///
/// NOTE: This overwrites existing files without warning!
pub fn encode_file<P: AsRef<Path>>(filepath: P, image: &[u8], w: u32, h: u32, has_alpha: bool) -> Result<(), Error> {
    Encoder::new().encode_file(filepath, image, w, h, has_alpha)
}

/// Same as `encode_file`, but always encodes from 32-bit RGBA raw image
pub fn encode32_file<P: AsRef<Path>>(filepath: P, image: &[RGBA8], w: u32, h: u32) -> Result<(), Error> {
    encode_file(filepath, image.as_bytes(), w, h, true)
}

/// Same as `encode_file`, but always encodes from 24-bit RGB raw image
pub fn encode24_file<P: AsRef<Path>>(filepath: P, image: &[RGB8], w: u32, h: u32) -> Result<(), Error> {
    encode_file(filepath, image.as_bytes(), w, h, false)
}

fn save_file<P: AsRef<Path>>(filepath: P, buffer: &[u8]) -> Result<(), Error> {
    fs::write(filepath, buffer)?;
    Ok(())
}
