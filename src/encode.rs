use crate::chunk::{assemble, Chunk, MAX_CHUNK_LEN, PNG_SIGNATURE};
use crate::filter::{self, FilterType};
use crate::palette::Palette;
use crate::settings::{ColorType, EncoderSettings};
use crate::zlib;
use crate::Error;
use log::debug;
use rgb::{FromSlice, RGB8};

/// How the image will be stored. Decided once for the whole image, before anything is written.
#[derive(Clone, Debug)]
pub enum Strategy {
    /// At most 256 colors, no alpha: `PLTE` + one index byte per pixel
    Palettized(Palette),
    /// Full RGB or RGBA samples with per-row filtering
    Truecolor { has_alpha: bool },
}

impl Strategy {
    #[must_use]
    pub fn color_type(&self) -> ColorType {
        match self {
            Self::Palettized(_) => ColorType::PALETTE,
            Self::Truecolor { has_alpha: true } => ColorType::RGBA,
            Self::Truecolor { has_alpha: false } => ColorType::RGB,
        }
    }

    #[inline]
    fn input_channels(&self) -> usize {
        match self {
            Self::Truecolor { has_alpha: true } => 4,
            _ => 3,
        }
    }
}

/// `image.len()` must be exactly `w * h * channels`
pub(crate) fn check_shape(len: usize, w: u32, h: u32, channels: usize) -> Result<(), Error> {
    let expected = (w as usize)
        .checked_mul(h as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(Error::SHAPE_MISMATCH)?;
    if expected != len {
        return Err(Error::SHAPE_MISMATCH);
    }
    Ok(())
}

/// Choose between palette and truecolor.
///
/// Alpha images are always truecolor. RGB images get a palette if they have at most 256
/// distinct colors and `auto_palette` is on.
#[must_use]
pub fn classify(image: &[u8], has_alpha: bool, auto_palette: bool) -> Strategy {
    if has_alpha || !auto_palette {
        return Strategy::Truecolor { has_alpha };
    }
    match Palette::build(image.as_rgb()) {
        Ok(palette) => {
            debug!("{} colors, using palette", palette.len());
            Strategy::Palettized(palette)
        },
        Err(_) => {
            debug!("more than 256 colors, using truecolor");
            Strategy::Truecolor { has_alpha: false }
        },
    }
}

/// Write the whole PNG file for an already classified image
pub fn emit(strategy: &Strategy, image: &[u8], w: u32, h: u32, settings: &EncoderSettings) -> Result<Vec<u8>, Error> {
    check_shape(image.len(), w, h, strategy.input_channels())?;
    let width = w as usize;
    let height = h as usize;
    let color_type = strategy.color_type();

    let mut chunks = Vec::with_capacity(4);
    chunks.push(Chunk::new(b"IHDR", ihdr_data(w, h, color_type).to_vec()));

    let mut scanlines = Vec::new();
    match strategy {
        Strategy::Palettized(palette) => {
            index_scanlines(&mut scanlines, image.as_rgb(), width, height, palette)?;
            chunks.push(Chunk::new(b"PLTE", palette.to_plte_bytes()));
        },
        Strategy::Truecolor { .. } => {
            let bpp = color_type.bpp();
            filter::filter(&mut scanlines, image, width * bpp, height, bpp, settings.filter_strategy)?;
        },
    }

    let zlib = zlib::compress(&scanlines, &settings.zlibsettings)?;
    debug!("{}x{} {:?}: {} bytes of scanlines, {} compressed", w, h, color_type, scanlines.len(), zlib.len());
    drop(scanlines);
    add_idat_chunks(&mut chunks, zlib);
    chunks.push(Chunk::new(b"IEND", Vec::new()));

    assemble(&PNG_SIGNATURE, &chunks)
}

/// width, height, bit depth 8, color type, then compression, filter and interlace methods (all 0)
fn ihdr_data(w: u32, h: u32, color_type: ColorType) -> [u8; 13] {
    let mut header = [0u8; 13];
    header[0..4].copy_from_slice(&w.to_be_bytes());
    header[4..8].copy_from_slice(&h.to_be_bytes());
    header[8] = 8;
    header[9] = color_type as u8;
    header
}

/// Palette rows are never predicted: indices aren't intensities
fn index_scanlines(out: &mut Vec<u8>, pixels: &[RGB8], w: usize, h: usize, palette: &Palette) -> Result<(), Error> {
    out.try_reserve((w + 1) * h)?;
    if w == 0 {
        out.resize(h, FilterType::None.into());
        return Ok(());
    }
    for row in pixels.chunks_exact(w).take(h) {
        out.push(FilterType::None.into());
        for &px in row {
            out.push(palette.index_of(px).ok_or(Error::NOT_IN_PALETTE)?);
        }
    }
    Ok(())
}

/// Multiple IDAT chunks must be consecutive
fn add_idat_chunks(chunks: &mut Vec<Chunk>, zlib: Vec<u8>) {
    if zlib.len() <= MAX_CHUNK_LEN {
        chunks.push(Chunk::new(b"IDAT", zlib));
    } else {
        chunks.extend(zlib.chunks(MAX_CHUNK_LEN).map(|part| Chunk::new(b"IDAT", part.to_vec())));
    }
}
