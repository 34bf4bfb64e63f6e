use crate::filter::FilterStrategy;
use crate::Error;
use std::io::Write;

/// Replacement for the built-in zlib compressor. Must write a complete zlib stream to the output.
pub type CustomZlib = fn(&[u8], &mut dyn Write, &CompressSettings) -> Result<(), Error>;

/// Color type codes as written in `IHDR`. Same as standard PNG color types.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[allow(non_camel_case_types)]
pub enum ColorType {
    /// RGB: 8 bit
    RGB = 2,
    /// palette: 8 bit
    PALETTE = 3,
    /// RGB with alpha: 8 bit
    RGBA = 6,
}

impl ColorType {
    /// Bytes per pixel of the scanlines written for this color type
    #[inline]
    #[must_use]
    pub fn bpp(self) -> usize {
        match self {
            Self::RGB => 3,
            Self::PALETTE => 1,
            Self::RGBA => 4,
        }
    }
}

/// Settings for the zlib compressor
#[derive(Clone, Debug)]
pub struct CompressSettings {
    /// 0 (none), 1 (fast) to 9 (best)
    pub level: u8,
    /// use custom zlib encoder instead of built in one (default: None)
    pub custom_zlib: Option<CustomZlib>,
}

impl CompressSettings {
    /// 0 (none), 1 (fast) to 9 (best). Values above 9 are treated as 9.
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(9);
    }
}

impl Default for CompressSettings {
    fn default() -> Self {
        Self {
            level: 6,
            custom_zlib: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EncoderSettings {
    /// settings for the zlib encoder
    pub zlibsettings: CompressSettings,
    /// Write RGB images with at most 256 colors as palette images. Default: true
    pub auto_palette: bool,
    /// How truecolor rows are filtered. Palette rows are always filter type 0.
    pub filter_strategy: FilterStrategy,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            zlibsettings: CompressSettings::default(),
            auto_palette: true,
            filter_strategy: FilterStrategy::MinSum,
        }
    }
}
