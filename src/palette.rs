use rgb::ComponentBytes;
use rgb::RGB8;
use std::collections::HashMap;

/// Most colors a `PLTE` chunk can index with 8-bit pixels
pub const MAX_PALETTE_SIZE: usize = 256;

/// The image has more distinct colors than fit in a palette
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PaletteOverflow;

/// Colors in order of first appearance, with a reverse lookup from color to index
#[derive(Clone, Debug, Default)]
pub struct Palette {
    colors: Vec<RGB8>,
    tree: HashMap<RGB8, u8>,
}

impl Palette {
    /// Assign each distinct color the next free index in scan order.
    ///
    /// Stops at the 257th distinct color. There's no partial palette: the caller must write
    /// the whole image as truecolor then.
    pub fn build(pixels: &[RGB8]) -> Result<Self, PaletteOverflow> {
        let mut pal = Self::default();
        for &px in pixels {
            if pal.tree.contains_key(&px) {
                continue;
            }
            let index = u8::try_from(pal.colors.len()).map_err(|_| PaletteOverflow)?;
            pal.tree.insert(px, index);
            pal.colors.push(px);
        }
        Ok(pal)
    }

    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[RGB8] {
        &self.colors
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn index_of(&self, color: RGB8) -> Option<u8> {
        self.tree.get(&color).copied()
    }

    /// `PLTE` chunk data: 3 bytes per entry, in index order
    #[must_use]
    pub fn to_plte_bytes(&self) -> Vec<u8> {
        self.colors.as_bytes().to_vec()
    }
}
