use crate::chunk::{ChunkRef, PNG_SIGNATURE};
use crate::Error;

/// Iterates framed chunks, stopping at the first truncated one
pub struct ChunksIter<'a> {
    pub(crate) iter: ChunksIterFallible<'a>,
}

impl<'a> ChunksIter<'a> {
    /// `data` must start at the first chunk, i.e. after the signature
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            iter: ChunksIterFallible { data },
        }
    }

    /// Skips the PNG signature if `png` starts with one
    #[must_use]
    pub fn from_png(png: &'a [u8]) -> Self {
        Self::new(png.strip_prefix(&PNG_SIGNATURE[..]).unwrap_or(png))
    }
}

impl<'a> Iterator for ChunksIter<'a> {
    type Item = ChunkRef<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().and_then(|item| item.ok())
    }
}

pub struct ChunksIterFallible<'a> {
    pub(crate) data: &'a [u8],
}

impl<'a> Iterator for ChunksIterFallible<'a> {
    type Item = Result<ChunkRef<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let ch = match ChunkRef::new(self.data) {
            Ok(ch) => ch,
            Err(e) => {
                self.data = &[];
                return Some(Err(e));
            },
        };
        self.data = &self.data[ch.len() + 12..];
        Some(Ok(ch))
    }
}

#[test]
fn iterates_framed_chunks() {
    let mut png = PNG_SIGNATURE.to_vec();
    crate::chunk::add_chunk(&mut png, b"IHDR", &[0; 13]);
    crate::chunk::add_chunk(&mut png, b"IEND", &[]);
    let names: Vec<_> = ChunksIter::from_png(&png).map(|c| c.name()).collect();
    assert_eq!(names, [*b"IHDR", *b"IEND"]);

    png.pop();
    let mut it = ChunksIterFallible { data: &png[8..] };
    assert!(it.next().unwrap().is_ok());
    assert_eq!(Error::TRUNCATED_CHUNK, it.next().unwrap().unwrap_err());
    assert!(it.next().is_none());
}
