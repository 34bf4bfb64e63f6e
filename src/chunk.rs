use crate::Error;
use flate2::Crc;

/// 8 bytes PNG signature, aka the magic bytes
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Largest data length a single chunk may declare
pub const MAX_CHUNK_LEN: usize = (1 << 31) - 1;

/// A chunk before framing: 4-letter type and its data
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Chunk {
    pub type_: [u8; 4],
    pub data: Vec<u8>,
}

impl Chunk {
    #[must_use]
    pub fn new(type_: &[u8; 4], data: Vec<u8>) -> Self {
        Self { type_: *type_, data }
    }

    /// Length of the chunk once framed: length, type, data and CRC
    #[inline]
    #[must_use]
    pub fn framed_len(&self) -> usize {
        self.data.len() + 12
    }
}

/// CRC-32 of the chunk name and data. The length field is not included.
#[must_use]
pub fn chunk_crc(type_: &[u8], data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(type_);
    crc.update(data);
    crc.sum()
}

/// Append `length | type | data | crc` to `out`.
///
/// `data` must not be longer than [`MAX_CHUNK_LEN`].
pub fn add_chunk(out: &mut Vec<u8>, type_: &[u8; 4], data: &[u8]) {
    debug_assert!(data.len() <= MAX_CHUNK_LEN);
    out.reserve(data.len() + 12);
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(type_);
    out.extend_from_slice(data);
    out.extend_from_slice(&chunk_crc(type_, data).to_be_bytes());
}

/// Frame a single chunk
#[must_use]
pub fn frame(type_: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 12);
    add_chunk(&mut out, type_, data);
    out
}

/// Signature followed by the chunks, in the order given
pub fn assemble(signature: &[u8; 8], chunks: &[Chunk]) -> Result<Vec<u8>, Error> {
    let total = chunks.iter().map(Chunk::framed_len).sum::<usize>() + signature.len();
    let mut out = Vec::new();
    out.try_reserve_exact(total)?;
    out.extend_from_slice(signature);
    for ch in chunks {
        add_chunk(&mut out, &ch.type_, &ch.data);
    }
    Ok(out)
}

/// Reference to a framed chunk inside a byte buffer
#[derive(Copy, Clone)]
pub struct ChunkRef<'a> {
    data: &'a [u8],
}

impl<'a> ChunkRef<'a> {
    /// `data` must start at the chunk's length field. Fails with [`Error::TRUNCATED_CHUNK`]
    /// if the buffer is shorter than the declared length.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        if data.len() < 12 {
            return Err(Error::TRUNCATED_CHUNK);
        }
        let len = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if len > MAX_CHUNK_LEN || data.len() - 12 < len {
            return Err(Error::TRUNCATED_CHUNK);
        }
        Ok(Self { data: &data[..len + 12] })
    }

    /// Length of the chunk's data, not counting the 12 framing bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() - 12
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> [u8; 4] {
        [self.data[4], self.data[5], self.data[6], self.data[7]]
    }

    #[inline]
    #[must_use]
    pub fn is_type<C: AsRef<[u8]>>(&self, name: C) -> bool {
        self.name() == name.as_ref()
    }

    #[must_use]
    pub fn is_ancillary(&self) -> bool {
        (self.data[4] & 32) != 0
    }

    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        &self.data[8..8 + self.len()]
    }

    /// CRC stored after the data
    #[must_use]
    pub fn crc(&self) -> u32 {
        let at = 8 + self.len();
        u32::from_be_bytes([self.data[at], self.data[at + 1], self.data[at + 2], self.data[at + 3]])
    }

    /// The CRC is taken of the data and the 4 chunk type letters, not the length
    #[must_use]
    pub fn check_crc(&self) -> bool {
        self.crc() == chunk_crc(&self.data[4..8], self.data())
    }

    /// Whole framed chunk, including length and CRC
    #[must_use]
    pub fn whole_chunk_data(&self) -> &'a [u8] {
        self.data
    }
}

impl std::fmt::Debug for ChunkRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkRef")
            .field("name", &String::from_utf8_lossy(&self.name()))
            .field("len", &self.len())
            .finish()
    }
}
