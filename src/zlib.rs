use crate::{CompressSettings, Error};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

pub(crate) fn new_compressor<W: Write>(outv: W, settings: &CompressSettings) -> ZlibEncoder<W> {
    let level = if settings.level == 0 {
        Compression::none()
    } else {
        Compression::new(settings.level.min(9).into())
    };
    ZlibEncoder::new(outv, level)
}

#[inline(never)]
pub(crate) fn compress_into(out: &mut dyn Write, inp: &[u8], settings: &CompressSettings) -> Result<(), Error> {
    if let Some(cb) = settings.custom_zlib {
        (cb)(inp, out, settings)?;
    } else {
        let mut z = new_compressor(out, settings);
        z.write_all(inp)?;
        z.finish()?;
    }
    Ok(())
}

/// Whole zlib stream (header, deflate data, adler32) for the `IDAT` chunk(s)
pub(crate) fn compress(inp: &[u8], settings: &CompressSettings) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    out.try_reserve(inp.len() / 2 + 64)?;
    compress_into(&mut out, inp, settings)?;
    Ok(out)
}
