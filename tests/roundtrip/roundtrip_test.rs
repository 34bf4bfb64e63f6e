use palpng::*;
use std::io::Read;

#[test]
fn roundtrip_rgb_truecolor() {
    roundtrip_color(false, 256);
}

#[test]
fn roundtrip_rgb_palette() {
    roundtrip_color(false, 6);
}

#[test]
fn roundtrip_rgba() {
    roundtrip_color(true, 256);
}

#[test]
fn roundtrip_rgba_few_colors() {
    roundtrip_color(true, 3);
}

#[track_caller]
fn roundtrip_color(has_alpha: bool, levels: u32) {
    let channels = if has_alpha { 4 } else { 3 };
    let mut data = vec![0; 256 * 256 * channels];
    for width in [1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 64, 127] {
        randomize(&mut data, levels);
        for height in [1, 2, 3, 4, 5, 9, 16, 17, 64] {
            let data = &data[..width * height * channels];
            roundtrip_data(data, width, height, has_alpha);
        }
    }
}

/// Fills with pseudo-random samples, each one of `levels` values
fn randomize(data: &mut [u8], levels: u32) {
    let mut seed = u32::from(data[0]) + 1;
    for b in data {
        seed = 1103515245u32.wrapping_mul(seed).wrapping_add(12345);
        *b = ((seed >> 17) % levels * (255 / (levels - 1).max(1))) as u8;
    }
}

#[track_caller]
fn roundtrip_data(data: &[u8], width: usize, height: usize, has_alpha: bool) {
    let file = encode_memory(data, width as u32, height as u32, has_alpha).unwrap();

    let img = decode_with_png_crate(&file);
    assert_img_equals(&img, width, height, data);

    let img = unfilter_png(&file);
    assert_img_equals(&img, width, height, data);
}

struct Decoded {
    width: usize,
    height: usize,
    buffer: Vec<u8>,
}

#[track_caller]
fn assert_img_equals(img: &Decoded, width: usize, height: usize, data: &[u8]) {
    assert_eq!(img.width, width);
    assert_eq!(img.height, height);
    assert_eq!(data, &img.buffer[..]);
}

fn decode_with_png_crate(file: &[u8]) -> Decoded {
    let mut decoder = png::Decoder::new(file);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().unwrap();
    let mut buffer = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buffer).unwrap();
    buffer.truncate(frame.buffer_size());
    Decoded {
        width: frame.width as usize,
        height: frame.height as usize,
        buffer,
    }
}

/// Reverses the filters by hand, checking the container along the way
fn unfilter_png(file: &[u8]) -> Decoded {
    assert_eq!(&file[..8], &PNG_SIGNATURE);
    let mut chunks = ChunksIter::from_png(file);
    let ihdr = chunks.next().unwrap();
    assert!(ihdr.is_type("IHDR"));
    let h = ihdr.data();
    assert_eq!(13, h.len());
    let width = u32::from_be_bytes([h[0], h[1], h[2], h[3]]) as usize;
    let height = u32::from_be_bytes([h[4], h[5], h[6], h[7]]) as usize;
    assert_eq!(8, h[8]);
    assert_eq!(&h[10..], &[0, 0, 0]);

    let mut palette = None;
    let mut zlib = Vec::new();
    let mut seen_end = false;
    for ch in chunks {
        assert!(ch.check_crc());
        assert!(!seen_end);
        match &ch.name() {
            b"PLTE" => {
                assert!(zlib.is_empty(), "PLTE after IDAT");
                palette = Some(ch.data().to_vec());
            },
            b"IDAT" => zlib.extend_from_slice(ch.data()),
            b"IEND" => {
                assert!(ch.is_empty());
                seen_end = true;
            },
            other => panic!("unexpected chunk {:?}", other),
        }
    }
    assert!(seen_end);

    let mut raw = Vec::new();
    flate2::read::ZlibDecoder::new(&zlib[..]).read_to_end(&mut raw).unwrap();

    let (bpp, palette) = match h[9] {
        2 => (3, None),
        3 => (1, Some(palette.expect("PLTE"))),
        6 => (4, None),
        other => panic!("color type {}", other),
    };
    let linebytes = width * bpp;
    assert_eq!(raw.len(), (linebytes + 1) * height);

    let mut out = vec![0u8; linebytes * height];
    for y in 0..height {
        let line = &raw[y * (linebytes + 1)..(y + 1) * (linebytes + 1)];
        let filter_type = line[0];
        assert!(filter_type < 4, "filter {}", filter_type);
        if palette.is_some() {
            assert_eq!(0, filter_type);
        }
        let (done, rest) = out.split_at_mut(y * linebytes);
        let prev = if y > 0 { Some(&done[(y - 1) * linebytes..]) } else { None };
        let recon = &mut rest[..linebytes];
        for i in 0..linebytes {
            let left = if i >= bpp { recon[i - bpp] } else { 0 };
            let up = prev.map_or(0, |p| p[i]);
            let pred = match filter_type {
                0 => 0,
                1 => left,
                2 => up,
                _ => ((u16::from(left) + u16::from(up)) / 2) as u8,
            };
            recon[i] = line[1 + i].wrapping_add(pred);
        }
    }

    let buffer = match palette {
        Some(plte) => out.iter().flat_map(|&idx| {
            let idx = idx as usize * 3;
            assert!(idx + 3 <= plte.len());
            [plte[idx], plte[idx + 1], plte[idx + 2]]
        }).collect(),
        None => out,
    };
    Decoded { width, height, buffer }
}
