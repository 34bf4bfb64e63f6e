use std::path::Path;

/// Five vertical color bands, repeated `band` times per row and `band` rows high
fn bands(band: usize, colors: &[&[u8]]) -> Vec<u8> {
    let mut row = Vec::new();
    for color in colors {
        for _ in 0..band {
            row.extend_from_slice(color);
        }
    }
    row.repeat(band)
}

fn main() {
    let band = 31;
    let rgb = bands(band, &[&[255, 255, 255], &[255, 0, 0], &[0, 255, 0], &[0, 0, 255], &[0, 0, 0]]);

    // 5 colors, so this one gets a palette
    let path = Path::new("write_test_rgb.png");
    if let Err(e) = palpng::encode_file(path, &rgb, (band * 5) as u32, band as u32, false) {
        panic!("failed to write png: {}", e);
    }

    let band = 2;
    let rgba = bands(band, &[&[255, 255, 255, 255], &[255, 0, 0, 255], &[0, 255, 0, 255], &[0, 0, 255, 255], &[0, 0, 0, 255]]);
    let path = Path::new("write_test_rgba.png");
    match palpng::encode_file(path, &rgba, (band * 5) as u32, band as u32, true) {
        Err(e) => panic!("failed to write png: {}", e),
        Ok(_) => (),
    }
}
