#![no_main]
#[macro_use] extern crate libfuzzer_sys;

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let (seed, data) = data.split_at(2);
    let has_alpha = seed[1] & 1 != 0;
    let bytes_per_pixel = if has_alpha { 4 } else { 3 };
    let width = seed[0] as usize + 1;
    let max_width = width.min(data.len() / bytes_per_pixel);
    if max_width < 1 {
        return;
    }
    let height = data.len() / (max_width * bytes_per_pixel);
    let data = &data[..max_width * height * bytes_per_pixel];

    let file = palpng::encode_memory(data, max_width as u32, height as u32, has_alpha).unwrap();

    let mut decoder = png::Decoder::new(&file[..]);
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    assert_eq!(frame.width as usize, max_width);
    assert_eq!(frame.height as usize, height);
    assert_eq!(data, &buf[..frame.buffer_size()]);
});
