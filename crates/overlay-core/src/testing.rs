//! Fixtures shared by this crate's tests and by downstream test suites

/// A blank RGB PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&vec![255u8; (width * height * 3) as usize])
            .unwrap();
    }
    out
}
