//! Assertion helpers for tests.

use std::io::Cursor;

/// Decoded RGBA image
pub struct Rgba8Image {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Rgba8Image {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Assert bytes are a PNG and decode them
pub fn assert_png(bytes: &[u8]) -> Rgba8Image {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );

    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().expect("PNG header should decode");
    let mut data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut data).expect("PNG frame should decode");
    assert_eq!(info.color_type, png::ColorType::Rgba);
    data.truncate(info.buffer_size());

    Rgba8Image {
        width: info.width,
        height: info.height,
        data,
    }
}

/// Assert a pixel is within `tolerance` of an opaque RGB colour
pub fn assert_color_near(actual: [u8; 4], expected: (u8, u8, u8), tolerance: u8) {
    let close = |a: u8, e: u8| a.abs_diff(e) <= tolerance;
    assert!(
        close(actual[0], expected.0)
            && close(actual[1], expected.1)
            && close(actual[2], expected.2)
            && actual[3] == 255,
        "Expected ~{expected:?} (±{tolerance}), got {actual:?}"
    );
}
