use crate::error::RenderError;
use resvg::usvg::{self, Transform};
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rasterizes SVG frames and encodes pixmaps as PNG.
///
/// Holds the font database used for the arc labels. Parsing is cheap compared
/// to font discovery, so one renderer is shared by every canvas.
pub struct SvgRenderer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRenderer {
    /// Create a renderer with the given font files loaded ahead of system fonts
    pub fn with_fonts(fonts: Vec<(String, Vec<u8>)>) -> Self {
        let mut fontdb = fontdb::Database::new();

        for (name, data) in fonts {
            fontdb.load_font_data(data);
            tracing::debug!(font = %name, "Loaded font");
        }

        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for label rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a renderer with system fonts only
    pub fn new() -> Self {
        Self::with_fonts(Vec::new())
    }

    /// Parse `svg_data` and draw it over `pixmap` at 1:1 scale.
    ///
    /// The pixmap is cleared to transparent first.
    pub fn rasterize_into(&self, svg_data: &[u8], pixmap: &mut Pixmap) -> Result<(), RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        pixmap.fill(tiny_skia::Color::TRANSPARENT);
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(())
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a pixmap as 8-bit RGBA PNG.
///
/// tiny-skia stores premultiplied alpha; PNG wants straight alpha.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4" viewBox="0 0 4 4">
      <rect x="0" y="0" width="2" height="4" fill="#ff0000"/>
    </svg>"##;

    #[test]
    fn test_rasterize_fills_pixels() {
        let renderer = SvgRenderer::with_fonts(Vec::new());
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        renderer.rasterize_into(RED_SQUARE.as_bytes(), &mut pixmap).unwrap();

        let left = pixmap.pixel(0, 0).unwrap().demultiply();
        assert_eq!((left.red(), left.alpha()), (255, 255));

        let right = pixmap.pixel(3, 0).unwrap();
        assert_eq!(right.alpha(), 0);
    }

    #[test]
    fn test_invalid_svg_is_parse_error() {
        let renderer = SvgRenderer::new();
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        let result = renderer.rasterize_into(b"<svg", &mut pixmap);
        assert!(matches!(result, Err(RenderError::SvgParse(_))));
    }

    #[test]
    fn test_rasterize_clears_previous_contents() {
        let renderer = SvgRenderer::with_fonts(Vec::new());
        let mut pixmap = Pixmap::new(4, 4).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(0, 0, 255, 255));

        renderer.rasterize_into(RED_SQUARE.as_bytes(), &mut pixmap).unwrap();
        assert_eq!(pixmap.pixel(3, 3).unwrap().alpha(), 0);
    }

    #[test]
    fn test_encode_png_signature() {
        let pixmap = Pixmap::new(3, 2).unwrap();
        let png = encode_png(&pixmap).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
