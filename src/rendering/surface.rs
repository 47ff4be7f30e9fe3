//! High-DPI surface preparation.
//!
//! Resizing a backing buffer clears it, so every surface remembers the CSS
//! size and pixel ratio of its last resize and is only touched again when one
//! of them changes.

use super::context::DrawContext;

/// On-screen bounding box in CSS pixels. May be fractional or zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CssBox {
    pub width: f64,
    pub height: f64,
}

impl CssBox {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An element that can be drawn on, such as a canvas.
pub trait DrawingSurface {
    type Context: DrawContext;

    fn bounding_box(&self) -> CssBox;

    fn device_pixel_ratio(&self) -> f64;

    /// Set the element's layout size in CSS pixels
    fn set_layout_size(&mut self, width: u32, height: u32);

    /// Reallocate the pixel buffer. Clears its contents.
    fn resize_backing(&mut self, width: u32, height: u32);

    fn context(&mut self) -> &mut Self::Context;

    /// Dimensions applied by the last resize of this surface
    fn surface_state(&self) -> Option<SurfaceState>;

    fn set_surface_state(&mut self, state: SurfaceState);
}

/// Cached dimensions from the last resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceState {
    pub css_width: u32,
    pub css_height: u32,
    pub ratio: f64,
}

/// Surface ready for drawing in CSS pixel units
#[derive(Debug)]
pub struct PreparedSurface<'a, C> {
    pub css_width: u32,
    pub css_height: u32,
    pub context: &'a mut C,
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SurfacePreparer;

impl SurfacePreparer {
    /// Size `surface` so one drawing unit equals one CSS pixel.
    ///
    /// Returns `None` for a missing surface; callers skip drawing.
    pub fn prepare<'a, S: DrawingSurface>(
        surface: Option<&'a mut S>,
    ) -> Option<PreparedSurface<'a, S::Context>> {
        let surface = surface?;

        let ratio = normalize_ratio(surface.device_pixel_ratio());
        let rect = surface.bounding_box();
        let css_width = css_extent(rect.width);
        let css_height = css_extent(rect.height);

        let next = SurfaceState {
            css_width,
            css_height,
            ratio,
        };

        if surface.surface_state() != Some(next) {
            let backing_width = backing_extent(css_width, ratio);
            let backing_height = backing_extent(css_height, ratio);
            tracing::debug!(
                css_width,
                css_height,
                ratio,
                backing_width,
                backing_height,
                "Resizing drawing surface"
            );

            surface.set_layout_size(css_width, css_height);
            surface.resize_backing(backing_width, backing_height);
            surface.context().set_scale(ratio);
            surface.set_surface_state(next);
        }

        Some(PreparedSurface {
            css_width,
            css_height,
            context: surface.context(),
            ratio,
        })
    }
}

fn normalize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

fn css_extent(value: f64) -> u32 {
    if value.is_finite() {
        value.floor().clamp(1.0, u32::MAX as f64) as u32
    } else {
        1
    }
}

fn backing_extent(css: u32, ratio: f64) -> u32 {
    (css as f64 * ratio).floor().clamp(1.0, u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::testing::RecordingSurface;

    #[test]
    fn test_missing_surface_yields_none() {
        let prepared = SurfacePreparer::prepare::<RecordingSurface>(None);
        assert!(prepared.is_none());
    }

    #[test]
    fn test_first_prepare_sizes_backing_by_ratio() {
        let mut surface = RecordingSurface::new(300.7, 150.2, 2.0);

        let prepared = SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        assert_eq!((prepared.css_width, prepared.css_height), (300, 150));
        assert_eq!(prepared.ratio, 2.0);

        assert_eq!(surface.layout_size, Some((300, 150)));
        assert_eq!(surface.backing_size, Some((600, 300)));
        assert_eq!(surface.scale, Some(2.0));
        assert_eq!(surface.resize_count, 1);
    }

    #[test]
    fn test_unchanged_dimensions_skip_resize() {
        let mut surface = RecordingSurface::new(320.0, 160.0, 1.5);

        SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        let prepared = SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        assert_eq!((prepared.css_width, prepared.css_height), (320, 160));

        assert_eq!(surface.resize_count, 1);
        assert_eq!(surface.layout_count, 1);
        assert_eq!(surface.scale_count, 1);
    }

    #[test]
    fn test_fractional_change_within_same_pixel_is_fast_path() {
        let mut surface = RecordingSurface::new(320.2, 160.0, 1.0);

        SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        surface.rect = CssBox::new(320.9, 160.4);
        SurfacePreparer::prepare(Some(&mut surface)).unwrap();

        assert_eq!(surface.resize_count, 1);
    }

    #[test]
    fn test_ratio_change_triggers_resize() {
        let mut surface = RecordingSurface::new(100.0, 50.0, 1.0);

        SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        surface.ratio = 3.0;
        SurfacePreparer::prepare(Some(&mut surface)).unwrap();

        assert_eq!(surface.resize_count, 2);
        assert_eq!(surface.backing_size, Some((300, 150)));
        assert_eq!(surface.scale, Some(3.0));
    }

    #[test]
    fn test_resize_triggers_on_css_change() {
        let mut surface = RecordingSurface::new(100.0, 50.0, 1.0);

        SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        surface.rect = CssBox::new(200.0, 50.0);
        SurfacePreparer::prepare(Some(&mut surface)).unwrap();

        assert_eq!(surface.resize_count, 2);
        assert_eq!(surface.layout_size, Some((200, 50)));
    }

    #[test]
    fn test_zero_box_clamps_to_one() {
        let mut surface = RecordingSurface::new(0.0, 0.4, 0.5);

        let prepared = SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        assert_eq!((prepared.css_width, prepared.css_height), (1, 1));
        assert_eq!(surface.backing_size, Some((1, 1)));
    }

    #[test]
    fn test_state_is_cached_per_surface() {
        let mut first = RecordingSurface::new(400.0, 200.0, 2.0);
        let mut second = RecordingSurface::new(400.0, 200.0, 2.0);

        SurfacePreparer::prepare(Some(&mut first)).unwrap();
        SurfacePreparer::prepare(Some(&mut second)).unwrap();

        assert_eq!(second.resize_count, 1);
        assert_eq!(second.backing_size, Some((800, 400)));
        assert_eq!(second.scale, Some(2.0));
        assert_eq!(
            first.surface_state(),
            Some(SurfaceState {
                css_width: 400,
                css_height: 200,
                ratio: 2.0,
            })
        );
    }

    #[test]
    fn test_invalid_ratio_defaults_to_one() {
        let mut surface = RecordingSurface::new(10.0, 10.0, 0.0);

        let prepared = SurfacePreparer::prepare(Some(&mut surface)).unwrap();
        assert_eq!(prepared.ratio, 1.0);
        assert_eq!(surface.backing_size, Some((10, 10)));
    }
}
