pub mod context;
pub mod frame;
pub mod sun_position;
pub mod surface;
pub mod svg_canvas;
pub mod svg_to_png;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{DrawContext, Font, GradientStop, Paint, Point, Rect, Rgba, Stroke};
pub use frame::{draw_frame, FrameGeometry, FramePalette, FrameReport};
pub use sun_position::SunPosition;
pub use surface::{CssBox, DrawingSurface, PreparedSurface, SurfacePreparer, SurfaceState};
pub use svg_canvas::{Snapshot, SvgCanvas};
pub use svg_to_png::{encode_png, SvgRenderer};
