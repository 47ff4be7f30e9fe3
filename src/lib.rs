//! Sunpath - animated sun path diagrams
//!
//! Renders the sun's position between sunrise and sunset on a semicircular
//! arc, onto high-DPI raster surfaces. This library exposes modules for
//! integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
