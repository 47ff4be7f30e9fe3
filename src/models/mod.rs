pub mod config;
pub mod sun_interval;
pub mod theme;

pub use config::{AnimationConfig, AppConfig, CanvasConfig, LocationConfig, OpenWeatherConfig};
pub use sun_interval::SunInterval;
pub use theme::{Theme, ThemeFlag};
