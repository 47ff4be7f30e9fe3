pub mod animation_loop;
pub mod scheduler;
pub mod sun_data;
pub mod sun_path;

pub use animation_loop::{AnimationLoop, LoopStats};
pub use scheduler::{AnimationHandle, Clock, FixedClock, FrameQueue, FrameScheduler, SystemClock};
pub use sun_data::{format_local, OpenWeatherClient, SunDataSource, SunReport};
pub use sun_path::SunPathRenderer;
