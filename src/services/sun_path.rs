//! Animated sun path renderer.
//!
//! Owns everything the redraw loop needs between frames: the current
//! interval and the pending animation handle. Surface size caching lives on
//! the surface itself.

use crate::models::{SunInterval, ThemeFlag};
use crate::rendering::{draw_frame, DrawingSurface, FrameReport, SurfacePreparer};

use super::scheduler::{AnimationHandle, Clock, FrameScheduler};

pub struct SunPathRenderer<S, C> {
    scheduler: S,
    clock: C,
    theme: ThemeFlag,
    interval: Option<SunInterval>,
    handle: Option<AnimationHandle>,
    frames_drawn: u64,
}

impl<S: FrameScheduler, C: Clock> SunPathRenderer<S, C> {
    pub fn new(scheduler: S, clock: C, theme: ThemeFlag) -> Self {
        Self {
            scheduler,
            clock,
            theme,
            interval: None,
            handle: None,
            frames_drawn: 0,
        }
    }

    /// Start animating a new interval.
    ///
    /// Cancels any pending frame first, so only one redraw loop is ever live.
    /// A missing surface makes this a no-op.
    pub fn draw<D: DrawingSurface>(
        &mut self,
        surface: Option<&mut D>,
        interval: SunInterval,
    ) -> Option<FrameReport> {
        let Some(surface) = surface else {
            tracing::debug!("No drawing surface, skipping sun path");
            return None;
        };

        self.cancel();
        tracing::info!(
            sunrise = %interval.sunrise,
            sunset = %interval.sunset,
            "Starting sun path animation"
        );
        self.interval = Some(interval);
        self.render_frame(Some(surface))
    }

    /// Produce one frame and schedule the next.
    ///
    /// Replaces any frame still pending. Without a surface or an interval
    /// nothing is drawn and the loop stops.
    pub fn render_frame<D: DrawingSurface>(&mut self, surface: Option<&mut D>) -> Option<FrameReport> {
        self.cancel();
        let interval = self.interval?;
        let prepared = SurfacePreparer::prepare(surface)?;

        let report = draw_frame(
            prepared.context,
            prepared.css_width,
            prepared.css_height,
            &interval,
            self.clock.now(),
            self.theme.get(),
        );
        self.frames_drawn += 1;
        tracing::trace!(
            progress = report.position.progress,
            x = report.sun.x,
            y = report.sun.y,
            "Drew sun path frame"
        );

        self.handle = Some(self.scheduler.request_frame());
        Some(report)
    }

    /// Stop the loop by cancelling the pending frame, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn handle(&self) -> Option<AnimationHandle> {
        self.handle
    }

    pub fn interval(&self) -> Option<SunInterval> {
        self.interval
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn theme(&self) -> &ThemeFlag {
        &self.theme
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
