//! Host-side frame loop.
//!
//! Plays the role of the display's refresh signal: ticks at a fixed frame
//! rate, fires the renderer's pending frame and restarts the animation
//! whenever a new sun interval arrives.

use crate::error::RenderError;
use crate::models::{AnimationConfig, SunInterval};
use crate::rendering::SvgCanvas;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::scheduler::{Clock, FrameQueue, FrameScheduler};
use super::sun_path::SunPathRenderer;

/// Counters reported when the loop ends
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    /// Frames drawn, including the first frame of each restart
    pub frames: u64,
    /// Times a new interval restarted the animation
    pub restarts: u64,
    /// PNG snapshots written
    pub snapshots: u64,
}

pub struct AnimationLoop {
    fps: u32,
    snapshot_every: u64,
    frame_limit: Option<u64>,
    snapshot_path: Option<PathBuf>,
}

impl AnimationLoop {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            fps: config.fps.max(1),
            snapshot_every: config.snapshot_every.max(1),
            frame_limit: config.frame_limit,
            snapshot_path: None,
        }
    }

    /// Write the canvas to `path` as PNG every `snapshot_every` frames and
    /// once more when the loop ends
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }

    /// Run until the frame limit is reached.
    ///
    /// Without a limit this only returns once the interval sender is gone
    /// and no frame is pending.
    pub async fn run<C: Clock>(
        &self,
        renderer: &mut SunPathRenderer<FrameQueue, C>,
        canvas: &mut SvgCanvas,
        mut intervals: watch::Receiver<Option<SunInterval>>,
    ) -> Result<LoopStats, RenderError> {
        let mut stats = LoopStats::default();
        let mut source_open = true;

        let mut ticker = tokio::time::interval(self.frame_period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(fps = self.fps, limit = ?self.frame_limit, "Animation loop started");

        let initial = *intervals.borrow_and_update();
        if let Some(interval) = initial {
            self.restart(renderer, canvas, interval, &mut stats).await?;
        }

        while !self.limit_reached(&stats) {
            if !source_open && renderer.scheduler().pending() == 0 {
                tracing::debug!("Nothing left to animate");
                break;
            }

            tokio::select! {
                changed = intervals.changed(), if source_open => {
                    if changed.is_err() {
                        tracing::debug!("Sun interval source closed");
                        source_open = false;
                        continue;
                    }
                    let next = *intervals.borrow_and_update();
                    if let Some(interval) = next {
                        self.restart(renderer, canvas, interval, &mut stats).await?;
                    }
                }
                _ = ticker.tick() => {
                    if renderer.scheduler_mut().take_due().is_some()
                        && renderer.render_frame(Some(&mut *canvas)).is_some()
                    {
                        self.frame_done(canvas, &mut stats).await?;
                    }
                }
            }
        }

        if stats.frames > 0 && stats.frames % self.snapshot_every != 0 {
            self.write_snapshot(canvas, &mut stats).await?;
        }

        tracing::info!(
            frames = stats.frames,
            restarts = stats.restarts,
            snapshots = stats.snapshots,
            "Animation loop finished"
        );
        Ok(stats)
    }

    async fn restart<C: Clock>(
        &self,
        renderer: &mut SunPathRenderer<FrameQueue, C>,
        canvas: &mut SvgCanvas,
        interval: SunInterval,
        stats: &mut LoopStats,
    ) -> Result<(), RenderError> {
        if renderer.draw(Some(&mut *canvas), interval).is_some() {
            stats.restarts += 1;
            self.frame_done(canvas, stats).await?;
        }
        Ok(())
    }

    async fn frame_done(&self, canvas: &SvgCanvas, stats: &mut LoopStats) -> Result<(), RenderError> {
        stats.frames += 1;
        if stats.frames % self.snapshot_every == 0 {
            self.write_snapshot(canvas, stats).await?;
        }
        Ok(())
    }

    async fn write_snapshot(&self, canvas: &SvgCanvas, stats: &mut LoopStats) -> Result<(), RenderError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let snapshot = canvas.snapshot()?;
        let png = tokio::task::spawn_blocking(move || snapshot.encode_png()).await??;
        tokio::fs::write(path, &png).await?;
        stats.snapshots += 1;
        tracing::debug!(path = %path.display(), bytes = png.len(), frame = stats.frames, "Wrote snapshot");
        Ok(())
    }

    fn limit_reached(&self, stats: &LoopStats) -> bool {
        self.frame_limit.is_some_and(|limit| stats.frames >= limit)
    }
}
