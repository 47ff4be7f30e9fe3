//! Animation loop driven by a watch channel of sun intervals.

mod common;

use chrono::Duration as ChronoDuration;
use common::fixtures;
use std::time::Duration;
use sunpath::models::{AnimationConfig, Theme, ThemeFlag};
use sunpath::services::{AnimationLoop, FixedClock, FrameQueue, FrameScheduler, SunPathRenderer};
use tokio::sync::watch;

fn config(limit: u64) -> AnimationConfig {
    AnimationConfig {
        fps: 500,
        snapshot_every: 50,
        frame_limit: Some(limit),
        refresh_secs: 600,
    }
}

#[tokio::test]
async fn test_new_interval_restarts_single_loop() {
    let mut renderer = SunPathRenderer::new(
        FrameQueue::new(),
        FixedClock::new(fixtures::sunrise() + ChronoDuration::hours(2)),
        ThemeFlag::new(Theme::Dark),
    );
    let mut canvas = fixtures::canvas(160.0, 80.0, 1.0);
    let (tx, rx) = watch::channel(Some(fixtures::daylight(8)));

    let animation = AnimationLoop::new(&config(150));
    let publisher = async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(Some(fixtures::daylight(12))).unwrap();
        tx
    };

    let (stats, _tx) = tokio::join!(animation.run(&mut renderer, &mut canvas, rx), publisher);
    let stats = stats.unwrap();

    assert_eq!(stats.frames, 150);
    assert_eq!(stats.restarts, 2);
    assert_eq!(renderer.scheduler().pending(), 1);
    assert_eq!(renderer.interval(), Some(fixtures::daylight(12)));
}

#[tokio::test]
async fn test_loop_waits_for_first_interval() {
    let mut renderer = SunPathRenderer::new(
        FrameQueue::new(),
        FixedClock::new(fixtures::sunrise()),
        ThemeFlag::new(Theme::Light),
    );
    let mut canvas = fixtures::canvas(160.0, 80.0, 1.0);
    let (tx, rx) = watch::channel(None);
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("frame.png");

    let animation = AnimationLoop::new(&config(20)).with_snapshot_path(&output);
    let publisher = async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.send(Some(fixtures::daylight(10))).unwrap();
        tx
    };

    let (stats, _tx) = tokio::join!(animation.run(&mut renderer, &mut canvas, rx), publisher);
    let stats = stats.unwrap();

    assert_eq!(stats.frames, 20);
    assert_eq!(stats.restarts, 1);
    assert_eq!(stats.snapshots, 1);

    let image = common::assert_png(&std::fs::read(&output).unwrap());
    assert_eq!((image.width, image.height), (160, 80));
}
