//! Frame timing for the host loop.
//!
//! The simulation itself advances by the fixed `delta_t` in [`SimParams`];
//! wall-clock time here only paces redraws and feeds the FPS readout.
//!
//! # Example
//!
//! ```ignore
//! use boids::time::Time;
//!
//! let mut time = Time::with_target_fps(Some(60));
//!
//! // In your frame loop:
//! time.update();
//!
//! println!("Frame: {}", time.frame());
//! println!("FPS: {:.1}", time.fps());
//! ```
//!
//! [`SimParams`]: crate::particle::SimParams

use std::time::{Duration, Instant};

/// Frame counting, FPS estimation and frame pacing.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
    /// Minimum spacing between frames, if capped.
    frame_interval: Option<Duration>,
}

impl Time {
    /// Create a new uncapped time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            frame_interval: None,
        }
    }

    /// Create a time tracker that paces frames to `target_fps`.
    pub fn with_target_fps(target_fps: Option<u32>) -> Self {
        let mut time = Self::new();
        time.frame_interval = target_fps
            .filter(|&fps| fps > 0)
            .map(|fps| Duration::from_secs_f64(1.0 / fps as f64));
        time
    }

    /// Record that a frame is being drawn. Call once per frame.
    ///
    /// Returns the time since the previous frame.
    pub fn update(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        delta
    }

    /// When the next frame is due, if frames are capped.
    pub fn next_frame_deadline(&self) -> Option<Instant> {
        self.frame_interval.map(|interval| self.last_frame + interval)
    }

    /// Whether a frame should be drawn at `now`.
    pub fn frame_due(&self, now: Instant) -> bool {
        self.next_frame_deadline().map_or(true, |deadline| now >= deadline)
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
