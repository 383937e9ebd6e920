/// Frame clock for the render-driven loop
///
/// The stage advances exactly one tick per rendered frame. There is no
/// fixed timestep, so animation speed follows the display refresh rate; the
/// clock only numbers ticks and keeps a rolling FPS estimate for the log.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames averaged into the FPS estimate
const FPS_WINDOW_SIZE: usize = 60;

/// Frames between FPS estimate refreshes
const FPS_REFRESH_INTERVAL: u64 = 10;

/// Frames between FPS log lines
const FPS_LOG_INTERVAL: u64 = 600;

pub struct FrameClock {
    last_frame: Instant,

    /// Most recent frame durations, oldest first
    window: VecDeque<Duration>,
    /// Sum of `window`
    window_total: Duration,

    ticks: u64,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            window: VecDeque::with_capacity(FPS_WINDOW_SIZE),
            window_total: Duration::ZERO,
            ticks: 0,
            fps: 0.0,
        }
    }

    /// Start a frame and return its tick number, counting from 1
    pub fn begin_frame(&mut self) -> u64 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.record(frame_time);
        if self.ticks % FPS_LOG_INTERVAL == 0 {
            log::debug!("Tick {}: {:.1} FPS", self.ticks, self.fps);
        }
        self.ticks
    }

    fn record(&mut self, frame_time: Duration) {
        self.ticks += 1;

        if self.window.len() == FPS_WINDOW_SIZE {
            if let Some(oldest) = self.window.pop_front() {
                self.window_total -= oldest;
            }
        }
        self.window.push_back(frame_time);
        self.window_total += frame_time;

        if self.ticks % FPS_REFRESH_INTERVAL == 0 {
            let average = self.window_total.as_secs_f32() / self.window.len() as f32;
            self.fps = if average > 0.0 { 1.0 / average } else { 0.0 };
        }
    }

    /// Rolling average over the last 60 frames, refreshed every 10 frames
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Ticks (and therefore frames) so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
