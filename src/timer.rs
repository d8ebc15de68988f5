//! Frame timing: a smoothed per-frame delta and a frames-per-second readout.
//!
//! Raw frame deltas are noisy, so animation code consumes an average over the
//! most recent samples instead. The frames-per-second value counts whole
//! frames over rolling one-second windows and latches between them, which
//! keeps a window-title readout stable enough to read.

use std::collections::VecDeque;

use instant::{Duration, Instant};

/// Number of recent frame deltas blended into the smoothed value.
const MAX_SAMPLE_COUNT: usize = 50;

/// A delta this many times larger than the rolling average is a stall, not a
/// frame (debugger breaks, window drags, resume from minimize): it restarts
/// the sample window and is itself discarded.
const DEVIATION_FACTOR: f32 = 10.0;

#[derive(Debug)]
pub struct FrameTimer {
    last: Instant,
    samples: VecDeque<f32>,
    smoothed: f32,
    fps_frame_count: u32,
    fps_time_elapsed: f32,
    frame_rate: u32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            samples: VecDeque::with_capacity(MAX_SAMPLE_COUNT),
            smoothed: 0.0,
            fps_frame_count: 0,
            fps_time_elapsed: 0.0,
            frame_rate: 0,
        }
    }

    /// Advance the timer by one frame and return the smoothed delta.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let raw = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        Duration::from_secs_f32(self.register(raw))
    }

    /// Frames counted during the most recent full second.
    ///
    /// Stays at zero until one second of frames has been observed.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    // Blends one raw delta into the sample window and counts it towards the
    // frames-per-second window. Split from `tick` so it can run on synthetic
    // deltas.
    fn register(&mut self, raw_dt: f32) -> f32 {
        if !self.samples.is_empty() && raw_dt > DEVIATION_FACTOR * self.smoothed {
            // A stall. Restart the window and hold the previous smoothed
            // value; the animation must not jump by the whole pause.
            self.samples.clear();
        } else {
            if self.samples.len() == MAX_SAMPLE_COUNT {
                self.samples.pop_front();
            }
            self.samples.push_back(raw_dt);
            self.smoothed = self.samples.iter().sum::<f32>() / self.samples.len() as f32;
        }

        self.fps_frame_count += 1;
        self.fps_time_elapsed += raw_dt;
        if self.fps_time_elapsed >= 1.0 {
            self.frame_rate = self.fps_frame_count;
            self.fps_frame_count = 0;
            self.fps_time_elapsed = 0.0;
        }

        self.smoothed
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooths_over_recent_samples() {
        let mut timer = FrameTimer::new();
        assert!((timer.register(0.010) - 0.010).abs() < 1e-6);
        let dt = timer.register(0.020);
        assert!((dt - 0.015).abs() < 1e-6);
    }

    #[test]
    fn sample_window_is_bounded() {
        let mut timer = FrameTimer::new();
        for _ in 0..200 {
            timer.register(0.016);
        }
        assert_eq!(timer.samples.len(), MAX_SAMPLE_COUNT);
        assert!((timer.smoothed - 0.016).abs() < 1e-6);
    }

    #[test]
    fn hitch_restarts_the_window() {
        let mut timer = FrameTimer::new();
        for _ in 0..50 {
            timer.register(0.010);
        }
        // A two second stall dwarfs the 10 ms average: the window restarts
        // and the next ordinary frame seeds it alone.
        timer.register(2.0);
        assert!(timer.samples.is_empty());
        let dt = timer.register(0.012);
        assert!((dt - 0.012).abs() < 1e-6);
        assert_eq!(timer.samples.len(), 1);
    }

    #[test]
    fn stall_reports_the_previous_smoothed_delta() {
        let mut timer = FrameTimer::new();
        for _ in 0..50 {
            timer.register(0.010);
        }
        // Three seconds of wall clock must not surface as a three second
        // frame delta; the cubes would tumble the whole pause in one step.
        let dt = timer.register(3.0);
        assert!((dt - 0.010).abs() < 1e-6);
    }

    #[test]
    fn frame_rate_latches_once_per_second() {
        let mut timer = FrameTimer::new();
        assert_eq!(timer.frame_rate(), 0);
        // 0.25 is exact in binary, so four frames make exactly one second.
        for _ in 0..4 {
            timer.register(0.25);
        }
        assert_eq!(timer.frame_rate(), 4);
        // The value holds between windows.
        timer.register(0.25);
        assert_eq!(timer.frame_rate(), 4);
    }
}
