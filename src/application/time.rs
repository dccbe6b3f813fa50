use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of frames the frame rate is averaged over.
const FPS_WINDOW: usize = 60;

/// Per-frame information handed to the application.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInfo {
    /// Index of this frame, starting at 0.
    pub index: u64,
    /// Time elapsed since the previous frame.
    pub delta: Duration,
    /// Frames per second, averaged over the recent frames.
    pub fps: f32,
    /// Size of the window in points.
    pub dimensions: (u32, u32),
    /// Size of the default framebuffer in pixels.
    pub framebuffer: (u32, u32),
    pub device_pixel_ratio: f32,
}

impl FrameInfo {
    #[inline]
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs() as f32 + self.delta.subsec_nanos() as f32 * 1e-9
    }
}

#[derive(Debug)]
pub struct FrameTimer {
    index: u64,
    last: Option<Instant>,
    history: VecDeque<Duration>,
    total: Duration,
}

impl Default for FrameTimer {
    fn default() -> Self {
        FrameTimer::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        FrameTimer {
            index: 0,
            last: None,
            history: VecDeque::with_capacity(FPS_WINDOW),
            total: Duration::from_secs(0),
        }
    }

    /// Starts a new frame at `now`, returning its index, the time elapsed
    /// since the previous frame and the averaged frame rate.
    pub fn advance(&mut self, now: Instant) -> (u64, Duration, f32) {
        let delta = match self.last {
            Some(last) if now > last => now - last,
            _ => Duration::from_secs(0),
        };

        self.last = Some(now);
        if self.index > 0 {
            self.history.push_back(delta);
            self.total += delta;
            if self.history.len() > FPS_WINDOW {
                if let Some(v) = self.history.pop_front() {
                    self.total -= v;
                }
            }
        }

        let index = self.index;
        self.index += 1;
        (index, delta, self.fps())
    }

    /// Number of frames started so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.index
    }

    /// Frames per second over the recent frames, or 0 before the second frame.
    pub fn fps(&self) -> f32 {
        let secs = self.total.as_secs() as f32 + self.total.subsec_nanos() as f32 * 1e-9;
        if self.history.is_empty() || secs <= 0.0 {
            0.0
        } else {
            self.history.len() as f32 / secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance() {
        let mut timer = FrameTimer::new();
        let start = Instant::now();

        let (index, delta, fps) = timer.advance(start);
        assert_eq!(index, 0);
        assert_eq!(delta, Duration::from_secs(0));
        assert_eq!(fps, 0.0);

        for i in 1..=10 {
            let (index, delta, _) = timer.advance(start + Duration::from_millis(20 * i));
            assert_eq!(index, i);
            assert_eq!(delta, Duration::from_millis(20));
        }

        assert!((timer.fps() - 50.0).abs() < 0.01);
    }

    #[test]
    fn window() {
        let mut timer = FrameTimer::new();
        let start = Instant::now();
        for i in 0..200 {
            timer.advance(start + Duration::from_millis(10 * i));
        }

        assert_eq!(timer.history.len(), FPS_WINDOW);
        assert!((timer.fps() - 100.0).abs() < 0.01);
    }
}
