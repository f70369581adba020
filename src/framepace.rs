use std::time::{Duration, Instant};

/// Measures frametime and optionally sleeps out the tail of each frame to
/// hold a fixed framerate.
pub struct Framepacer {
    frame_start: Instant,
    last_frametime: f32,
}

impl Framepacer {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            last_frametime: 1.0 / 60.0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Frametime of the last completed frame.
    pub fn frametime(&self) -> f32 {
        self.last_frametime
    }

    pub fn framerate(&self) -> f32 {
        1.0 / self.last_frametime
    }

    pub fn end_frame(&mut self, limit_frametime: f32) {
        if limit_frametime > f32::EPSILON && limit_frametime.is_finite() {
            const ACCURACY: f32 = 0.0001; // 100 microseconds
            let sleep_time = limit_frametime - self.frame_start.elapsed().as_secs_f32() - ACCURACY;

            if sleep_time > 0.0 {
                std::thread::sleep(Duration::from_secs_f32(sleep_time));

                while self.frame_start.elapsed().as_secs_f32() < limit_frametime {
                    std::thread::yield_now();
                }
            }
        }

        self.last_frametime = self.frame_start.elapsed().as_secs_f32();
    }
}

impl Default for Framepacer {
    fn default() -> Self {
        Self::new()
    }
}
