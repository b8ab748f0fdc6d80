/// One render tick.
///
/// Frames are stepped by whoever drives the scheduler. Time is derived from
/// the index and the fixed step, so a test can produce any frame directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based tick count.
    pub index: u64,
    /// Fixed step between ticks, seconds.
    pub dt_s: f64,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self { index, dt_s }
    }

    /// First tick at `target_fps`. A non-positive rate gives a zero step.
    pub fn at_rate(target_fps: f64) -> Self {
        let dt_s = if target_fps > 0.0 { target_fps.recip() } else { 0.0 };
        Self::new(0, dt_s)
    }

    pub fn next(self) -> Self {
        Self {
            index: self.index + 1,
            ..self
        }
    }

    /// Seconds since tick 0.
    pub fn elapsed_s(&self) -> f64 {
        self.index as f64 * self.dt_s
    }
}
