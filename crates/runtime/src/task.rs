use crate::frame::Frame;

/// Work executed once per frame by the [`FrameScheduler`](crate::FrameScheduler).
///
/// Tasks are read-only consumers of interaction and feed state: they draw or
/// sample, they never mutate the camera, the cache or the marker set.
pub trait FrameTask {
    /// Stable name used for ordering and diagnostics.
    fn name(&self) -> &'static str;

    /// Smaller values run earlier.
    fn priority(&self) -> i32 {
        0
    }

    fn run(&mut self, frame: Frame);
}

/// Adapts a closure into a [`FrameTask`].
pub struct FnTask<F> {
    name: &'static str,
    priority: i32,
    run: F,
}

impl<F> FnTask<F>
where
    F: FnMut(Frame),
{
    pub fn new(name: &'static str, run: F) -> Self {
        Self {
            name,
            priority: 0,
            run,
        }
    }

    pub fn with_priority(name: &'static str, priority: i32, run: F) -> Self {
        Self {
            name,
            priority,
            run,
        }
    }
}

impl<F> FrameTask for FnTask<F>
where
    F: FnMut(Frame),
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, frame: Frame) {
        (self.run)(frame)
    }
}
