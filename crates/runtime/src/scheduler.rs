use crate::frame::Frame;
use crate::task::FrameTask;

/// Runs registered frame tasks in a deterministic order.
///
/// The scheduler owns no timer. Whoever drives it (a display callback, a
/// tokio interval, or a test) calls [`FrameScheduler::run_frame`] per tick.
#[derive(Default)]
pub struct FrameScheduler {
    next_order: u64,
    tasks: Vec<(u64, Box<dyn FrameTask>)>,
    frames_run: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task(&mut self, task: impl FrameTask + 'static) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.tasks.push((order, Box::new(task)));
        // Total ordering: (priority, name, insertion_order).
        self.tasks.sort_by(|(oa, a), (ob, b)| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| a.name().cmp(b.name()))
                .then_with(|| oa.cmp(ob))
        });
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Run every task once for `frame`.
    pub fn run_frame(&mut self, frame: Frame) {
        for (_order, task) in &mut self.tasks {
            task.run(frame);
        }
        self.frames_run += 1;
    }
}
