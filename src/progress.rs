// src/progress.rs
/// Lightweight progress reporting for the patrol loop. The CLI frontend
/// prints lines; tests record calls; NullProgress ignores everything.
pub trait Progress {
    /// Called at the start with the number of facilities in the run.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One facility finished; `found` is its record count so far this run.
    fn target_done(&mut self, _name: &str, _found: usize) {}

    /// One facility abandoned after a contained failure.
    fn target_failed(&mut self, _name: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
