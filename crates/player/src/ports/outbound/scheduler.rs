//! Deferred execution on the page's event loop.

/// Work to run once after a delay.
pub type DeferredTask = Box<dyn FnOnce()>;

/// One-shot timer abstraction (`setTimeout` in the browser).
///
/// Tasks deferred with the same delay run in the order they were deferred,
/// and never inside the call to [`Scheduler::defer`] itself.
#[cfg_attr(test, mockall::automock)]
pub trait Scheduler: 'static {
    fn defer(&self, delay_ms: u32, task: DeferredTask);
}
