//! The once-per-second tick registration.
//!
//! The engine holds at most one [`TickHandle`] at a time: it registers on
//! `start` and deregisters on `pause`, `reset` and when all cycles complete.

/// Opaque handle for a live periodic registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// A source of periodic one-second notifications.
pub trait TickSource {
    fn register(&mut self) -> TickHandle;
    fn deregister(&mut self, handle: TickHandle);
}

/// Tick source driven by hand: the caller invokes `tick()` itself.
///
/// Tracks registrations so tests can check that only one is ever live.
#[derive(Debug, Default)]
pub struct ManualTicker {
    next_id: u64,
    live: Vec<TickHandle>,
    registrations: u64,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations.
    pub fn active(&self) -> usize {
        self.live.len()
    }

    /// Total registrations ever made.
    pub fn registrations(&self) -> u64 {
        self.registrations
    }
}

impl TickSource for ManualTicker {
    fn register(&mut self) -> TickHandle {
        self.next_id += 1;
        self.registrations += 1;
        let handle = TickHandle::new(self.next_id);
        self.live.push(handle);
        handle
    }

    fn deregister(&mut self, handle: TickHandle) {
        self.live.retain(|h| *h != handle);
    }
}

impl<T: TickSource + ?Sized> TickSource for &mut T {
    fn register(&mut self) -> TickHandle {
        (**self).register()
    }

    fn deregister(&mut self, handle: TickHandle) {
        (**self).deregister(handle)
    }
}
