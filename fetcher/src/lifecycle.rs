use std::cell::Cell;
use std::rc::Rc;

/// Mount state and call generation for one fetcher instance.
///
/// Every call claims a new generation; at most one generation is current
/// at a time. A future holding an older generation has been superseded
/// and must not write state or keep retrying. Cancellation is
/// cooperative: the superseded future keeps running, it just loses the
/// ability to mutate state.
#[derive(Clone)]
pub(crate) struct LifecycleGuard {
    inner: Rc<GuardInner>,
}

struct GuardInner {
    mounted: Cell<bool>,
    generation: Cell<u64>,
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self {
            inner: Rc::new(GuardInner {
                mounted: Cell::new(true),
                generation: Cell::new(0),
            }),
        }
    }
}

impl LifecycleGuard {
    /// Claim a new generation, superseding any in-flight call.
    pub fn begin(&self) -> u64 {
        let next = self.inner.generation.get() + 1;
        self.inner.generation.set(next);
        next
    }

    /// Supersede the in-flight call without starting a new one.
    pub fn cancel(&self) {
        self.inner.generation.set(self.inner.generation.get() + 1);
    }

    /// Tear down: cancel and make all further state writes no-ops.
    pub fn unmount(&self) {
        self.inner.mounted.set(false);
        self.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// True while `generation` is the latest call and the instance is
    /// still mounted, i.e. the caller may write state.
    pub fn is_current(&self, generation: u64) -> bool {
        self.inner.mounted.get()
            && self.inner.generation.get() == generation
    }
}
