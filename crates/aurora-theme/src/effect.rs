//! Dependency-tracked side effects.
//!
//! An [`Effect`] remembers the dependencies it last ran with and the cleanup
//! its run returned. Updating it with equal dependencies does nothing; with
//! different ones it runs the previous cleanup first, then the new body.

/// Undoes what an effect run did.
pub(crate) type Cleanup = Box<dyn FnOnce()>;

pub(crate) struct Effect<D> {
    deps: Option<D>,
    cleanup: Option<Cleanup>,
}

impl<D: PartialEq> Effect<D> {
    pub(crate) fn new() -> Self {
        Self {
            deps: None,
            cleanup: None,
        }
    }

    /// Runs `body` if `deps` changed since the last run. Returns whether it ran.
    pub(crate) fn update<F>(&mut self, deps: D, body: F) -> bool
    where
        F: FnOnce(&D) -> Option<Cleanup>,
    {
        if self.deps.as_ref() == Some(&deps) {
            return false;
        }
        self.run_cleanup();
        self.cleanup = body(&deps);
        self.deps = Some(deps);
        true
    }

    /// Runs the pending cleanup and forgets the dependencies, so the next
    /// update runs unconditionally.
    pub(crate) fn teardown(&mut self) {
        self.run_cleanup();
        self.deps = None;
    }

    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<D> Drop for Effect<D> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}
