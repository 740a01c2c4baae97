// src/lifecycle/disposable.rs

use std::panic::{AssertUnwindSafe, catch_unwind};

use anyhow::{Result, anyhow};
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// A handle with a single release operation.
///
/// Implementations must tolerate being released more than once; only the
/// first call has an effect.
pub trait Disposable: Send {
    fn release(&mut self) -> Result<()>;
}

/// Disposable wrapping a one-shot cleanup closure.
pub struct FnDisposable {
    cleanup: Option<Box<dyn FnOnce() -> Result<()> + Send>>,
}

impl FnDisposable {
    pub fn is_released(&self) -> bool {
        self.cleanup.is_none()
    }
}

impl Disposable for FnDisposable {
    fn release(&mut self) -> Result<()> {
        match self.cleanup.take() {
            Some(cleanup) => cleanup(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FnDisposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDisposable")
            .field("released", &self.is_released())
            .finish()
    }
}

/// Turn an infallible cleanup closure into a [`Disposable`].
pub fn to_disposable(cleanup: impl FnOnce() + Send + 'static) -> FnDisposable {
    FnDisposable {
        cleanup: Some(Box::new(move || {
            cleanup();
            Ok(())
        })),
    }
}

/// Aborting a background task is its release.
impl Disposable for AbortHandle {
    fn release(&mut self) -> Result<()> {
        self.abort();
        Ok(())
    }
}

/// Ordered collection of disposables released together.
///
/// - Members are released in registration order.
/// - Releasing the set twice releases each member once.
/// - A member that fails (error or panic) is logged and skipped; the sweep
///   always continues with the remaining members.
/// - Dropping an unreleased set releases it.
#[derive(Default)]
pub struct DisposableSet {
    members: Vec<Box<dyn Disposable>>,
    released: bool,
}

impl DisposableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a disposable.
    ///
    /// Adding to a set that was already released releases the newcomer
    /// straight away, so nothing registered late can leak.
    pub fn push(&mut self, disposable: impl Disposable + 'static) {
        let mut boxed: Box<dyn Disposable> = Box::new(disposable);
        if self.released {
            debug!("disposable added to a released set; releasing immediately");
            if let Err(e) = release_one(boxed.as_mut()) {
                warn!(error = %e, "late disposable failed to release");
            }
            return;
        }
        self.members.push(boxed);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Disposable for DisposableSet {
    fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let total = self.members.len();
        let mut failed = 0usize;
        for (index, mut member) in self.members.drain(..).enumerate() {
            if let Err(e) = release_one(member.as_mut()) {
                warn!(index, error = %e, "disposable failed to release");
                failed += 1;
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(anyhow!("{failed} of {total} disposables failed to release"))
        }
    }
}

impl Drop for DisposableSet {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "disposable set released with failures on drop");
        }
    }
}

impl std::fmt::Debug for DisposableSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposableSet")
            .field("members", &self.members.len())
            .field("released", &self.released)
            .finish()
    }
}

fn release_one(member: &mut dyn Disposable) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| member.release())) {
        Ok(res) => res,
        Err(_) => Err(anyhow!("disposable panicked during release")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recording(log: &Arc<Mutex<Vec<usize>>>, id: usize) -> FnDisposable {
        let log = Arc::clone(log);
        to_disposable(move || log.lock().unwrap().push(id))
    }

    struct Failing;

    impl Disposable for Failing {
        fn release(&mut self) -> Result<()> {
            Err(anyhow!("boom"))
        }
    }

    struct Panicking;

    impl Disposable for Panicking {
        fn release(&mut self) -> Result<()> {
            panic!("release panicked");
        }
    }

    #[test]
    fn releases_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut set = DisposableSet::new();
        for id in 0..4 {
            set.push(recording(&log, id));
        }

        set.release().unwrap();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn second_release_is_a_no_op() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut set = DisposableSet::new();
        set.push(recording(&log, 7));

        set.release().unwrap();
        set.release().unwrap();
        drop(set);
        assert_eq!(*log.lock().unwrap(), vec![7]);
    }

    #[test]
    fn failing_member_does_not_stop_the_sweep() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut set = DisposableSet::new();
        set.push(recording(&log, 1));
        set.push(Failing);
        set.push(Panicking);
        set.push(recording(&log, 2));

        let err = set.release().unwrap_err();
        assert!(err.to_string().contains("2 of 4"));
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn drop_releases_unreleased_set() {
        let log = Arc::new(Mutex::new(Vec::new()));
        {
            let mut set = DisposableSet::new();
            set.push(recording(&log, 3));
        }
        assert_eq!(*log.lock().unwrap(), vec![3]);
    }

    #[test]
    fn push_after_release_releases_immediately() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut set = DisposableSet::new();
        set.release().unwrap();

        set.push(recording(&log, 9));
        assert!(set.is_empty());
        assert_eq!(*log.lock().unwrap(), vec![9]);
    }

    #[test]
    fn fn_disposable_runs_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut d = recording(&log, 5);
        d.release().unwrap();
        d.release().unwrap();
        assert!(d.is_released());
        assert_eq!(*log.lock().unwrap(), vec![5]);
    }
}
