// ABOUTME: Session lifecycle state markers for the type state pattern.
// ABOUTME: Zero-sized types restrict which controller operations exist in each state.

/// Lifecycle of a session as observed at runtime.
///
/// A session is running while its controller waits inside `run_until`; no
/// operation is available during that time, so it has no marker of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unstarted,
    Initialized,
    Terminated,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unstarted {}
    impl Sealed for super::Initialized {}
    impl Sealed for super::Terminated {}
}

/// Implemented by the controller state markers only.
pub trait SessionState: sealed::Sealed {
    const LIFECYCLE: Lifecycle;
}

/// Session constructed, `init` not yet called.
/// Available actions: `start()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Unstarted;

/// `init` succeeded.
/// Available actions: `run_until()`, `shutdown()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// `clean_up` has run. No further actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Terminated;

impl SessionState for Unstarted {
    const LIFECYCLE: Lifecycle = Lifecycle::Unstarted;
}

impl SessionState for Initialized {
    const LIFECYCLE: Lifecycle = Lifecycle::Initialized;
}

impl SessionState for Terminated {
    const LIFECYCLE: Lifecycle = Lifecycle::Terminated;
}
