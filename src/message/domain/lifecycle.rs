//! One-time construction guard shared by every message instance.
//!
//! A message starts [`LifecyclePhase::Uninitialized`]. The first successful
//! call to [`LifecycleGuard::solidify`] runs the initialiser exactly once and
//! publishes the value; later and concurrent callers observe the same value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError, TryLockError};

/// Construction phase of a guarded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// No initialisation has completed.
    Uninitialized,
    /// A caller holds the guard and is running the initialiser.
    Initializing,
    /// The value is published and visible to every thread.
    Ready,
}

impl LifecyclePhase {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of a successful [`LifecycleGuard::solidify`] call.
#[derive(Debug, Clone, Copy)]
pub struct Solidified<'a, T> {
    value: &'a T,
    initialized_here: bool,
}

impl<'a, T> Solidified<'a, T> {
    /// Returns the published value.
    #[must_use]
    pub const fn value(&self) -> &'a T {
        self.value
    }

    /// Returns `true` if this call ran the initialiser.
    #[must_use]
    pub const fn initialized_here(&self) -> bool {
        self.initialized_here
    }
}

/// Double-checked, mutex-guarded one-time initialisation cell.
///
/// The fast path reads the [`OnceLock`] without locking. The slow path takes
/// the mutex, re-checks, and runs the initialiser. A failed initialiser
/// leaves the guard uninitialised so no partial value is ever observable.
///
/// # Examples
///
/// ```
/// use agora::message::domain::{LifecycleGuard, LifecyclePhase};
///
/// let guard = LifecycleGuard::new();
/// let first = guard.solidify(|| Ok::<_, ()>(7)).expect("initialised");
/// assert!(first.initialized_here());
/// let second = guard.solidify(|| Ok::<_, ()>(8)).expect("already ready");
/// assert!(!second.initialized_here());
/// assert_eq!(*second.value(), 7);
/// assert_eq!(guard.phase(), LifecyclePhase::Ready);
/// ```
#[derive(Debug)]
pub struct LifecycleGuard<T> {
    phase: Mutex<LifecyclePhase>,
    value: OnceLock<T>,
}

impl<T> LifecycleGuard<T> {
    /// Creates an uninitialised guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: Mutex::new(LifecyclePhase::Uninitialized),
            value: OnceLock::new(),
        }
    }

    /// Returns the published value, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns the published value mutably, if any.
    ///
    /// Exclusive access rules out concurrent initialisation, so no lock is
    /// taken.
    #[must_use]
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.get_mut()
    }

    /// Returns `true` once the value is published.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.value.get().is_some()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> LifecyclePhase {
        if self.is_ready() {
            return LifecyclePhase::Ready;
        }
        let recorded = match self.phase.try_lock() {
            Ok(phase) => *phase,
            Err(TryLockError::Poisoned(poisoned)) => *poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return LifecyclePhase::Initializing,
        };
        // Holding the lock means nobody is initialising; a recorded
        // `Initializing` is left over from a panicked initialiser.
        match recorded {
            LifecyclePhase::Initializing => LifecyclePhase::Uninitialized,
            other => other,
        }
    }

    /// Runs `init` once and publishes its value.
    ///
    /// Callers that arrive after publication, or that wait on the lock while
    /// another caller initialises, receive the published value without
    /// running `init`.
    ///
    /// # Errors
    ///
    /// Returns the initialiser's error; the guard stays uninitialised.
    pub fn solidify<E>(
        &self,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<Solidified<'_, T>, E> {
        if let Some(value) = self.value.get() {
            return Ok(Solidified {
                value,
                initialized_here: false,
            });
        }

        // A panicking initialiser never published, so the poisoned state is
        // safe to reuse.
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.value.get() {
            return Ok(Solidified {
                value,
                initialized_here: false,
            });
        }

        *phase = LifecyclePhase::Initializing;
        match init() {
            Ok(initialised) => {
                let value = self.value.get_or_init(move || initialised);
                *phase = LifecyclePhase::Ready;
                Ok(Solidified {
                    value,
                    initialized_here: true,
                })
            }
            Err(err) => {
                *phase = LifecyclePhase::Uninitialized;
                Err(err)
            }
        }
    }
}

impl<T> Default for LifecycleGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}
