/// In-memory switch state store
///
/// This module owns the single authoritative valve switch value. Every
/// caller, whether the MCP tool adapter or the REST facade, goes through
/// the same [`SwitchStore`] handle, so all reads and writes form one
/// serialized sequence.
///
/// # Guarantees
///
/// - **Atomic**: `get`, `set` and `toggle` each hold the lock for exactly
///   one read-modify-write and never across I/O or an `.await`
/// - **No lost updates**: after N toggles from `OFF` the value is `ON`
///   iff N is odd
/// - **Volatile**: the value starts `OFF` on every process start
///
/// # Example
///
/// ```
/// use valveswitch_shared::state::SwitchStore;
///
/// let store = SwitchStore::new();
/// assert!(!store.get());
///
/// assert!(store.toggle());
/// assert!(!store.set(false));
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Wire representation of the switch position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwitchStatus {
    /// Valve open
    On,

    /// Valve closed
    Off,
}

impl SwitchStatus {
    /// Returns the canonical string form (`"ON"` / `"OFF"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchStatus::On => "ON",
            SwitchStatus::Off => "OFF",
        }
    }

    /// Returns true for [`SwitchStatus::On`]
    pub fn is_on(&self) -> bool {
        matches!(self, SwitchStatus::On)
    }
}

impl From<bool> for SwitchStatus {
    fn from(on: bool) -> Self {
        if on {
            SwitchStatus::On
        } else {
            SwitchStatus::Off
        }
    }
}

impl From<SwitchStatus> for bool {
    fn from(status: SwitchStatus) -> Self {
        status.is_on()
    }
}

impl fmt::Display for SwitchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to the process-wide switch value
///
/// Cloning is cheap and every clone refers to the same cell. Construct one
/// at startup and hand clones to each facade.
#[derive(Debug, Clone, Default)]
pub struct SwitchStore {
    inner: Arc<Mutex<bool>>,
}

impl SwitchStore {
    /// Creates a store in the `OFF` position
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value
    pub fn get(&self) -> bool {
        *self.lock()
    }

    /// Forces the switch to `value` and returns the new value
    pub fn set(&self, value: bool) -> bool {
        let mut guard = self.lock();
        *guard = value;
        let on = *guard;
        drop(guard);

        tracing::debug!(switch = on, "Switch set");
        on
    }

    /// Flips the switch and returns the new value
    pub fn toggle(&self) -> bool {
        let mut guard = self.lock();
        *guard = !*guard;
        let on = *guard;
        drop(guard);

        tracing::debug!(switch = on, "Switch toggled");
        on
    }

    // A bool cannot be left half-written, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
