//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Deadline timers (cooperative, fired by the host loop)
//! - Key-value storage (LocalStorage on web)

pub mod clock;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{KeyValueStore, MemoryStore};
pub use timer::TimerSlot;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
