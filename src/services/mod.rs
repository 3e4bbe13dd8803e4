//! External service module
//!
//! Side-effecting collaborators of the timer: the key-value store, the
//! persistence bridge over it, and completion notifications.

pub mod notifier;
pub mod persistence;
pub mod store;

// Re-export main types
pub use notifier::{DesktopNotifier, LogNotifier};
pub use persistence::PersistenceBridge;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
