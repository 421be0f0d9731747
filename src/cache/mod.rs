//! Cache Module
//!
//! Namespaced, TTL-aware entries over a pluggable storage substrate.

mod accessor;
mod cancel;
mod codec;
mod entry;
mod keys;
pub mod policy;
mod stats;
mod store;


// Re-export public types
pub use accessor::StorageAccessor;
pub use cancel::{cancellable, ActionGuard, ActionSlots};
pub use codec::{decode, encode, format_timestamp, DecodeError};
pub use entry::CacheEntry;
pub use keys::KeyNamespace;
pub use stats::CacheStatistics;
pub use store::CacheStore;
