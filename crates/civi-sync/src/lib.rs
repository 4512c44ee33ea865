//! # civi-sync
//!
//! Typed dispatch of record changes between the CRM and the post side.
//!
//! A [`SyncBus`] delivers each [`civi_core::SyncEvent`] to its observers in
//! registration order, inside one [`SyncPass`] whose request cache lives
//! exactly as long as that dispatch. [`MappingBridge`] is the observer that
//! routes changes through the mapping tables: CRM changes land in post fields
//! via a [`FieldSink`], post changes become CRM writes.

mod bridge;
mod bus;
mod error;
mod field_sink;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use bridge::{BridgeOutcome, MappingBridge, POST_TYPE_KEY, SkipReason};
pub use bus::{DispatchReport, ObserverFailure, SyncBus, SyncObserver, SyncPass};
pub use error::{SyncError, SyncResult};
pub use field_sink::{FieldSink, PostUpdate};
