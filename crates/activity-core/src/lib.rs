//! Shared types for the activity aggregator.
//!
//! Zero I/O, zero platform-specific logic — just the identifiers and
//! wire shapes that every other crate in the workspace agrees on.

pub mod envelope;
pub mod platform;
pub mod store_id;
pub mod text;
pub mod timeline;

pub use envelope::ErrorEnvelope;
pub use platform::{Platform, UnknownPlatform};
pub use store_id::{StoreId, StoreIdParseError};
pub use timeline::{CommitGroup, CommitGroupTag, DateGroup, Entry, ItemPayload, TimelineItem, TimelinePayload};
