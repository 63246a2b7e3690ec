//! The entity mirror: per-session shadow of the backend's entities.

pub mod cache;
pub mod metadata;
pub mod mirror;

pub use cache::EntityCache;
pub use metadata::{EntityDataKey, EntityDataValue, EntityFlag, EntityFlags, MetadataMap};
pub use mirror::MirroredEntity;
