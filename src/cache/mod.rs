//! Cache invalidation module
//!
//! Every resource service owns one cache. When credentials are revoked, the
//! `CacheRegistry` asks each of them to clear so no credential-linked data
//! lingers.

mod memory;
mod registry;

pub use memory::MemoryCache;
pub use registry::{CacheRegistry, ResourceCache};
