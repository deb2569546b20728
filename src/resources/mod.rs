//! Resource handles, capability traits and the per-category registry

pub mod api;
pub mod error;
pub mod handle;
pub mod registry;
pub mod scene;
pub mod traits;
pub mod types;
