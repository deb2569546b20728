pub mod app;
pub mod cleanup;
pub mod core;
pub mod host;
pub mod memory;
pub mod resources;
