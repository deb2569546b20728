//! Cleanup coordination: the ordered teardown pass, its reports and
//! configuration, and the host facilities it relies on.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod host;
pub(crate) mod phases;
pub mod status;

#[cfg(test)]
mod tests;
