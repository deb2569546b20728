//! Command-line application

pub mod cli;
pub mod config;
pub mod demo;
pub mod render;
pub mod startup;
