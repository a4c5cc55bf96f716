// Allow dead code for public API functions that may not be used internally
// but are part of the library's exposed interface
#![allow(dead_code)]

pub mod cli;
pub mod config;
pub mod crtsh;
pub mod hosts;
pub mod interrupt;
pub mod logger;
pub mod output;
pub mod rate_limit;
pub mod runner;
pub mod stages;

pub use stages::{EnumerateStage, ProbeStage, WaybackStage};
