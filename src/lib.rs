// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod specs;

pub mod cost;
pub mod error;
pub mod history;
pub mod model;
pub mod normalize;
pub mod overrides;
pub mod pipeline;

pub mod file;
pub mod progress;
pub mod runner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;
