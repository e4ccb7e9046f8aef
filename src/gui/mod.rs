// src/gui/mod.rs
pub mod app;
pub mod components;
pub mod progress;
pub mod table_model;

pub use app::run;
