// src/specs/mod.rs
//! # Source “specs” module
//!
//! Each spec knows how to read one source shape and turn it into
//! [`RawRecord`](crate::model::RawRecord)s:
//!
//! - `profile` – the Brawlify profile page (HTML). One `<div id="<digits>">`
//!   block per brawler; fields are read through ordered fallback chains.
//! - `api` – a REST payload (JSON). One object per brawler; list-or-scalar
//!   count fields are folded into integers.
//!
//! ## What does **not** live here
//! - Fetching (`core::net`) and persistence (`store`).
//! - Level clamping and the cost model (`normalize`, `cost`).
//! - Overrides, totals and history (`overrides`, `model`, `history`).
//!
//! ## Conventions & invariants
//! - **Never fail.** A missing or malformed sub-structure leaves its field at
//!   the default; one bad block never stops the rest of the document.
//! - **Case-insensitive** tag detection; scanning stays inside known blocks.
//! - Specs are testable **offline** against captured fixtures.
pub mod api;
pub mod profile;
