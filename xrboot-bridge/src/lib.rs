//! xrboot bridge library target.
//!
//! The binary entry point is in `main.rs`; the wiring lives here so
//! `tests/*.rs` can drive it.

pub mod launcher;
pub mod util;
