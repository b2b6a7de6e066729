//! Platform abstraction layer
//!
//! The browser build exposes each chapter simulation to the JavaScript
//! renderer through `wasm-bindgen`. A chapter object is created when the
//! chapter is entered and freed when it is left; there is no global state.

#[cfg(target_arch = "wasm32")]
pub mod web;
