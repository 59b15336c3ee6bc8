//! WASM bindings for MentionKit
//!
//! Exposes the editor engine to JavaScript. The DOM surface stays in JS; it
//! forwards input events and selection changes here and renders the markup
//! it gets back.

pub mod bindings;
pub mod utils;

pub use bindings::{JsClock, JsHost, WasmEditor};
