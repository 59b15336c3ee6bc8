//! HTML layer: the Sanitized HTML Projection
//!
//! # Architecture
//!
//! ```text
//! EditableDocument ──serialize_html──► markup ──Sanitizer──► host (onChange)
//!        ▲                                                      │
//!        └──────────parse_html◄──Sanitizer◄──── external content┘
//! ```
//!
//! Markup never re-enters the document without crossing the sanitizer. The
//! parser only understands the inline subset an editing surface produces and
//! degrades everything else to text.

mod parse;
mod sanitize;
mod serialize;
pub mod tokenizer;

pub use parse::parse_html;
pub use sanitize::{AllowListSanitizer, Sanitizer};
pub use serialize::serialize_html;
pub use tokenizer::{decode_entities, escape_attr, escape_text, Tag};
