//! Editable document model
//!
//! The live content of an editing surface, held as an explicit structure
//! instead of a platform node tree.
//!
//! # Architecture
//!
//! ```text
//! <strong>Hi <span class="mention" ...>@alice</span></strong> there
//!
//! EditableDocument {
//!     Span { Text "Hi ",       marks: [Bold] }
//!     Span { Mention "alice",  marks: [Bold] }
//!     Span { Text " there",    marks: [] }
//! }
//! ```
//!
//! Formatting wrappers nest in markup but are flattened onto the spans they
//! cover. The HTML serializer rebuilds the nesting from shared mark prefixes.

mod editable;
mod span;
mod style;

pub use editable::EditableDocument;
pub use span::{Marks, Span, SpanKind};
pub use style::Style;

pub(crate) use editable::text_to_spans;
pub(crate) use style::{parse_style_attribute, safe_css_value};
