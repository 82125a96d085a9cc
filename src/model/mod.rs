//! Data model for template scopes
//!
//! Values are JSON; locations are [`ResolvedPath`] segment chains; the
//! [`Model`] trait is the write-back seam to the owning data store.

pub mod path;
pub mod store;
pub mod value;

pub use path::{ResolvedPath, Segment};
pub use store::{MemoryModel, Model};
pub use value::{
    index_item, index_value, js_truthy, lookup, lookup_item, member, number_value,
    template_truthy, to_display_string, to_number,
};
