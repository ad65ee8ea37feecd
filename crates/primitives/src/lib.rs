//! Core value types for the resource index: resource types, qualifiers, items and ids.
//!
//! Nothing in this crate performs I/O. The repository engine treats these types as opaque
//! keys and payloads; their only behavior is comparison, hashing and display.

/// Resource folder names and their relationship to resource types.
pub mod folder;
/// Numeric resource identifiers and the reserved id ranges.
pub mod id;
/// Concrete resource declarations.
pub mod item;
/// Configuration qualifier tokens.
pub mod qualifiers;
/// The closed set of resource categories.
pub mod resource_type;

pub use folder::ResourceFolderType;
pub use id::ResourceId;
pub use item::{ResourceItem, ResourceValue, SourceLocation};
pub use qualifiers::{LocaleQualifier, Qualifiers};
pub use resource_type::{ParseResourceTypeError, ResourceType};
