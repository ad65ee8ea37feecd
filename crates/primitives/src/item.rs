use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::{Qualifiers, ResourceType};

/// Resolved payload of a resource declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceValue {
	/// No payload (inline id declarations, attributes declared without a format).
	Empty,
	/// Scalar text such as a string, color or dimension literal.
	Text(Arc<str>),
	/// Reference to another resource, e.g. `@string/app_name`.
	Reference(Arc<str>),
	/// The attribute names of a `declare-styleable` group, in declaration order.
	Styleable(Arc<[Arc<str>]>),
	/// A file resource; the payload is the file itself.
	File(Arc<Path>),
}

impl ResourceValue {
	/// Creates a text value.
	pub fn text(text: &str) -> Self {
		Self::Text(Arc::from(text))
	}

	/// Returns the textual form of scalar and reference values.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) | Self::Reference(text) => Some(text),
			_ => None,
		}
	}
}

impl fmt::Display for ResourceValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => Ok(()),
			Self::Text(text) | Self::Reference(text) => f.write_str(text),
			Self::Styleable(attrs) => {
				f.write_str("[")?;
				for (i, attr) in attrs.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					f.write_str(attr)?;
				}
				f.write_str("]")
			}
			Self::File(path) => write!(f, "{}", path.display()),
		}
	}
}

/// Handle back to where a declaration came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SourceLocation {
	/// Declared in a file inside a resource folder.
	File(Arc<Path>),
	/// Declared in a precompiled package, identified by library name.
	Package(Arc<str>),
	/// Injected by the build system.
	#[default]
	Synthetic,
}

/// One declaration of a named resource under one set of qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceItem {
	name: Arc<str>,
	ty: ResourceType,
	qualifiers: Qualifiers,
	framework: bool,
	value: ResourceValue,
	source: SourceLocation,
}

impl ResourceItem {
	/// Creates a project (non-framework) item with a synthetic source.
	pub fn new(ty: ResourceType, name: &str, qualifiers: Qualifiers, value: ResourceValue) -> Self {
		Self {
			name: Arc::from(name),
			ty,
			qualifiers,
			framework: false,
			value,
			source: SourceLocation::Synthetic,
		}
	}

	/// Shorthand for a default-configuration text item.
	pub fn text(ty: ResourceType, name: &str, text: &str) -> Self {
		Self::new(ty, name, Qualifiers::DEFAULT, ResourceValue::text(text))
	}

	/// Shorthand for an inline id declaration.
	pub fn id(name: &str) -> Self {
		Self::new(ResourceType::Id, name, Qualifiers::DEFAULT, ResourceValue::Empty)
	}

	/// Replaces the qualifier token.
	pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
		self.qualifiers = qualifiers;
		self
	}

	/// Replaces the source location.
	pub fn with_source(mut self, source: SourceLocation) -> Self {
		self.source = source;
		self
	}

	/// Marks the item as belonging to the platform rather than the project.
	pub fn with_framework(mut self, framework: bool) -> Self {
		self.framework = framework;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the shared name, for use as a map key without reallocating.
	pub fn name_arc(&self) -> &Arc<str> {
		&self.name
	}

	pub fn ty(&self) -> ResourceType {
		self.ty
	}

	pub fn qualifiers(&self) -> &Qualifiers {
		&self.qualifiers
	}

	pub fn is_framework(&self) -> bool {
		self.framework
	}

	pub fn value(&self) -> &ResourceValue {
		&self.value
	}

	pub fn source(&self) -> &SourceLocation {
		&self.source
	}

	/// Formats the item as a resource reference, e.g. `@string/app_name`.
	pub fn reference(&self) -> String {
		if self.framework {
			format!("@android:{}/{}", self.ty, self.name)
		} else {
			format!("@{}/{}", self.ty, self.name)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builders_set_fields() {
		let item = ResourceItem::text(ResourceType::String, "title", "Home")
			.with_qualifiers(Qualifiers::new("fr"))
			.with_framework(true);
		assert_eq!(item.name(), "title");
		assert_eq!(item.qualifiers().as_str(), "fr");
		assert_eq!(item.value().as_text(), Some("Home"));
		assert_eq!(item.source(), &SourceLocation::Synthetic);
		assert_eq!(item.reference(), "@android:string/title");
	}

	#[test]
	fn styleable_display_lists_attrs() {
		let value = ResourceValue::Styleable(Arc::from(vec![Arc::<str>::from("a"), Arc::<str>::from("b")]));
		assert_eq!(value.to_string(), "[a, b]");
		assert_eq!(ResourceItem::id("button1").reference(), "@id/button1");
	}
}
