use std::fmt;
use std::str::FromStr;

/// Category of a resource.
///
/// The set is fixed; the engine only uses it as a map key. The declaration order is the
/// iteration order of [`ResourceType::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceType {
	Anim,
	Animator,
	Array,
	Attr,
	Bool,
	Color,
	Dimen,
	Drawable,
	Font,
	Fraction,
	Id,
	Integer,
	Interpolator,
	Layout,
	Menu,
	Mipmap,
	Navigation,
	Plurals,
	Raw,
	String,
	Style,
	/// A `declare-styleable` attribute group.
	Styleable,
	Transition,
	Xml,
}

/// Error returned when a string does not name a [`ResourceType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0:?}")]
pub struct ParseResourceTypeError(pub String);

impl ResourceType {
	/// Every resource type, in declaration order.
	pub const ALL: [ResourceType; 24] = [
		Self::Anim,
		Self::Animator,
		Self::Array,
		Self::Attr,
		Self::Bool,
		Self::Color,
		Self::Dimen,
		Self::Drawable,
		Self::Font,
		Self::Fraction,
		Self::Id,
		Self::Integer,
		Self::Interpolator,
		Self::Layout,
		Self::Menu,
		Self::Mipmap,
		Self::Navigation,
		Self::Plurals,
		Self::Raw,
		Self::String,
		Self::Style,
		Self::Styleable,
		Self::Transition,
		Self::Xml,
	];

	/// Returns the name used in resource references (`@string/foo`) and config files.
	pub const fn name(self) -> &'static str {
		match self {
			Self::Anim => "anim",
			Self::Animator => "animator",
			Self::Array => "array",
			Self::Attr => "attr",
			Self::Bool => "bool",
			Self::Color => "color",
			Self::Dimen => "dimen",
			Self::Drawable => "drawable",
			Self::Font => "font",
			Self::Fraction => "fraction",
			Self::Id => "id",
			Self::Integer => "integer",
			Self::Interpolator => "interpolator",
			Self::Layout => "layout",
			Self::Menu => "menu",
			Self::Mipmap => "mipmap",
			Self::Navigation => "navigation",
			Self::Plurals => "plurals",
			Self::Raw => "raw",
			Self::String => "string",
			Self::Style => "style",
			Self::Styleable => "styleable",
			Self::Transition => "transition",
			Self::Xml => "xml",
		}
	}

	/// Returns true for types whose repeated declarations are legal and never collide.
	#[inline]
	pub const fn allows_duplicates(self) -> bool {
		matches!(self, Self::Id)
	}
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for ResourceType {
	type Err = ParseResourceTypeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// `declare-styleable` is the element name used in values files.
		if s == "declare-styleable" {
			return Ok(Self::Styleable);
		}
		Self::ALL
			.into_iter()
			.find(|ty| ty.name() == s)
			.ok_or_else(|| ParseResourceTypeError(s.to_string()))
	}
}
