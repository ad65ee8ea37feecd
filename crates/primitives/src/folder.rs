use crate::{Qualifiers, ResourceType};

/// Kind of a resource folder, derived from the folder name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFolderType {
	Anim,
	Animator,
	Color,
	Drawable,
	Font,
	Interpolator,
	Layout,
	Menu,
	Mipmap,
	Navigation,
	Raw,
	Transition,
	Values,
	Xml,
}

impl ResourceFolderType {
	const NAMES: [(&'static str, ResourceFolderType); 14] = [
		("anim", Self::Anim),
		("animator", Self::Animator),
		("color", Self::Color),
		("drawable", Self::Drawable),
		("font", Self::Font),
		("interpolator", Self::Interpolator),
		("layout", Self::Layout),
		("menu", Self::Menu),
		("mipmap", Self::Mipmap),
		("navigation", Self::Navigation),
		("raw", Self::Raw),
		("transition", Self::Transition),
		("values", Self::Values),
		("xml", Self::Xml),
	];

	/// Parses a folder name such as `drawable-hdpi` into its kind and qualifier token.
	///
	/// Returns `None` for names that are not resource folders.
	pub fn from_folder_name(folder: &str) -> Option<(Self, Qualifiers)> {
		let (base, qualifiers) = Qualifiers::split_folder_name(folder);
		Self::NAMES
			.iter()
			.find(|(name, _)| *name == base)
			.map(|&(_, kind)| (kind, qualifiers))
	}

	/// Returns the folder name prefix.
	pub fn name(self) -> &'static str {
		Self::NAMES
			.iter()
			.find(|(_, kind)| *kind == self)
			.map(|(name, _)| *name)
			.unwrap_or("values")
	}

	/// Resource type of the items that files in this folder declare.
	///
	/// `None` for `values`, whose files declare items of many types.
	pub const fn file_resource_type(self) -> Option<ResourceType> {
		Some(match self {
			Self::Anim => ResourceType::Anim,
			Self::Animator => ResourceType::Animator,
			Self::Color => ResourceType::Color,
			Self::Drawable => ResourceType::Drawable,
			Self::Font => ResourceType::Font,
			Self::Interpolator => ResourceType::Interpolator,
			Self::Layout => ResourceType::Layout,
			Self::Menu => ResourceType::Menu,
			Self::Mipmap => ResourceType::Mipmap,
			Self::Navigation => ResourceType::Navigation,
			Self::Raw => ResourceType::Raw,
			Self::Transition => ResourceType::Transition,
			Self::Xml => ResourceType::Xml,
			Self::Values => return None,
		})
	}

	/// Returns true for folders whose files may declare inline `@+id/` resources.
	pub const fn is_id_generating(self) -> bool {
		matches!(self, Self::Layout | Self::Menu | Self::Navigation)
	}
}
