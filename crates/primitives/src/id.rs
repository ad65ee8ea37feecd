use std::fmt;

/// Numeric resource identifier in the `0xPPTTEEEE` layout (package, type, entry).
///
/// Compiled ids always carry a type byte below `0x80`. Dynamic ids, minted for resources
/// that have no compiled id yet, live in the app package with a type byte of `0x80` or
/// above, so the two spaces never overlap and [`ResourceId::is_dynamic`] is a pure range
/// check.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(i32);

impl ResourceId {
	/// Package byte of application resources.
	pub const APP_PACKAGE: u8 = 0x7F;
	/// Lowest dynamic id (exclusive of the seed: the first minted id is one above it).
	pub const DYNAMIC_MIN: i32 = 0x7F80_0000;
	/// Highest dynamic id.
	pub const DYNAMIC_MAX: i32 = i32::MAX;

	/// Wraps a raw id value.
	#[inline]
	pub const fn from_raw(raw: i32) -> Self {
		Self(raw)
	}

	/// Returns the raw id value.
	#[inline]
	pub const fn raw(self) -> i32 {
		self.0
	}

	#[inline]
	pub const fn package(self) -> u8 {
		(self.0 as u32 >> 24) as u8
	}

	#[inline]
	pub const fn type_byte(self) -> u8 {
		(self.0 as u32 >> 16) as u8
	}

	#[inline]
	pub const fn entry(self) -> u16 {
		self.0 as u32 as u16
	}

	/// Returns true if the id lies in the reserved dynamic range.
	#[inline]
	pub const fn is_dynamic(self) -> bool {
		self.0 >= Self::DYNAMIC_MIN
	}

	/// Returns true if the id can be a compiled id (nonzero and outside the dynamic range).
	#[inline]
	pub const fn is_compiled(self) -> bool {
		self.0 != 0 && !self.is_dynamic()
	}
}

impl fmt::Debug for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ResourceId({:#010x})", self.0)
	}
}

impl fmt::Display for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#010x}", self.0)
	}
}
